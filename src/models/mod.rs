pub mod allergy;
pub mod condition;
pub mod enums;
pub mod medication;
pub mod surgery;

pub use allergy::Allergy;
pub use condition::Condition;
pub use enums::EventStatus;
pub use medication::Medication;
pub use surgery::Surgery;
