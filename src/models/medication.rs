use serde::{Deserialize, Serialize};

/// A current medication, read-only on the intake side.
///
/// The medication assistant answers questions about these but cannot
/// add or remove them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub name: String,
    pub dose: String,
    pub frequency: String,
}

impl Medication {
    pub fn new(
        name: impl Into<String>,
        dose: impl Into<String>,
        frequency: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            dose: dose.into(),
            frequency: frequency.into(),
        }
    }
}
