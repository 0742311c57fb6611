use serde::{Deserialize, Serialize};

/// A medical-history condition with an active/inactive flag.
///
/// Equality is structural, like [`super::Allergy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub name: String,
    pub active: bool,
}

impl Condition {
    pub fn new(name: impl Into<String>, active: bool) -> Self {
        Self {
            name: name.into(),
            active,
        }
    }
}
