use serde::{Deserialize, Serialize};

/// A patient-reported or record-sourced allergy.
///
/// Equality is structural (name + reactions): the assistant capture slot
/// relies on it to decide whether a function call produced a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allergy {
    pub name: String,
    pub reactions: Vec<String>,
}

impl Allergy {
    pub fn new(name: impl Into<String>, reactions: Vec<String>) -> Self {
        Self {
            name: name.into(),
            reactions,
        }
    }
}
