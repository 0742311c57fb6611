use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One surgical-history entry as shown and edited on the intake form.
///
/// `date` and `end_date` are kept as strings in `YYYY-MM-DD` form because
/// they are free-text on the form and may be empty or unparsable; the
/// chronological sorter owns the parsing policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surgery {
    pub id: Uuid,
    pub name: String,
    pub date: String,
    pub end_date: String,
    pub status: String,
    pub location: String,
    pub notes: Vec<String>,
    pub body_sites: Vec<String>,
    pub complications: Vec<String>,
}

impl Surgery {
    /// A surgery with the given name and every other field defaulted.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            date: String::new(),
            end_date: String::new(),
            status: String::new(),
            location: String::new(),
            notes: Vec::new(),
            body_sites: Vec::new(),
            complications: Vec::new(),
        }
    }
}

impl Default for Surgery {
    fn default() -> Self {
        Self::new("Surgery")
    }
}
