//! Process-wide intake state.
//!
//! One `DataStore` per intake session, passed by mutable reference to
//! whichever screen or assistant is active. All mutation happens on the
//! interaction-driving thread; there are no concurrent writers.

use uuid::Uuid;

use crate::fhir::RecordBundle;
use crate::models::{Allergy, Condition, Medication, Surgery};

/// Owning lists for every intake domain. Insertion order is display
/// order except where the surgery sorter imposes date order.
#[derive(Debug, Default)]
pub struct DataStore {
    pub surgeries: Vec<Surgery>,
    pub allergies: Vec<Allergy>,
    pub conditions: Vec<Condition>,
    pub medications: Vec<Medication>,
    pub surgeries_loaded: bool,
}

impl DataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// "Add new" from the surgery screen: a placeholder entry the user
    /// then edits on the form.
    pub fn add_new_surgery(&mut self) -> &mut Surgery {
        self.surgeries.push(Surgery::default());
        self.surgeries.last_mut().expect("just pushed")
    }

    /// Explicit delete from the surgery list.
    pub fn delete_surgery(&mut self, id: Uuid) -> bool {
        let before = self.surgeries.len();
        self.surgeries.retain(|s| s.id != id);
        self.surgeries.len() != before
    }

    /// Fill the allergy, condition, and medication lists from the record
    /// source, deduplicating by name against existing entries.
    pub fn load_clinical_records(&mut self, bundle: &RecordBundle) {
        for resource in bundle.allergies() {
            let allergy = resource.to_allergy();
            if !self.allergies.iter().any(|a| a.name == allergy.name) {
                self.allergies.push(allergy);
            }
        }

        for resource in bundle.active_conditions() {
            let condition = resource.to_condition();
            if !self.conditions.iter().any(|c| c.name == condition.name) {
                self.conditions.push(condition);
            }
        }

        for resource in bundle.current_medications() {
            let medication = resource.to_medication();
            if !self.medications.iter().any(|m| m.name == medication.name) {
                self.medications.push(medication);
            }
        }
    }
}
