use serde::{Deserialize, Serialize};

use crate::models::{Allergy, Condition, Medication};

pub const CONDITION_CLINICAL_SYSTEM: &str =
    "http://terminology.hl7.org/CodeSystem/condition-clinical";

// ═══════════════════════════════════════════════════════════
// Generic datatypes
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Coding {
    pub system: Option<String>,
    pub code: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
    pub text: Option<String>,
}

impl CodeableConcept {
    /// Display text of the first coding, if any.
    pub fn first_display(&self) -> Option<&str> {
        self.coding.first().and_then(|c| c.display.as_deref())
    }

    /// Plain text, falling back to the first coding display.
    pub fn text_or_display(&self) -> Option<&str> {
        self.text.as_deref().or_else(|| self.first_display())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Annotation {
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Reference {
    pub reference: Option<String>,
    pub display: Option<String>,
}

// ═══════════════════════════════════════════════════════════
// Procedure
// ═══════════════════════════════════════════════════════════

/// When a procedure was performed: a single timestamp or a period.
#[derive(Debug, Clone, PartialEq)]
pub enum Performed<'a> {
    DateTime(&'a str),
    Period {
        start: Option<&'a str>,
        end: Option<&'a str>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProcedureResource {
    pub id: Option<String>,
    pub code: Option<CodeableConcept>,
    pub status: Option<String>,
    pub performed_date_time: Option<String>,
    pub performed_period: Option<Period>,
    pub location: Option<Reference>,
    pub note: Vec<Annotation>,
    pub body_site: Vec<CodeableConcept>,
    pub complication: Vec<CodeableConcept>,
}

impl ProcedureResource {
    /// The `performed[x]` choice field. A period wins when a malformed
    /// record carries both.
    pub fn performed(&self) -> Option<Performed<'_>> {
        if let Some(period) = &self.performed_period {
            return Some(Performed::Period {
                start: period.start.as_deref(),
                end: period.end.as_deref(),
            });
        }
        self.performed_date_time
            .as_deref()
            .map(Performed::DateTime)
    }

    /// First coded display text, the same field the intake form shows.
    pub fn display_name(&self) -> Option<&str> {
        self.code.as_ref().and_then(|c| c.first_display())
    }
}

// ═══════════════════════════════════════════════════════════
// Condition
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConditionResource {
    pub id: Option<String>,
    pub code: Option<CodeableConcept>,
    pub clinical_status: Option<CodeableConcept>,
}

impl ConditionResource {
    /// Whether the condition carries an `active` clinical-status coding
    /// from the condition-clinical code system.
    pub fn is_active(&self) -> bool {
        self.clinical_status
            .as_ref()
            .map(|status| {
                status.coding.iter().any(|coding| {
                    coding.system.as_deref() == Some(CONDITION_CLINICAL_SYSTEM)
                        && coding.code.as_deref() == Some("active")
                })
            })
            .unwrap_or(false)
    }

    pub fn to_condition(&self) -> Condition {
        let name = self
            .code
            .as_ref()
            .and_then(|c| c.text_or_display())
            .unwrap_or("Unknown");
        Condition::new(name, self.is_active())
    }
}

// ═══════════════════════════════════════════════════════════
// AllergyIntolerance
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllergyReaction {
    pub manifestation: Vec<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllergyIntoleranceResource {
    pub id: Option<String>,
    pub code: Option<CodeableConcept>,
    pub reaction: Vec<AllergyReaction>,
}

impl AllergyIntoleranceResource {
    pub fn to_allergy(&self) -> Allergy {
        let name = self
            .code
            .as_ref()
            .and_then(|c| c.text_or_display())
            .unwrap_or("Unknown");
        let reactions = self
            .reaction
            .iter()
            .flat_map(|r| &r.manifestation)
            .filter_map(|m| m.text_or_display())
            .map(str::to_string)
            .collect();
        Allergy::new(name, reactions)
    }
}

// ═══════════════════════════════════════════════════════════
// MedicationRequest
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timing {
    pub code: Option<CodeableConcept>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DosageInstruction {
    pub text: Option<String>,
    pub timing: Option<Timing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicationRequestResource {
    pub id: Option<String>,
    pub medication_codeable_concept: Option<CodeableConcept>,
    pub status: Option<String>,
    pub category: Vec<CodeableConcept>,
    pub dosage_instruction: Vec<DosageInstruction>,
}

impl MedicationRequestResource {
    /// Active prescriptions and outpatient ones both surface on the
    /// medication list.
    pub fn is_current(&self) -> bool {
        if self.status.as_deref() == Some("active") {
            return true;
        }
        self.category.iter().any(|c| {
            c.text
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case("outpatient"))
        })
    }

    pub fn to_medication(&self) -> Medication {
        let name = self
            .medication_codeable_concept
            .as_ref()
            .and_then(|c| c.text_or_display())
            .unwrap_or("Unknown");
        let first = self.dosage_instruction.first();
        let dose = first
            .and_then(|d| d.text.as_deref())
            .unwrap_or_default();
        let frequency = first
            .and_then(|d| d.timing.as_ref())
            .and_then(|t| t.code.as_ref())
            .and_then(|c| c.text_or_display())
            .unwrap_or_default();
        Medication::new(name, dose, frequency)
    }
}
