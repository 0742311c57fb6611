use std::fs;
use std::path::Path;

use serde_json::Value;

use super::types::{
    AllergyIntoleranceResource, ConditionResource, MedicationRequestResource, ProcedureResource,
};
use super::FhirError;

/// All clinical records for one patient, split by resource type.
///
/// Entry order within each collection follows bundle order. Resource
/// types the intake screens do not consume are skipped.
#[derive(Debug, Default)]
pub struct RecordBundle {
    procedures: Vec<ProcedureResource>,
    conditions: Vec<ConditionResource>,
    allergies: Vec<AllergyIntoleranceResource>,
    medications: Vec<MedicationRequestResource>,
}

impl RecordBundle {
    /// Parse a FHIR `Bundle` JSON document.
    pub fn from_json(text: &str) -> Result<Self, FhirError> {
        let root: Value = serde_json::from_str(text)?;

        let resource_type = root
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if resource_type != "Bundle" {
            return Err(FhirError::NotABundle(resource_type.to_string()));
        }

        let mut bundle = Self::default();
        let entries = root
            .get("entry")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        for entry in entries {
            let Some(resource) = entry.get("resource") else {
                continue;
            };
            bundle.push_resource(resource)?;
        }

        Ok(bundle)
    }

    /// Parse a bundle from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self, FhirError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    fn push_resource(&mut self, resource: &Value) -> Result<(), FhirError> {
        let kind = resource
            .get("resourceType")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let parse_err = |e: serde_json::Error| FhirError::MalformedResource {
            resource_type: kind.clone(),
            message: e.to_string(),
        };

        match kind.as_str() {
            "Procedure" => {
                self.procedures
                    .push(serde_json::from_value(resource.clone()).map_err(parse_err)?);
            }
            "Condition" => {
                self.conditions
                    .push(serde_json::from_value(resource.clone()).map_err(parse_err)?);
            }
            "AllergyIntolerance" => {
                self.allergies
                    .push(serde_json::from_value(resource.clone()).map_err(parse_err)?);
            }
            "MedicationRequest" => {
                self.medications
                    .push(serde_json::from_value(resource.clone()).map_err(parse_err)?);
            }
            other => {
                tracing::debug!(resource_type = %other, "skipping resource type");
            }
        }
        Ok(())
    }

    pub fn procedures(&self) -> &[ProcedureResource] {
        &self.procedures
    }

    pub fn conditions(&self) -> &[ConditionResource] {
        &self.conditions
    }

    pub fn allergies(&self) -> &[AllergyIntoleranceResource] {
        &self.allergies
    }

    pub fn medications(&self) -> &[MedicationRequestResource] {
        &self.medications
    }

    /// Conditions carrying an active clinical status.
    pub fn active_conditions(&self) -> impl Iterator<Item = &ConditionResource> {
        self.conditions.iter().filter(|c| c.is_active())
    }

    /// Active or outpatient medication requests.
    pub fn current_medications(&self) -> impl Iterator<Item = &MedicationRequestResource> {
        self.medications.iter().filter(|m| m.is_current())
    }
}
