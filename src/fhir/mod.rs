//! Read-only clinical-record source.
//!
//! A narrow FHIR R4 JSON subset: just the resource shapes and fields the
//! intake screens consume. Records are pre-existing and never written back;
//! every field is optional and absent fields resolve to documented defaults
//! downstream.

pub mod bundle;
pub mod types;

pub use bundle::RecordBundle;
pub use types::{
    AllergyIntoleranceResource, Annotation, CodeableConcept, Coding, ConditionResource,
    DosageInstruction, MedicationRequestResource, Performed, Period, ProcedureResource, Reference,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FhirError {
    #[error("Not a FHIR Bundle (resourceType {0:?})")]
    NotABundle(String),

    #[error("Malformed {resource_type} resource: {message}")]
    MalformedResource {
        resource_type: String,
        message: String,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
