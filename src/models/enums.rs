use serde::{Deserialize, Serialize};

/// FHIR R4 procedure event status.
///
/// Codes outside the R4 value set fold to `Unknown` rather than erroring:
/// the source records are read-only and a strange status must not block
/// intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventStatus {
    Completed,
    InProgress,
    NotDone,
    OnHold,
    Stopped,
    EnteredInError,
    Unknown,
}

impl EventStatus {
    /// Parse a FHIR status code, folding unrecognized codes to `Unknown`.
    pub fn from_code(code: &str) -> Self {
        match code {
            "completed" => Self::Completed,
            "in-progress" => Self::InProgress,
            "not-done" => Self::NotDone,
            "on-hold" => Self::OnHold,
            "stopped" => Self::Stopped,
            "entered-in-error" => Self::EnteredInError,
            _ => Self::Unknown,
        }
    }

    /// The wire code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "in-progress",
            Self::NotDone => "not-done",
            Self::OnHold => "on-hold",
            Self::Stopped => "stopped",
            Self::EnteredInError => "entered-in-error",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label shown on the surgery form.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::InProgress => "In Progress",
            Self::NotDone => "Not Done",
            Self::OnHold => "On Hold",
            Self::Stopped => "Stopped",
            Self::EnteredInError => "Entered in Error",
            Self::Unknown => "Unknown",
        }
    }
}
