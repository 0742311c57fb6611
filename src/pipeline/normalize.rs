use crate::fhir::{Performed, ProcedureResource};
use crate::models::{EventStatus, Surgery};

/// Convert one read-only procedure record into an editable surgery entry.
///
/// Missing optional fields resolve to empty defaults; nothing here fails.
pub fn surgery_from_procedure(procedure: &ProcedureResource) -> Surgery {
    let mut surgery = Surgery::new(procedure.display_name().unwrap_or("Unknown"));

    surgery.status = EventStatus::from_code(procedure.status.as_deref().unwrap_or_default())
        .label()
        .to_string();

    match procedure.performed() {
        Some(Performed::Period { start, end }) => {
            surgery.date = calendar_date(start.unwrap_or_default());
            surgery.end_date = calendar_date(end.unwrap_or_default());
        }
        Some(Performed::DateTime(value)) => {
            surgery.date = calendar_date(value);
        }
        None => {
            tracing::debug!(name = %surgery.name, "procedure has no performed date");
        }
    }

    if let Some(location) = &procedure.location {
        surgery.location = location.display.clone().unwrap_or_default();
    }

    surgery.notes = procedure.note.iter().filter_map(|n| n.text.clone()).collect();
    surgery.body_sites = procedure
        .body_site
        .iter()
        .filter_map(|b| b.text.clone())
        .collect();
    surgery.complications = procedure
        .complication
        .iter()
        .filter_map(|c| c.text.clone())
        .collect();

    surgery
}

/// The calendar-date part of a FHIR dateTime (`2015-06-01T08:30:00Z` → `2015-06-01`).
fn calendar_date(value: &str) -> String {
    value.split('T').next().unwrap_or_default().to_string()
}
