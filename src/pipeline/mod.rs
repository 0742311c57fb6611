//! Surgery intake pipeline.
//!
//! Read-only procedure records flow through four stages:
//! normalize → stopword filter → assistant-backed refine → chronological
//! sort. Refinement is best-effort; every other stage is pure, and the
//! pipeline as a whole never fails.

pub mod normalize;
pub mod refine;
pub mod sort;
pub mod stopwords;

pub use normalize::surgery_from_procedure;
pub use refine::{refine_surgeries, SURGERY_FILTER_SYSTEM_PROMPT};
pub use sort::sort_by_date_desc;
pub use stopwords::stopword_filter;

use crate::chat::ChatClient;
use crate::config;
use crate::fhir::RecordBundle;
use crate::models::Surgery;
use crate::store::DataStore;

/// Stopword-filter the list, then refine it through the assistant when
/// the capability flag allows.
pub fn filter_surgeries<C: ChatClient>(
    client: &C,
    model: &str,
    llm_filtering: bool,
    surgeries: Vec<Surgery>,
) -> Vec<Surgery> {
    let manual = stopword_filter(surgeries);
    if !llm_filtering {
        return manual;
    }
    refine_surgeries(client, model, manual)
}

/// Populate the surgery list from the record source, with the refinement
/// flag taken from the environment.
pub fn load_surgeries<C: ChatClient>(
    store: &mut DataStore,
    bundle: &RecordBundle,
    client: &C,
    model: &str,
) {
    load_surgeries_with(
        store,
        bundle,
        client,
        model,
        config::assistant_filtering_enabled(),
    );
}

/// Populate the surgery list from the record source.
///
/// Procedures already present by name are not normalized again, so a
/// reload after the user edited the list does not duplicate entries.
pub fn load_surgeries_with<C: ChatClient>(
    store: &mut DataStore,
    bundle: &RecordBundle,
    client: &C,
    model: &str,
    llm_filtering: bool,
) {
    for procedure in bundle.procedures() {
        let name = procedure.display_name().unwrap_or("Unknown");
        if store.surgeries.iter().any(|s| s.name == name) {
            continue;
        }
        store.surgeries.push(surgery_from_procedure(procedure));
    }

    let surgeries = std::mem::take(&mut store.surgeries);
    store.surgeries = filter_surgeries(client, model, llm_filtering, surgeries);
    sort_by_date_desc(&mut store.surgeries);

    store.surgeries_loaded = true;
    tracing::info!(count = store.surgeries.len(), "surgery list loaded");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MockChatClient;

    const PROCEDURE_BUNDLE: &str = r#"{
        "resourceType": "Bundle",
        "entry": [
            {"resource": {
                "resourceType": "Procedure",
                "status": "completed",
                "code": {"coding": [{"display": "Mammography (procedure)"}]},
                "performedDateTime": "2012-04-02T09:00:00Z"
            }},
            {"resource": {
                "resourceType": "Procedure",
                "status": "completed",
                "code": {"coding": [{"display": "Certification procedure (procedure)"}]},
                "performedDateTime": "2013-01-20T09:00:00Z"
            }},
            {"resource": {
                "resourceType": "Procedure",
                "status": "completed",
                "code": {"coding": [{"display": "Transplant of kidney (procedure)"}]},
                "performedDateTime": "2016-09-14T09:00:00Z"
            }}
        ]
    }"#;

    fn named(names: &[&str]) -> Vec<Surgery> {
        names.iter().map(|n| Surgery::new(*n)).collect()
    }

    #[test]
    fn disabled_flag_is_identity_after_stopwords() {
        let client = MockChatClient::failing();
        let input = named(&["Appendectomy", "Hip replacement"]);
        let expected = input.clone();
        let output = filter_surgeries(&client, "medgemma", false, input);
        assert_eq!(output, expected);
    }

    #[test]
    fn failed_refinement_equals_stopword_output() {
        let client = MockChatClient::failing();
        let input = named(&["Appendectomy", "Discharge note (procedure)"]);
        let output = filter_surgeries(&client, "medgemma", true, input);
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].name, "Appendectomy");
    }

    #[test]
    fn end_to_end_filter_rename_and_sort() {
        let bundle = RecordBundle::from_json(PROCEDURE_BUNDLE).unwrap();
        let client = MockChatClient::new("Transplant of kidney, Mammography");
        let mut store = DataStore::new();

        load_surgeries_with(&mut store, &bundle, &client, "medgemma", true);

        assert!(store.surgeries_loaded);
        let names: Vec<&str> = store.surgeries.iter().map(|s| s.name.as_str()).collect();
        // Certification is stopword-filtered, the rest renamed, newest first.
        assert_eq!(names, vec!["Transplant of kidney", "Mammography"]);
        assert_eq!(store.surgeries[0].date, "2016-09-14");
        assert_eq!(store.surgeries[1].date, "2012-04-02");
    }

    #[test]
    fn reload_does_not_duplicate_by_name() {
        let bundle = RecordBundle::from_json(PROCEDURE_BUNDLE).unwrap();
        let client = MockChatClient::failing();
        let mut store = DataStore::new();

        load_surgeries_with(&mut store, &bundle, &client, "medgemma", false);
        let first_count = store.surgeries.len();
        load_surgeries_with(&mut store, &bundle, &client, "medgemma", false);
        assert_eq!(store.surgeries.len(), first_count);
    }
}
