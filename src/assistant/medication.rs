use super::AssistantSession;
use crate::chat::{ChatClient, ChatError};
use crate::models::Medication;

pub const MEDICATION_SYSTEM_PROMPT: &str = "\
Pretend you are a nurse. Your job is to answer information about the patient's medications. \
You do not have the ability to add or delete medications, so please tell the patient that. \
Please use everyday layman terms and avoid using complex medical terminology. \
Only ask one question or prompt at a time, and keep your questions brief (one to two short sentences).";

pub const MEDICATION_GREETING: &str = "Do you have any questions about your medications?";

/// Summary of current medications for the system prompt. `None` when the
/// list is empty.
pub fn current_medication_summary(medications: &[Medication]) -> Option<String> {
    if medications.is_empty() {
        return None;
    }
    let mut details = String::from("The patient is currently taking several medications:");
    for medication in medications {
        details.push_str(&format!(
            "The patient is taking medication {}, the dose is {}, and the frequency is {}.\n",
            medication.name, medication.dose, medication.frequency
        ));
    }
    Some(details)
}

/// Q&A-only assistant for the medication screen: no callable functions,
/// the medication list is read-only.
pub struct MedicationAssistant {
    session: AssistantSession,
}

impl MedicationAssistant {
    pub fn new(model: &str, current: &[Medication]) -> Self {
        let mut session =
            AssistantSession::new(model, MEDICATION_SYSTEM_PROMPT, MEDICATION_GREETING);
        session.prime(current_medication_summary(current));
        Self { session }
    }

    pub fn run_turn<C: ChatClient>(
        &mut self,
        client: &C,
        user_input: &str,
    ) -> Result<String, ChatError> {
        self.session.send(client, &[], user_input)
    }

    pub fn transcript(&self) -> &crate::chat::ChatSession {
        self.session.transcript()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MockChatClient;

    #[test]
    fn summary_includes_dose_and_frequency() {
        let summary = current_medication_summary(&[Medication::new(
            "Lisinopril",
            "10 mg",
            "once daily",
        )])
        .unwrap();
        assert!(summary.contains("medication Lisinopril"));
        assert!(summary.contains("dose is 10 mg"));
        assert!(summary.contains("frequency is once daily"));
    }

    #[test]
    fn turn_answers_without_mutating_anything() {
        let client = MockChatClient::new("You take Lisinopril once daily.");
        let mut assistant = MedicationAssistant::new(
            "medgemma",
            &[Medication::new("Lisinopril", "10 mg", "once daily")],
        );
        let reply = assistant.run_turn(&client, "What do I take?").unwrap();
        assert_eq!(reply, "You take Lisinopril once daily.");
    }
}
