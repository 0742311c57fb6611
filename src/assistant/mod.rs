//! Per-domain chat assistants.
//!
//! Each assistant owns a chat transcript seeded with a nurse-persona
//! prompt, a greeting inserted at the front, and a system message
//! summarizing the patient's current records. Domains that allow adding
//! records declare one callable function whose output lands in a
//! [`CaptureSlot`] and is merged into the owning list exactly once per
//! distinct record.

pub mod allergy;
pub mod capture;
pub mod functions;
pub mod medical_history;
pub mod medication;

pub use allergy::AllergyAssistant;
pub use capture::{merge_pending, CaptureSlot};
pub use functions::{dispatch_tool_calls, AssistantFunction};
pub use medical_history::MedicalHistoryAssistant;
pub use medication::MedicationAssistant;

use thiserror::Error;

use crate::chat::{ChatClient, ChatError, ChatSession, ToolDefinition};

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("Malformed arguments for {function}: {message}")]
    MalformedArguments {
        function: &'static str,
        message: String,
    },
}

/// Shared per-domain assistant shape: transcript + model + turn loop.
pub struct AssistantSession {
    session: ChatSession,
    model: String,
}

impl AssistantSession {
    /// A session with fixed instructions and a greeting shown before the
    /// first patient message.
    pub fn new(model: &str, system_prompt: &str, greeting: &str) -> Self {
        let mut session = ChatSession::with_system_prompt(system_prompt);
        session.insert_assistant_message(0, greeting);
        Self {
            session,
            model: model.to_string(),
        }
    }

    /// Append a patient-data summary as a system message.
    pub fn prime(&mut self, summary: Option<String>) {
        if let Some(summary) = summary {
            self.session.append_system_message(summary);
        }
    }

    /// One conversational turn: send the patient message, run any
    /// function calls the model makes, record and return the reply.
    pub fn send<C: ChatClient>(
        &mut self,
        client: &C,
        functions: &[&dyn AssistantFunction],
        user_input: &str,
    ) -> Result<String, ChatError> {
        self.session.append_user_message(user_input);

        let definitions: Vec<ToolDefinition> =
            functions.iter().map(|f| f.definition()).collect();
        let turn = client.chat(&self.model, self.session.messages(), &definitions)?;

        dispatch_tool_calls(functions, &turn.tool_calls);

        if !turn.content.is_empty() {
            self.session.append_assistant_message(&turn.content);
        }
        Ok(turn.content)
    }

    pub fn transcript(&self) -> &ChatSession {
        &self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatRole, MockChatClient};

    #[test]
    fn greeting_precedes_instructions() {
        let session = AssistantSession::new("medgemma", "instructions", "Hello!");
        let messages = session.transcript().messages();
        assert_eq!(messages[0].role, ChatRole::Assistant);
        assert_eq!(messages[0].content, "Hello!");
        assert_eq!(messages[1].role, ChatRole::System);
    }

    #[test]
    fn prime_appends_system_summary() {
        let mut session = AssistantSession::new("medgemma", "instructions", "Hello!");
        session.prime(Some("The patient has allergy Peanuts.".into()));
        let last = session.transcript().messages().last().unwrap();
        assert_eq!(last.role, ChatRole::System);

        let before = session.transcript().messages().len();
        session.prime(None);
        assert_eq!(session.transcript().messages().len(), before);
    }

    #[test]
    fn send_records_both_sides_of_the_turn() {
        let client = MockChatClient::new("You listed one allergy.");
        let mut session = AssistantSession::new("medgemma", "instructions", "Hello!");
        let reply = session.send(&client, &[], "What are my allergies?").unwrap();
        assert_eq!(reply, "You listed one allergy.");

        let messages = session.transcript().messages();
        assert_eq!(messages[messages.len() - 2].role, ChatRole::User);
        assert_eq!(messages[messages.len() - 1].role, ChatRole::Assistant);
    }

    #[test]
    fn failed_turn_surfaces_error() {
        let client = MockChatClient::failing();
        let mut session = AssistantSession::new("medgemma", "instructions", "Hello!");
        assert!(session.send(&client, &[], "hi").is_err());
    }
}
