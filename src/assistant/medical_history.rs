use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::capture::{merge_pending, CaptureSlot};
use super::functions::AssistantFunction;
use super::{AssistantError, AssistantSession};
use crate::chat::{ChatClient, ChatError};
use crate::models::Condition;

pub const MEDICAL_HISTORY_SYSTEM_PROMPT: &str = "\
Pretend you are a nurse. Your job is to answer information about the patient's medical history. \
You have the ability to add a medical history condition by calling the update_medical_history function. \
Only call the update_medical_history function if you know both the condition name and if it's active or inactive. \
You do not have the ability to delete a medical history from the patient's list. \
Please use everyday layman terms and avoid using complex medical terminology. \
Only ask one question or prompt at a time, and keep your questions brief (one to two short sentences).";

pub const MEDICAL_HISTORY_GREETING: &str = "Do you have any questions about your medical history?";

/// Summary of current conditions for the system prompt. `None` when the
/// list is empty.
pub fn current_condition_summary(conditions: &[Condition]) -> Option<String> {
    if conditions.is_empty() {
        return None;
    }
    let mut details = String::from(
        "The patient has had several conditions in their medical history described in the following sentences.",
    );
    for condition in conditions {
        let state = if condition.active { "active" } else { "inactive" };
        details.push_str(&format!(
            "The patient has the condition {} and it is currently an {} condition.\n",
            condition.name, state
        ));
    }
    Some(details)
}

#[derive(Deserialize)]
struct UpdateMedicalHistoryArgs {
    condition: String,
    /// The model reports "active" or "inactive" as a string.
    active: String,
}

/// `update_medical_history`: called once the model knows the condition
/// name and whether it is active.
pub struct UpdateMedicalHistoryFunction {
    slot: Arc<CaptureSlot<Condition>>,
}

impl UpdateMedicalHistoryFunction {
    pub fn new(slot: Arc<CaptureSlot<Condition>>) -> Self {
        Self { slot }
    }
}

impl AssistantFunction for UpdateMedicalHistoryFunction {
    fn name(&self) -> &'static str {
        "update_medical_history"
    }

    fn description(&self) -> &'static str {
        "If the patient wants to add to their medical history and they've given you the \
         condition name and if it's an active or inactive condition, call the \
         update_medical_history function to add it."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "condition": {
                    "type": "string",
                    "description": "The medical history condition name the patient wants to create."
                },
                "active": {
                    "type": "string",
                    "description": "If the condition is active or inactive."
                }
            },
            "required": ["condition", "active"]
        })
    }

    fn execute(&self, arguments: &Value) -> Result<Option<String>, AssistantError> {
        let args: UpdateMedicalHistoryArgs = serde_json::from_value(arguments.clone())
            .map_err(|e| AssistantError::MalformedArguments {
                function: self.name(),
                message: e.to_string(),
            })?;
        let active = args.active == "active";
        self.slot.capture(Condition::new(args.condition, active));
        Ok(None)
    }
}

/// Chat assistant for the medical-history screen.
pub struct MedicalHistoryAssistant {
    session: AssistantSession,
    slot: Arc<CaptureSlot<Condition>>,
}

impl MedicalHistoryAssistant {
    pub fn new(model: &str, current: &[Condition]) -> Self {
        let mut session = AssistantSession::new(
            model,
            MEDICAL_HISTORY_SYSTEM_PROMPT,
            MEDICAL_HISTORY_GREETING,
        );
        session.prime(current_condition_summary(current));
        Self {
            session,
            slot: Arc::new(CaptureSlot::new()),
        }
    }

    pub fn run_turn<C: ChatClient>(
        &mut self,
        client: &C,
        user_input: &str,
        conditions: &mut Vec<Condition>,
    ) -> Result<String, ChatError> {
        let function = UpdateMedicalHistoryFunction::new(Arc::clone(&self.slot));
        let functions: [&dyn AssistantFunction; 1] = [&function];
        let reply = self.session.send(client, &functions, user_input)?;
        merge_pending(&self.slot, conditions);
        Ok(reply)
    }

    pub fn transcript(&self) -> &crate::chat::ChatSession {
        self.session.transcript()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatTurn, MockChatClient, ToolCall};

    #[test]
    fn summary_reports_active_state() {
        let summary = current_condition_summary(&[
            Condition::new("Asthma", true),
            Condition::new("Chickenpox", false),
        ])
        .unwrap();
        assert!(summary.contains("Asthma and it is currently an active condition"));
        assert!(summary.contains("Chickenpox and it is currently an inactive condition"));
    }

    #[test]
    fn function_call_appends_condition() {
        let client = MockChatClient::with_turns(vec![ChatTurn {
            content: "Added asthma as an active condition.".into(),
            tool_calls: vec![ToolCall {
                name: "update_medical_history".into(),
                arguments: json!({"condition": "Asthma", "active": "active"}),
            }],
        }]);
        let mut assistant = MedicalHistoryAssistant::new("medgemma", &[]);
        let mut conditions = Vec::new();

        assistant
            .run_turn(&client, "I have asthma, it's active", &mut conditions)
            .unwrap();
        assert_eq!(conditions, vec![Condition::new("Asthma", true)]);
    }

    #[test]
    fn non_active_string_maps_to_inactive() {
        let client = MockChatClient::with_turns(vec![ChatTurn {
            content: "Added.".into(),
            tool_calls: vec![ToolCall {
                name: "update_medical_history".into(),
                arguments: json!({"condition": "Chickenpox", "active": "inactive"}),
            }],
        }]);
        let mut assistant = MedicalHistoryAssistant::new("medgemma", &[]);
        let mut conditions = Vec::new();

        assistant
            .run_turn(&client, "Chickenpox as a child", &mut conditions)
            .unwrap();
        assert_eq!(conditions, vec![Condition::new("Chickenpox", false)]);
    }

    #[test]
    fn plain_turn_adds_nothing() {
        let client = MockChatClient::new("Your asthma is listed as active.");
        let mut assistant = MedicalHistoryAssistant::new("medgemma", &[Condition::new("Asthma", true)]);
        let mut conditions = vec![Condition::new("Asthma", true)];

        assistant
            .run_turn(&client, "Is my asthma on file?", &mut conditions)
            .unwrap();
        assert_eq!(conditions.len(), 1);
    }
}
