use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Value};

use super::capture::{merge_pending, CaptureSlot};
use super::functions::AssistantFunction;
use super::{AssistantError, AssistantSession};
use crate::chat::{ChatClient, ChatError};
use crate::models::Allergy;

pub const ALLERGY_SYSTEM_PROMPT: &str = "\
Pretend you are a nurse. Your job is to answer information about the patient's allergies. \
You have the ability to add an allergy if the patient tells you to by calling the update_allergies function. \
Only call the update_allergies function if the patient has given you both the allergy name and the allergy reaction type. \
You do not have the ability to delete an allergy from the patient's list. \
Please use everyday layman terms and avoid using complex medical terminology. \
Only ask one question or prompt at a time, and keep your questions brief (one to two short sentences).";

pub const ALLERGY_GREETING: &str = "Do you have any questions about your allergies?";

/// Summary of the patient's current allergies, fed to the model as a
/// system message. `None` when the list is empty.
pub fn current_allergy_summary(allergies: &[Allergy]) -> Option<String> {
    if allergies.is_empty() {
        return None;
    }
    let mut details =
        String::from("The patient has several allergies described in the next sentences.");
    for allergy in allergies {
        match allergy.reactions.first() {
            Some(reaction) => {
                details.push_str(&format!(
                    "The patient has allergy {} with the reaction {}.\n",
                    allergy.name, reaction
                ));
            }
            None => {
                details.push_str(&format!("The patient has allergy {}.\n", allergy.name));
            }
        }
    }
    Some(details)
}

#[derive(Deserialize)]
struct UpdateAllergiesArgs {
    allergy_name: String,
    allergy_reaction: String,
}

/// `update_allergies`: the model calls this once the patient has named
/// both the allergy and the reaction.
pub struct UpdateAllergiesFunction {
    slot: Arc<CaptureSlot<Allergy>>,
}

impl UpdateAllergiesFunction {
    pub fn new(slot: Arc<CaptureSlot<Allergy>>) -> Self {
        Self { slot }
    }
}

impl AssistantFunction for UpdateAllergiesFunction {
    fn name(&self) -> &'static str {
        "update_allergies"
    }

    fn description(&self) -> &'static str {
        "If the patient wants to add an allergy and they've given you the allergy name \
         and the reaction they have to the allergy, call the update_allergies function to add it."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "allergy_name": {
                    "type": "string",
                    "description": "The allergy name the patient wants to create."
                },
                "allergy_reaction": {
                    "type": "string",
                    "description": "The reaction of the allergy the patient wants to create."
                }
            },
            "required": ["allergy_name", "allergy_reaction"]
        })
    }

    fn execute(&self, arguments: &Value) -> Result<Option<String>, AssistantError> {
        let args: UpdateAllergiesArgs = serde_json::from_value(arguments.clone())
            .map_err(|e| AssistantError::MalformedArguments {
                function: self.name(),
                message: e.to_string(),
            })?;
        self.slot
            .capture(Allergy::new(args.allergy_name, vec![args.allergy_reaction]));
        Ok(None)
    }
}

/// Chat assistant for the allergy screen.
pub struct AllergyAssistant {
    session: AssistantSession,
    slot: Arc<CaptureSlot<Allergy>>,
}

impl AllergyAssistant {
    pub fn new(model: &str, current: &[Allergy]) -> Self {
        let mut session = AssistantSession::new(model, ALLERGY_SYSTEM_PROMPT, ALLERGY_GREETING);
        session.prime(current_allergy_summary(current));
        Self {
            session,
            slot: Arc::new(CaptureSlot::new()),
        }
    }

    /// One turn; any allergy the model captured is appended to the
    /// owning list before returning.
    pub fn run_turn<C: ChatClient>(
        &mut self,
        client: &C,
        user_input: &str,
        allergies: &mut Vec<Allergy>,
    ) -> Result<String, ChatError> {
        let function = UpdateAllergiesFunction::new(Arc::clone(&self.slot));
        let functions: [&dyn AssistantFunction; 1] = [&function];
        let reply = self.session.send(client, &functions, user_input)?;
        merge_pending(&self.slot, allergies);
        Ok(reply)
    }

    pub fn transcript(&self) -> &crate::chat::ChatSession {
        self.session.transcript()
    }
}
