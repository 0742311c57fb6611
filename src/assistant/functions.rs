use serde_json::Value;

use super::AssistantError;
use crate::chat::{ToolCall, ToolDefinition};

/// A callable capability declared to the assistant model.
///
/// The model decides when it has gathered enough information to call;
/// `execute` validates the extracted arguments and performs the effect
/// (typically capturing a record into a slot).
pub trait AssistantFunction {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// JSON schema of the arguments the model must provide.
    fn parameters(&self) -> Value;

    /// Run the function. The optional string is fed back to the model
    /// as the tool result.
    fn execute(&self, arguments: &Value) -> Result<Option<String>, AssistantError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(self.name(), self.description(), self.parameters())
    }
}

/// Run every tool call against the matching function.
///
/// Unknown function names and argument errors are logged and skipped: a
/// bad call must not poison the conversation.
pub fn dispatch_tool_calls(functions: &[&dyn AssistantFunction], calls: &[ToolCall]) {
    for call in calls {
        let Some(function) = functions.iter().find(|f| f.name() == call.name) else {
            tracing::warn!(function = %call.name, "model called an undeclared function");
            continue;
        };
        match function.execute(&call.arguments) {
            Ok(_) => {
                tracing::debug!(function = %call.name, "assistant function executed");
            }
            Err(e) => {
                tracing::warn!(function = %call.name, error = %e, "assistant function failed");
            }
        }
    }
}
