use std::io::{BufRead, BufReader};
use std::sync::mpsc;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::session::ChatMessage;
use super::tools::{ToolCall, ToolDefinition};
use super::ChatError;
use crate::config;

/// Preferred assistant models in order of preference.
const ASSISTANT_MODELS: &[&str] = &["medgemma", "llama3.2", "llama3.1", "mistral"];

/// One completed model turn: the concatenated streamed text plus any
/// function calls the model made.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatTurn {
    pub content: String,
    pub tool_calls: Vec<ToolCall>,
}

/// Chat completion client abstraction (allows mocking).
pub trait ChatClient {
    /// Run one turn, returning the full response once streaming finishes.
    fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatTurn, ChatError>;

    /// Run one turn, forwarding each text fragment as it arrives.
    fn chat_streaming(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        token_tx: &mpsc::Sender<String>,
    ) -> Result<ChatTurn, ChatError>;

    fn is_model_available(&self, model: &str) -> Result<bool, ChatError>;

    fn list_models(&self) -> Result<Vec<String>, ChatError>;
}

// ═══════════════════════════════════════════════════════════
// OllamaChatClient
// ═══════════════════════════════════════════════════════════

/// Ollama `/api/chat` client for local LLM inference.
pub struct OllamaChatClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaChatClient {
    /// Create a client pointing at an Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(5))
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with 5-minute timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", 300)
    }

    /// Client configured from the environment (`OLLAMA_HOST`).
    pub fn from_env() -> Self {
        Self::new(&config::ollama_base_url(), 300)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Find the best available assistant model.
    pub fn find_best_model(&self) -> Result<String, ChatError> {
        let available = self.list_models()?;
        for preferred in ASSISTANT_MODELS {
            if available.iter().any(|m| m.starts_with(preferred)) {
                return Ok(preferred.to_string());
            }
        }
        Err(ChatError::NoModelAvailable)
    }

    fn transport_error(&self, e: reqwest::Error) -> ChatError {
        if e.is_connect() {
            ChatError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            ChatError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
        } else {
            ChatError::HttpClient(e.to_string())
        }
    }

    fn run_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        token_tx: Option<&mpsc::Sender<String>>,
    ) -> Result<ChatTurn, ChatError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest {
            model,
            messages,
            stream: true,
            tools: tools.iter().map(ToolPayload::from).collect(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        // Ollama streams newline-delimited JSON chunks until done: true.
        let mut turn = ChatTurn::default();
        let reader = BufReader::new(response);
        for line in reader.lines() {
            let line = line.map_err(|e| ChatError::HttpClient(e.to_string()))?;
            if line.trim().is_empty() {
                continue;
            }
            let chunk: OllamaChatChunk = serde_json::from_str(&line)
                .map_err(|e| ChatError::ResponseParsing(e.to_string()))?;

            if let Some(message) = chunk.message {
                if !message.content.is_empty() {
                    if let Some(tx) = token_tx {
                        // Receiver hang-up is not an error; keep accumulating.
                        let _ = tx.send(message.content.clone());
                    }
                    turn.content.push_str(&message.content);
                }
                for call in message.tool_calls {
                    turn.tool_calls.push(ToolCall {
                        name: call.function.name,
                        arguments: call.function.arguments,
                    });
                }
            }

            if chunk.done {
                break;
            }
        }

        Ok(turn)
    }
}

impl ChatClient for OllamaChatClient {
    fn chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
    ) -> Result<ChatTurn, ChatError> {
        self.run_chat(model, messages, tools, None)
    }

    fn chat_streaming(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        token_tx: &mpsc::Sender<String>,
    ) -> Result<ChatTurn, ChatError> {
        self.run_chat(model, messages, tools, Some(token_tx))
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ChatError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, ChatError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ChatError::Endpoint {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| ChatError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

// ── Wire types ──────────────────────────────────────────────

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolPayload<'a>>,
}

#[derive(Serialize)]
struct ToolPayload<'a> {
    r#type: &'static str,
    function: &'a ToolDefinition,
}

impl<'a> From<&'a ToolDefinition> for ToolPayload<'a> {
    fn from(definition: &'a ToolDefinition) -> Self {
        Self {
            r#type: "function",
            function: definition,
        }
    }
}

#[derive(Deserialize)]
struct OllamaChatChunk {
    message: Option<OllamaChunkMessage>,
    #[serde(default)]
    done: bool,
}

#[derive(Deserialize)]
struct OllamaChunkMessage {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tool_calls: Vec<OllamaToolCall>,
}

#[derive(Deserialize)]
struct OllamaToolCall {
    function: OllamaFunctionCall,
}

#[derive(Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

// ═══════════════════════════════════════════════════════════
// MockChatClient — scripted turns for tests
// ═══════════════════════════════════════════════════════════

enum ScriptedTurn {
    Reply(ChatTurn),
    ConnectionFailure,
}

/// Mock chat client that plays back scripted turns in order.
///
/// When the script runs out, the last reply repeats. A client built
/// with [`MockChatClient::failing`] errors on every call.
pub struct MockChatClient {
    script: Mutex<Vec<ScriptedTurn>>,
    cursor: Mutex<usize>,
    available_models: Vec<String>,
}

impl MockChatClient {
    /// Single text reply, repeated for every turn.
    pub fn new(response: &str) -> Self {
        Self::with_turns(vec![ChatTurn {
            content: response.to_string(),
            tool_calls: Vec::new(),
        }])
    }

    /// Scripted sequence of full turns.
    pub fn with_turns(turns: Vec<ChatTurn>) -> Self {
        Self {
            script: Mutex::new(turns.into_iter().map(ScriptedTurn::Reply).collect()),
            cursor: Mutex::new(0),
            available_models: vec!["medgemma:latest".to_string()],
        }
    }

    /// Client whose every call fails with a connection error.
    pub fn failing() -> Self {
        Self {
            script: Mutex::new(vec![ScriptedTurn::ConnectionFailure]),
            cursor: Mutex::new(0),
            available_models: Vec::new(),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    fn next_turn(&self) -> Result<ChatTurn, ChatError> {
        let script = self.script.lock().expect("script lock");
        let mut cursor = self.cursor.lock().expect("cursor lock");
        let index = (*cursor).min(script.len().saturating_sub(1));
        *cursor += 1;
        match &script[index] {
            ScriptedTurn::Reply(turn) => Ok(turn.clone()),
            ScriptedTurn::ConnectionFailure => {
                Err(ChatError::Connection("http://localhost:11434".into()))
            }
        }
    }
}

impl ChatClient for MockChatClient {
    fn chat(
        &self,
        _model: &str,
        _messages: &[ChatMessage],
        _tools: &[ToolDefinition],
    ) -> Result<ChatTurn, ChatError> {
        self.next_turn()
    }

    fn chat_streaming(
        &self,
        model: &str,
        messages: &[ChatMessage],
        tools: &[ToolDefinition],
        token_tx: &mpsc::Sender<String>,
    ) -> Result<ChatTurn, ChatError> {
        let turn = self.chat(model, messages, tools)?;
        if !turn.content.is_empty() {
            let _ = token_tx.send(turn.content.clone());
        }
        Ok(turn)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, ChatError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, ChatError> {
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn mock_client_repeats_last_reply() {
        let client = MockChatClient::new("hello");
        assert_eq!(client.chat("m", &[], &[]).unwrap().content, "hello");
        assert_eq!(client.chat("m", &[], &[]).unwrap().content, "hello");
    }

    #[test]
    fn mock_client_plays_scripted_turns_in_order() {
        let client = MockChatClient::with_turns(vec![
            ChatTurn {
                content: "first".into(),
                tool_calls: Vec::new(),
            },
            ChatTurn {
                content: "second".into(),
                tool_calls: Vec::new(),
            },
        ]);
        assert_eq!(client.chat("m", &[], &[]).unwrap().content, "first");
        assert_eq!(client.chat("m", &[], &[]).unwrap().content, "second");
        assert_eq!(client.chat("m", &[], &[]).unwrap().content, "second");
    }

    #[test]
    fn failing_client_errors() {
        let client = MockChatClient::failing();
        assert!(matches!(
            client.chat("m", &[], &[]),
            Err(ChatError::Connection(_))
        ));
    }

    #[test]
    fn mock_streaming_forwards_content() {
        let client = MockChatClient::new("token stream");
        let (tx, rx) = mpsc::channel();
        let turn = client.chat_streaming("m", &[], &[], &tx).unwrap();
        assert_eq!(turn.content, "token stream");
        assert_eq!(rx.recv().unwrap(), "token stream");
    }

    #[test]
    fn chunk_parsing_collects_tool_calls() {
        let line = r#"{"message":{"role":"assistant","content":"","tool_calls":[{"function":{"name":"update_allergies","arguments":{"allergy_name":"Peanuts","allergy_reaction":"Hives"}}}]},"done":false}"#;
        let chunk: OllamaChatChunk = serde_json::from_str(line).unwrap();
        let message = chunk.message.unwrap();
        assert_eq!(message.tool_calls.len(), 1);
        assert_eq!(message.tool_calls[0].function.name, "update_allergies");
        assert_eq!(
            message.tool_calls[0].function.arguments,
            json!({"allergy_name": "Peanuts", "allergy_reaction": "Hives"})
        );
    }

    #[test]
    fn request_omits_tools_when_empty() {
        let request = OllamaChatRequest {
            model: "medgemma",
            messages: &[],
            stream: true,
            tools: Vec::new(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("tools"));
    }

    #[test]
    fn constructor_trims_trailing_slash() {
        let client = OllamaChatClient::new("http://localhost:11434/", 60);
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn default_local_uses_standard_port() {
        let client = OllamaChatClient::default_local();
        assert_eq!(client.base_url(), "http://localhost:11434");
    }

    #[test]
    fn model_preference_order() {
        assert_eq!(ASSISTANT_MODELS[0], "medgemma");
        assert!(ASSISTANT_MODELS.len() >= 3);
    }
}
