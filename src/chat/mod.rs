//! Chat layer: session transcript, callable-tool declarations, and the
//! Ollama-backed client the assistants and the surgery refiner share.

pub mod ollama;
pub mod session;
pub mod tools;

pub use ollama::{ChatClient, ChatTurn, MockChatClient, OllamaChatClient};
pub use session::{ChatMessage, ChatRole, ChatSession};
pub use tools::{ToolCall, ToolDefinition};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Ollama is not running at {0}")]
    Connection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    Endpoint { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("Assistant returned an empty response")]
    EmptyResponse,

    #[error("No compatible assistant model available")]
    NoModelAvailable,
}
