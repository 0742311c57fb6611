//! Patient-intake core.
//!
//! Converts read-only FHIR clinical records into editable intake lists,
//! filters the surgery list through a local LLM with a deterministic
//! fallback, and runs per-domain chat assistants that can append
//! structured records via declared callable functions.

pub mod assistant;
pub mod chat;
pub mod config;
pub mod fhir;
pub mod models;
pub mod pipeline;
pub mod store;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for binaries and integration harnesses.
///
/// Respects `RUST_LOG` when set, otherwise falls back to the
/// crate default filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
