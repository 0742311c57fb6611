use std::env;

/// Application-level constants
pub const APP_NAME: &str = "Intake";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when `RUST_LOG` is not set.
pub fn default_log_filter() -> String {
    "intake=info".to_string()
}

/// Base URL of the local Ollama instance.
///
/// Honors `OLLAMA_HOST` (same variable the Ollama CLI uses),
/// defaulting to the standard local port.
pub fn ollama_base_url() -> String {
    env::var("OLLAMA_HOST")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "http://localhost:11434".to_string())
}

/// Whether the assistant-backed surgery refinement step runs.
///
/// `INTAKE_ASSISTANT_FILTERING=0` (or `false`) disables it; the
/// pipeline then stops at the stopword filter.
pub fn assistant_filtering_enabled() -> bool {
    match env::var("INTAKE_ASSISTANT_FILTERING") {
        Ok(v) => !matches!(v.trim(), "0" | "false" | "off"),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_name_is_intake() {
        assert_eq!(APP_NAME, "Intake");
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.1.0");
    }

    #[test]
    fn default_filter_scopes_to_crate() {
        assert!(default_log_filter().starts_with("intake"));
    }
}
