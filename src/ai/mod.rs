pub mod gemini;
pub mod prompts;
pub mod strategist;

use serde::{Deserialize, Serialize};

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    /// Ask the model for a bare JSON document instead of prose.
    #[serde(default)]
    pub json_output: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AiError(pub String);

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Generator ─────────────────────────────────────────

/// A text-generation backend. Calls block; run them off the async executor.
pub trait Generator: Send + Sync {
    /// Whether the server holds the credential this backend needs.
    fn is_configured(&self) -> bool;

    fn complete(&self, req: &AiRequest) -> Result<AiResponse, AiError>;
}

// ── Helpers ───────────────────────────────────────────

/// Remove a Markdown code fence wrapped around a model reply
/// (```` ```json ... ``` ```` or a bare ```` ``` ````), if present.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(nl) if rest[..nl].trim().chars().all(|c| c.is_ascii_alphanumeric()) => &rest[nl + 1..],
        _ => return trimmed,
    };
    body.strip_suffix("```").unwrap_or(body).trim()
}
