use serde_json::{json, Value};
use std::time::Duration;

use super::{AiError, AiRequest, AiResponse, Generator};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub struct GeminiGenerator {
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl GeminiGenerator {
    pub fn new(api_key: Option<String>, model: &str, timeout: Duration) -> Self {
        GeminiGenerator {
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.to_string(),
            timeout,
        }
    }

    fn request_body(req: &AiRequest) -> Value {
        let mut generation_config = json!({});
        if req.json_output {
            generation_config["responseMimeType"] = json!("application/json");
        }
        if let Some(max) = req.max_tokens {
            generation_config["maxOutputTokens"] = json!(max);
        }
        if let Some(temp) = req.temperature {
            generation_config["temperature"] = json!(temp);
        }

        json!({
            "systemInstruction": {"parts": [{"text": req.system}]},
            "contents": [{"role": "user", "parts": [{"text": req.prompt}]}],
            "generationConfig": generation_config,
        })
    }
}

impl Generator for GeminiGenerator {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn complete(&self, req: &AiRequest) -> Result<AiResponse, AiError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AiError("Gemini API key not configured".into()))?;

        let url = format!("{}/{}:generateContent", API_BASE, self.model);

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AiError(format!("HTTP client error: {}", e)))?;

        let resp = client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", api_key)
            .json(&Self::request_body(req))
            .send()
            .map_err(|e| AiError(format!("Gemini request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().unwrap_or_default();
            return Err(AiError(format!("Gemini returned {}: {}", status, text)));
        }

        let json: Value = resp
            .json()
            .map_err(|e| AiError(format!("Gemini JSON parse error: {}", e)))?;

        let text = candidate_text(&json);
        if text.is_empty() {
            let reason = json
                .pointer("/candidates/0/finishReason")
                .or_else(|| json.pointer("/promptFeedback/blockReason"))
                .and_then(|r| r.as_str())
                .unwrap_or("no candidates");
            return Err(AiError(format!("Gemini returned no text ({})", reason)));
        }

        Ok(AiResponse {
            text,
            provider: "gemini".into(),
            model: self.model.clone(),
        })
    }
}

/// Concatenated text parts of the first candidate.
fn candidate_text(json: &Value) -> String {
    json.pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_key_counts_as_unconfigured() {
        let g = GeminiGenerator::new(Some("  ".into()), "gemini-2.5-pro", Duration::from_secs(5));
        assert!(!g.is_configured());
        let err = g
            .complete(&AiRequest {
                system: String::new(),
                prompt: String::new(),
                max_tokens: None,
                temperature: None,
                json_output: true,
            })
            .unwrap_err();
        assert!(err.0.contains("not configured"));
    }

    #[test]
    fn body_requests_json_with_system_instruction() {
        let body = GeminiGenerator::request_body(&AiRequest {
            system: "sys".into(),
            prompt: "user".into(),
            max_tokens: None,
            temperature: None,
            json_output: true,
        });
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "user");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert!(body["generationConfig"].get("temperature").is_none());
    }

    #[test]
    fn joins_candidate_parts() {
        let json = json!({"candidates": [{"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}}]});
        assert_eq!(candidate_text(&json), "{\"a\":1}");
        assert_eq!(candidate_text(&json!({})), "");
    }
}
