use super::{prompts, strip_code_fence, AiError, AiRequest, Generator};
use crate::models::settings::Settings;
use crate::models::strategy::AiFullStrategyResponse;
use crate::sanitize;

/// Build the request for one strategy run.
pub fn strategy_request(settings: &Settings, blog_content: &str) -> AiRequest {
    AiRequest {
        system: prompts::strategist_system(settings),
        prompt: prompts::strategist_user(blog_content),
        max_tokens: None,
        temperature: None,
        json_output: true,
    }
}

/// Parse a model reply into a strategy and clean every variant's markup.
pub fn parse_strategy(text: &str) -> Result<AiFullStrategyResponse, AiError> {
    log::debug!("AI raw response: {}", truncate(text, 500));

    let mut strategy: AiFullStrategyResponse = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| {
            log::warn!("Failed to parse strategy JSON: {}", truncate(text, 300));
            AiError(e.to_string())
        })?;

    strategy.validate().map_err(AiError)?;

    let mut changed = 0usize;
    for variant in strategy.variants_mut() {
        if !variant.html_block.is_empty() {
            let cleaned = sanitize::clean_cta_block(&variant.html_block);
            if cleaned != variant.html_block {
                changed += 1;
            }
            variant.html_block = cleaned;
        }
    }
    log::debug!("Sanitizer rewrote {} variant block(s)", changed);

    Ok(strategy)
}

/// One blocking round trip: prompt, call, parse, sanitize. No retries.
pub fn generate_strategy(
    generator: &dyn Generator,
    settings: &Settings,
    blog_content: &str,
) -> Result<AiFullStrategyResponse, AiError> {
    let req = strategy_request(settings, blog_content);
    let resp = generator.complete(&req).map_err(|e| {
        log::warn!("Strategy generation failed: {}", e.0);
        e
    })?;
    log::info!(
        "Strategy generated by {} ({}), {} chars",
        resp.provider,
        resp.model,
        resp.text.len()
    );
    parse_strategy(&resp.text)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
