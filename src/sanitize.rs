//! Best-effort cleanup of AI-authored CTA markup.
//!
//! This is textual rewriting, not parsing. It strips the obvious injection
//! vectors (script blocks, inline handlers, `javascript:` links) and filler
//! text, but obfuscated markup can slip through. Previews are additionally
//! isolated, see `render::SandboxedPreview`.

use regex::{Captures, Regex};
use std::sync::OnceLock;

/// Tags kept even when empty: icon carriers and SVG primitives.
const KEEP_WHEN_EMPTY: &[&str] = &[
    "i", "span", "svg", "path", "rect", "circle", "line", "polyline", "polygon",
];

struct Patterns {
    script: Regex,
    event_handler: Regex,
    inline_style: Regex,
    javascript_href: Regex,
    lorem: Regex,
    empty_element: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        script: Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap(),
        event_handler: Regex::new(r#"(?i)\s(on\w+)=("([^"]*)"|'([^']*)'|[^>\s]+)"#).unwrap(),
        inline_style: Regex::new(r#"(?i)\sstyle=("([^"]*)"|'([^']*)')"#).unwrap(),
        javascript_href: Regex::new(r#"(?i)href="javascript:[^"]*""#).unwrap(),
        lorem: Regex::new(r"(?i)lorem ipsum[a-z\s,.]*").unwrap(),
        empty_element: Regex::new(r"<([a-zA-Z0-9]+)[^>]*>\s*</([a-zA-Z0-9]+)>").unwrap(),
    })
}

/// Remove script blocks, `on*=` handlers and inline styles; neutralise
/// `javascript:` links.
pub fn sanitize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let p = patterns();
    let out = p.script.replace_all(html, "");
    let out = p.event_handler.replace_all(&out, "");
    let out = p.inline_style.replace_all(&out, "");
    let out = p.javascript_href.replace_all(&out, r##"href="#""##);
    out.into_owned()
}

/// Drop lorem-ipsum filler, then any element left with nothing but
/// whitespace inside, unless it is an icon-bearing tag.
pub fn strip_filler(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let p = patterns();
    let without_lorem = p.lorem.replace_all(html, "");
    p.empty_element
        .replace_all(&without_lorem, |caps: &Captures| {
            let open = &caps[1];
            let close = &caps[2];
            let keep = KEEP_WHEN_EMPTY.iter().any(|t| t.eq_ignore_ascii_case(open));
            if open.eq_ignore_ascii_case(close) && !keep {
                String::new()
            } else {
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// The full pass applied to every generated variant.
pub fn clean_cta_block(html: &str) -> String {
    strip_filler(&sanitize_html(html))
}
