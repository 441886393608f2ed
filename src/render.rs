//! HTML and SVG fragments produced outside the Tera templates: the
//! standalone preview document for a CTA variant, its code views, and the
//! picker's gradient surfaces.

use rocket::http::{ContentType, Header};
use rocket::response::{self, Responder};
use rocket::Request;

use crate::color::{ColorPicker, Rect};

// ── Preview options ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewTheme {
    #[default]
    Dark,
    Light,
}

impl PreviewTheme {
    pub const ALL: [PreviewTheme; 2] = [PreviewTheme::Dark, PreviewTheme::Light];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Unknown or missing values fall back to dark.
    pub fn from_query(s: Option<&str>) -> Self {
        match s {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }

    fn background(&self) -> &'static str {
        match self {
            Self::Dark => "#1f2937",
            Self::Light => "#ffffff",
        }
    }

    fn foreground(&self) -> &'static str {
        match self {
            Self::Dark => "#d1d5db",
            Self::Light => "#111827",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    pub fn from_query(s: Option<&str>) -> Self {
        match s {
            Some("tablet") => Self::Tablet,
            Some("mobile") => Self::Mobile,
            _ => Self::Desktop,
        }
    }

    pub fn width(&self) -> &'static str {
        match self {
            Self::Desktop => "100%",
            Self::Tablet => "768px",
            Self::Mobile => "375px",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop (100%)",
            Self::Tablet => "Tablet (768px)",
            Self::Mobile => "Mobile (375px)",
        }
    }
}

// ── Preview document ──────────────────────────────────

/// Full HTML document showing one variant on its own, with the shared
/// stylesheet in the head. The markup is embedded as-is; isolation comes
/// from how the document is served, see [`SandboxedPreview`].
pub fn preview_document(
    shared_css: &str,
    html_block: &str,
    theme: PreviewTheme,
    viewport: Viewport,
) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    {css}
    <style>
      body {{
        margin: 0;
        padding: 1rem;
        font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Helvetica, Arial, sans-serif;
        background-color: {bg};
        color: {fg};
        overflow-x: hidden;
        min-height: 100vh;
        display: flex;
        flex-direction: column;
        align-items: center;
        justify-content: center;
        box-sizing: border-box;
      }}
      .content-wrapper {{
        width: {width};
        max-width: 100%;
      }}
    </style>
  </head>
  <body>
    <div class="content-wrapper">
      {html}
    </div>
  </body>
</html>
"#,
        css = shared_css,
        bg = theme.background(),
        fg = theme.foreground(),
        width = viewport.width(),
        html = html_block,
    )
}

/// Code view text with banners saying where each part goes.
pub fn code_for_display(shared_css: &str, html_block: &str) -> String {
    format!(
        "<!-- ====== SHARED CSS ====== -->\n\
         <!-- Place this once on your page -->\n\
         {}\n\
         \n\
         <!-- ====== HTML BLOCK ====== -->\n\
         <!-- Place this where you want the CTA to appear -->\n\
         {}",
        shared_css, html_block
    )
}

pub fn code_for_clipboard(shared_css: &str, html_block: &str) -> String {
    format!("{}\n\n{}", shared_css, html_block)
}

/// The shared CSS without its `<style>` wrapper, for pasting into a stylesheet.
pub fn strip_style_tags(shared_css: &str) -> String {
    shared_css
        .replace("<style>", "")
        .replace("</style>", "")
        .trim()
        .to_string()
}

/// Preview HTML served under a CSP sandbox: opaque origin, no scripts, no
/// forms, no navigation of the embedding page.
pub struct SandboxedPreview(pub String);

pub const PREVIEW_CSP: &str = "sandbox; default-src 'none'; script-src 'none'; \
    style-src 'unsafe-inline' https:; img-src https: data:; font-src https: data:; \
    frame-ancestors 'self'";

impl<'r> Responder<'r, 'static> for SandboxedPreview {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = (ContentType::HTML, self.0).respond_to(req)?;
        resp.set_header(Header::new("Content-Security-Policy", PREVIEW_CSP));
        resp.set_header(Header::new("X-Frame-Options", "SAMEORIGIN"));
        resp.set_header(Header::new("X-Content-Type-Options", "nosniff"));
        resp.set_header(Header::new("Cache-Control", "no-store"));
        Ok(resp)
    }
}

// ── Picker surfaces ───────────────────────────────────

pub const PLANE_WIDTH: f64 = 240.0;
pub const PLANE_HEIGHT: f64 = 160.0;
pub const HUE_WIDTH: f64 = 16.0;
pub const HUE_HEIGHT: f64 = 160.0;

pub fn plane_rect() -> Rect {
    Rect::sized(PLANE_WIDTH, PLANE_HEIGHT)
}

pub fn hue_rect() -> Rect {
    Rect::sized(HUE_WIDTH, HUE_HEIGHT)
}

/// Saturation/value plane over the current hue, with a ring at the
/// pending color.
pub fn plane_svg(picker: &ColorPicker) -> String {
    let hsv = picker.hsv();
    let x = hsv.s / 100.0 * PLANE_WIDTH;
    let y = (1.0 - hsv.v / 100.0) * PLANE_HEIGHT;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <linearGradient id="sat" x1="0" y1="0" x2="1" y2="0">
      <stop offset="0" stop-color="#fff"/>
      <stop offset="1" stop-color="#fff" stop-opacity="0"/>
    </linearGradient>
    <linearGradient id="val" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0" stop-color="#000" stop-opacity="0"/>
      <stop offset="1" stop-color="#000"/>
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="{hue}"/>
  <rect width="{w}" height="{h}" fill="url(#sat)"/>
  <rect width="{w}" height="{h}" fill="url(#val)"/>
  <circle cx="{x:.1}" cy="{y:.1}" r="6" fill="none" stroke="#fff" stroke-width="2"/>
  <circle cx="{x:.1}" cy="{y:.1}" r="7" fill="none" stroke="#000" stroke-opacity="0.4"/>
</svg>"##,
        w = PLANE_WIDTH,
        h = PLANE_HEIGHT,
        hue = picker.hue_color().to_hex(),
        x = x,
        y = y,
    )
}

/// Vertical hue gradient with a bar at the current hue.
pub fn hue_svg(picker: &ColorPicker) -> String {
    let y = picker.hsv().h / 360.0 * HUE_HEIGHT;
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
  <defs>
    <linearGradient id="hue" x1="0" y1="0" x2="0" y2="1">
      <stop offset="0" stop-color="#ff0000"/>
      <stop offset="0.1667" stop-color="#ffff00"/>
      <stop offset="0.3333" stop-color="#00ff00"/>
      <stop offset="0.5" stop-color="#00ffff"/>
      <stop offset="0.6667" stop-color="#0000ff"/>
      <stop offset="0.8333" stop-color="#ff00ff"/>
      <stop offset="1" stop-color="#ff0000"/>
    </linearGradient>
  </defs>
  <rect width="{w}" height="{h}" fill="url(#hue)"/>
  <rect x="0" y="{top:.1}" width="{w}" height="4" fill="none" stroke="#fff" stroke-width="2"/>
</svg>"##,
        w = HUE_WIDTH,
        h = HUE_HEIGHT,
        top = (y - 2.0).clamp(0.0, HUE_HEIGHT - 4.0),
    )
}
