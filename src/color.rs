//! Color math and the state behind the brand color picker.
//!
//! Conversions follow the usual piecewise HSV formulas: hue in degrees
//! (0..=360), saturation and value in percent (0..=100), RGB channels as
//! bytes. A full hex -> HSV -> hex cycle lands within one unit per channel.

use crate::db::DbPool;
use crate::models::local_store::{LocalStore, COLOR_HISTORY_KEY};

/// Swatches offered before anything has been picked.
pub const DEFAULT_HISTORY: [&str; 6] = [
    "#cb3816", "#4f46e5", "#7c3aed", "#10b981", "#f59e0b", "#ef4444",
];

/// Most colors kept in the history strip.
pub const HISTORY_LIMIT: usize = 12;

// ── Representations ───────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub h: f64,
    pub s: f64,
    pub v: f64,
}

impl Rgb {
    /// Parse `#rgb` or `#rrggbb`, with or without the leading `#`.
    pub fn from_hex(input: &str) -> Option<Rgb> {
        let hex = input.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return None,
        };
        let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
        Some(Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_hsv(&self) -> Hsv {
        let r = self.r as f64 / 255.0;
        let g = self.g as f64 / 255.0;
        let b = self.b as f64 / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;

        let s = if max == 0.0 { 0.0 } else { d / max };
        let mut h = 0.0;
        if max != min {
            h = if max == r {
                (g - b) / d + if g < b { 6.0 } else { 0.0 }
            } else if max == g {
                (b - r) / d + 2.0
            } else {
                (r - g) / d + 4.0
            };
            h /= 6.0;
        }

        Hsv {
            h: h * 360.0,
            s: s * 100.0,
            v: max * 100.0,
        }
    }
}

impl Hsv {
    pub fn to_rgb(&self) -> Rgb {
        let s = self.s / 100.0;
        let v = self.v / 100.0;
        let sector = (self.h / 360.0) * 6.0;
        let i = sector.floor();
        let f = sector - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);

        let (r, g, b) = match (i as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Rgb {
            r: to_byte(r),
            g: to_byte(g),
            b: to_byte(b),
        }
    }
}

fn to_byte(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

// ── History ───────────────────────────────────────────

/// Recently committed colors, newest first, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistory {
    colors: Vec<String>,
}

impl Default for ColorHistory {
    fn default() -> Self {
        ColorHistory {
            colors: DEFAULT_HISTORY.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl ColorHistory {
    pub fn new(colors: Vec<String>) -> Self {
        let mut history = ColorHistory { colors: Vec::new() };
        for color in colors.into_iter().rev() {
            history.push(&color);
        }
        history
    }

    pub fn push(&mut self, color: &str) {
        self.colors.retain(|c| c != color);
        self.colors.insert(0, color.to_string());
        self.colors.truncate(HISTORY_LIMIT);
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }

    /// Stored history, or the default swatches when none is stored or the
    /// stored value is unreadable.
    pub fn load(pool: &DbPool) -> Self {
        match LocalStore::get_json::<Vec<String>>(pool, COLOR_HISTORY_KEY) {
            Ok(Some(colors)) => Self::new(colors),
            Ok(None) => Self::default(),
            Err(e) => {
                log::error!("Failed to load color history: {}", e);
                Self::default()
            }
        }
    }

    /// Push `color` onto the stored history in one transaction and return
    /// the result. On any storage failure the stored history is unchanged.
    pub fn record(pool: &DbPool, color: &str) -> Result<Self, String> {
        LocalStore::update_json(pool, COLOR_HISTORY_KEY, |stored: Option<Vec<String>>| {
            let mut history = stored.map(Self::new).unwrap_or_default();
            history.push(color);
            (Some(history.colors.clone()), history)
        })
    }
}

// ── Picker ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    H,
    S,
    V,
    R,
    G,
    B,
}

impl Channel {
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "h" => Some(Self::H),
            "s" => Some(Self::S),
            "v" => Some(Self::V),
            "r" => Some(Self::R),
            "g" => Some(Self::G),
            "b" => Some(Self::B),
            _ => None,
        }
    }
}

/// The two draggable surfaces of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Saturation left to right, value top to bottom.
    Plane,
    /// Hue top to bottom.
    HueBar,
}

/// Pixel box of a surface as laid out on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn sized(width: f64, height: f64) -> Self {
        Rect {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Pointer position as fractions of the box, clamped to 0..=1.
    fn fraction(&self, x: f64, y: f64) -> (f64, f64) {
        let fx = if self.width > 0.0 { (x - self.left) / self.width } else { 0.0 };
        let fy = if self.height > 0.0 { (y - self.top) / self.height } else { 0.0 };
        (fx.clamp(0.0, 1.0), fy.clamp(0.0, 1.0))
    }
}

/// An in-progress color selection. Nothing leaves the picker until
/// [`ColorPicker::commit`]; dropping it is the cancel path.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorPicker {
    initial: String,
    hsv: Hsv,
}

impl ColorPicker {
    pub fn open(initial: &str) -> Self {
        let rgb = Rgb::from_hex(initial).unwrap_or(Rgb { r: 0, g: 0, b: 0 });
        ColorPicker {
            initial: initial.to_string(),
            hsv: rgb.to_hsv(),
        }
    }

    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn hsv(&self) -> Hsv {
        self.hsv
    }

    pub fn rgb(&self) -> Rgb {
        self.hsv.to_rgb()
    }

    pub fn hex(&self) -> String {
        self.rgb().to_hex()
    }

    /// Fully saturated color at the current hue, the plane's backdrop.
    pub fn hue_color(&self) -> Rgb {
        Hsv {
            h: self.hsv.h,
            s: 100.0,
            v: 100.0,
        }
        .to_rgb()
    }

    /// Start a continuous drag on `surface`. The first position is applied
    /// immediately; the gesture ends when the returned guard is dropped.
    pub fn begin_drag(&mut self, surface: Surface, rect: Rect, x: f64, y: f64) -> Drag<'_> {
        let mut drag = Drag {
            picker: self,
            surface,
            rect,
        };
        drag.move_to(x, y);
        drag
    }

    /// Numeric entry for one channel. Non-numeric text is ignored and
    /// values are clamped to the channel's range.
    pub fn set_channel(&mut self, channel: Channel, input: &str) {
        let Some(value) = parse_leading_int(input) else {
            return;
        };
        match channel {
            Channel::R | Channel::G | Channel::B => {
                let byte = value.clamp(0, 255) as u8;
                let mut rgb = self.rgb();
                match channel {
                    Channel::R => rgb.r = byte,
                    Channel::G => rgb.g = byte,
                    _ => rgb.b = byte,
                }
                self.hsv = rgb.to_hsv();
            }
            Channel::H => self.hsv.h = value.clamp(0, 360) as f64,
            Channel::S => self.hsv.s = value.clamp(0, 100) as f64,
            Channel::V => self.hsv.v = value.clamp(0, 100) as f64,
        }
    }

    /// Hex entry; anything but a valid 3- or 6-digit code is ignored.
    pub fn set_hex(&mut self, input: &str) -> bool {
        match Rgb::from_hex(input) {
            Some(rgb) => {
                self.hsv = rgb.to_hsv();
                true
            }
            None => false,
        }
    }

    /// Finish the selection, yielding the color to store.
    pub fn commit(self) -> String {
        self.hex()
    }
}

/// A pointer held down on one picker surface.
pub struct Drag<'a> {
    picker: &'a mut ColorPicker,
    surface: Surface,
    rect: Rect,
}

impl Drag<'_> {
    pub fn move_to(&mut self, x: f64, y: f64) {
        let (fx, fy) = self.rect.fraction(x, y);
        let hsv = &mut self.picker.hsv;
        match self.surface {
            Surface::Plane => {
                hsv.s = fx * 100.0;
                hsv.v = (1.0 - fy) * 100.0;
            }
            Surface::HueBar => hsv.h = fy * 360.0,
        }
    }
}

impl Drop for Drag<'_> {
    fn drop(&mut self) {
        log::trace!("picker drag on {:?} released", self.surface);
    }
}

/// `parseInt`-style read: optional sign then leading digits.
fn parse_leading_int(input: &str) -> Option<i64> {
    let s = input.trim();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}
