use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback base URL for the tracking preview when no product page is set.
const PREVIEW_BASE_URL: &str = "https://domain.com/san-pham";

// ── Tone ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tone {
    #[serde(rename = "Thân thiện")]
    Friendly,
    #[serde(rename = "Chuyên nghiệp")]
    Professional,
    #[serde(rename = "Thuyết phục")]
    Persuasive,
    #[serde(rename = "Vui vẻ")]
    Playful,
}

impl Tone {
    pub const ALL: [Tone; 4] = [
        Tone::Friendly,
        Tone::Professional,
        Tone::Persuasive,
        Tone::Playful,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Friendly => "Thân thiện",
            Self::Professional => "Chuyên nghiệp",
            Self::Persuasive => "Thuyết phục",
            Self::Playful => "Vui vẻ",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.label() == s.trim())
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Link slots ────────────────────────────────────────

/// The nine CTA destinations a marketer can map. Order matches the
/// order directives are emitted into the strategist prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkSlot {
    ProductPage,
    CategoryPage,
    Pdf,
    Hotline,
    Zalo,
    Messenger,
    Booking,
    Voucher,
    Blog,
}

impl LinkSlot {
    pub const ALL: [LinkSlot; 9] = [
        LinkSlot::ProductPage,
        LinkSlot::CategoryPage,
        LinkSlot::Pdf,
        LinkSlot::Hotline,
        LinkSlot::Zalo,
        LinkSlot::Messenger,
        LinkSlot::Booking,
        LinkSlot::Voucher,
        LinkSlot::Blog,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::ProductPage => "product_page",
            Self::CategoryPage => "category_page",
            Self::Pdf => "pdf",
            Self::Hotline => "hotline",
            Self::Zalo => "zalo",
            Self::Messenger => "messenger",
            Self::Booking => "booking",
            Self::Voucher => "voucher",
            Self::Blog => "blog",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|slot| slot.key() == s)
    }

    /// Label shown next to the input in the settings form.
    pub fn form_label(&self) -> &'static str {
        match self {
            Self::ProductPage => "Product Page Link",
            Self::CategoryPage => "Category Page Link",
            Self::Pdf => "PDF Link",
            Self::Hotline => "Hotline",
            Self::Zalo => "Zalo Link",
            Self::Messenger => "Messenger Link",
            Self::Booking => "Booking Link",
            Self::Voucher => "Voucher Link",
            Self::Blog => "Blog Link",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaLinks {
    #[serde(default)]
    pub product_page: String,
    #[serde(default)]
    pub category_page: String,
    #[serde(default)]
    pub pdf: String,
    #[serde(default)]
    pub hotline: String,
    #[serde(default)]
    pub zalo: String,
    #[serde(default)]
    pub messenger: String,
    #[serde(default)]
    pub booking: String,
    #[serde(default)]
    pub voucher: String,
    #[serde(default)]
    pub blog: String,
}

impl CtaLinks {
    pub fn get(&self, slot: LinkSlot) -> &str {
        match slot {
            LinkSlot::ProductPage => &self.product_page,
            LinkSlot::CategoryPage => &self.category_page,
            LinkSlot::Pdf => &self.pdf,
            LinkSlot::Hotline => &self.hotline,
            LinkSlot::Zalo => &self.zalo,
            LinkSlot::Messenger => &self.messenger,
            LinkSlot::Booking => &self.booking,
            LinkSlot::Voucher => &self.voucher,
            LinkSlot::Blog => &self.blog,
        }
    }

    pub fn set(&mut self, slot: LinkSlot, value: String) {
        let field = match slot {
            LinkSlot::ProductPage => &mut self.product_page,
            LinkSlot::CategoryPage => &mut self.category_page,
            LinkSlot::Pdf => &mut self.pdf,
            LinkSlot::Hotline => &mut self.hotline,
            LinkSlot::Zalo => &mut self.zalo,
            LinkSlot::Messenger => &mut self.messenger,
            LinkSlot::Booking => &mut self.booking,
            LinkSlot::Voucher => &mut self.voucher,
            LinkSlot::Blog => &mut self.blog,
        };
        *field = value;
    }

    /// A slot counts as provided only when it holds something besides whitespace.
    pub fn provided(&self, slot: LinkSlot) -> Option<&str> {
        let value = self.get(slot);
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

// ── Tracking ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingField {
    PageSlug,
    UtmSource,
    UtmMedium,
    UtmCampaign,
}

impl TrackingField {
    pub fn from_key(s: &str) -> Option<Self> {
        match s {
            "page_slug" => Some(Self::PageSlug),
            "utm_source" => Some(Self::UtmSource),
            "utm_medium" => Some(Self::UtmMedium),
            "utm_campaign" => Some(Self::UtmCampaign),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracking {
    #[serde(default)]
    pub page_slug: String,
    #[serde(default)]
    pub utm_source: String,
    #[serde(default)]
    pub utm_medium: String,
    #[serde(default)]
    pub utm_campaign: String,
}

impl Tracking {
    fn field_mut(&mut self, field: TrackingField) -> &mut String {
        match field {
            TrackingField::PageSlug => &mut self.page_slug,
            TrackingField::UtmSource => &mut self.utm_source,
            TrackingField::UtmMedium => &mut self.utm_medium,
            TrackingField::UtmCampaign => &mut self.utm_campaign,
        }
    }

    /// Query string the AI is told to append to web links, with the
    /// `[intent]` placeholder left for it to fill. Empty parts are skipped.
    pub fn query_preview(&self) -> String {
        let mut parts = Vec::new();
        if !self.utm_source.is_empty() {
            parts.push(format!("utm_source={}", self.utm_source));
        }
        if !self.utm_medium.is_empty() {
            parts.push(format!("utm_medium={}", self.utm_medium));
        }
        if !self.utm_campaign.is_empty() {
            parts.push(format!("utm_campaign={}", self.utm_campaign));
        }
        if !self.page_slug.is_empty() {
            parts.push(format!("utm_content={}_[intent]", self.page_slug));
        }
        parts.join("&")
    }
}

// ── Settings ──────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub primary_color: String,
    pub tone: Tone,
    pub cta_links: CtaLinks,
    pub tracking: Tracking,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            primary_color: "#cb3816".to_string(),
            tone: Tone::Friendly,
            cta_links: CtaLinks {
                product_page: "https://domain.com/may-dam-coc-220v".to_string(),
                category_page: "https://domain.com/dam-coc".to_string(),
                pdf: "https://domain.com/bao-gia-dam-coc.pdf".to_string(),
                hotline: "0899555355".to_string(),
                zalo: "https://zalo.me/0899555355".to_string(),
                messenger: "https://m.me/yourpage".to_string(),
                booking: String::new(),
                voucher: String::new(),
                blog: String::new(),
            },
            tracking: Tracking {
                page_slug: "sample-page".to_string(),
                utm_source: "seo-lia".to_string(),
                utm_medium: "cta-lia".to_string(),
                utm_campaign: "general-campaign".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn apply(&mut self, update: SettingsUpdate) {
        match update {
            SettingsUpdate::PrimaryColor(color) => self.primary_color = color.to_lowercase(),
            SettingsUpdate::Tone(tone) => self.tone = tone,
            SettingsUpdate::Link(slot, value) => self.cta_links.set(slot, value),
            SettingsUpdate::Tracking(field, value) => *self.tracking.field_mut(field) = value,
        }
    }

    /// Example tracked link shown under the tracking inputs.
    pub fn tracking_preview(&self) -> String {
        let base = if self.cta_links.product_page.is_empty() {
            PREVIEW_BASE_URL
        } else {
            self.cta_links.product_page.as_str()
        };
        let query = self.tracking.query_preview();
        if query.is_empty() {
            base.to_string()
        } else {
            format!("{}?{}", base, query)
        }
    }
}

/// A single typed edit to the settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsUpdate {
    PrimaryColor(String),
    Tone(Tone),
    Link(LinkSlot, String),
    Tracking(TrackingField, String),
}

impl SettingsUpdate {
    /// Translate a form field name (`primaryColor`, `tone`,
    /// `ctaLinks.hotline`, `tracking.utm_source`, ...) into a typed edit.
    pub fn from_field(name: &str, value: &str) -> Result<Self, String> {
        match name.split_once('.') {
            None => match name {
                "primaryColor" => Ok(Self::PrimaryColor(value.to_string())),
                "tone" => Tone::from_label(value)
                    .map(Self::Tone)
                    .ok_or_else(|| format!("Unknown tone: {}", value)),
                _ => Err(format!("Unknown settings field: {}", name)),
            },
            Some(("ctaLinks", key)) => LinkSlot::from_key(key)
                .map(|slot| Self::Link(slot, value.to_string()))
                .ok_or_else(|| format!("Unknown link slot: {}", key)),
            Some(("tracking", key)) => TrackingField::from_key(key)
                .map(|field| Self::Tracking(field, value.to_string()))
                .ok_or_else(|| format!("Unknown tracking field: {}", key)),
            Some(_) => Err(format!("Unknown settings field: {}", name)),
        }
    }
}
