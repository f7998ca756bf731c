//! TenantSubscription - one configured unit of recurring work
//!
//! Created and edited by the external configuration surface; the pipeline only
//! reads it and advances `next_run`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::SourceUri;

/// Tenant (server) identifier
pub type TenantId = u64;

/// One tenant's banner subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantSubscription {
    /// Unique tenant identifier
    pub id: TenantId,

    /// Disabled subscriptions are never selected
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Data source (`http(s)://...` or `ddb://host/path`)
    pub source: SourceUri,

    /// Selector pattern applied to the fetched document
    pub selector: String,

    /// Template image URL
    pub template: String,

    /// Text rendering style
    pub style: RenderStyle,

    /// Minutes between two updates
    pub interval_minutes: u32,

    /// Earliest time of the next update
    #[serde(default = "default_next_run")]
    pub next_run: DateTime<Utc>,
}

fn default_enabled() -> bool {
    true
}

fn default_next_run() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl TenantSubscription {
    /// Run interval as a duration
    pub fn interval(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.interval_minutes))
    }

    /// Whether the subscription must be processed at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.enabled && self.next_run <= now
    }

    /// Next-run marker after being selected at `now`
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.interval()
    }
}

/// Text rendering style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Font family name (catalog lookup is case-insensitive)
    pub font_family: String,

    /// Weight / italic variant
    #[serde(default)]
    pub font_variant: FontVariant,

    /// Font size in pixels
    pub font_size: f32,

    /// 24-bit RGB color (`0xRRGGBB`), drawn fully opaque
    #[serde(default = "default_color")]
    pub color: u32,

    /// Rotation in degrees, clockwise in image space, about the template
    /// origin; the anchor is rotated with the text
    #[serde(default)]
    pub rotation_deg: f32,

    /// Horizontal alignment relative to the anchor
    #[serde(default)]
    pub alignment: Alignment,

    /// Anchor position in template pixel coordinates
    pub anchor: Anchor,
}

impl RenderStyle {
    /// Largest accepted font size in pixels
    pub const MAX_FONT_SIZE: f32 = 1024.0;

    /// Whether `font_size` is finite and in `(0, MAX_FONT_SIZE]`
    pub fn font_size_in_range(&self) -> bool {
        self.font_size.is_finite()
            && self.font_size > 0.0
            && self.font_size <= Self::MAX_FONT_SIZE
    }
}

fn default_color() -> u32 {
    0xFF_FF_FF
}

/// Anchor point on the template
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

impl Alignment {
    /// Horizontal offset from the anchor for a measured text width
    pub fn offset(self, width: f32) -> f32 {
        match self {
            Alignment::Left => 0.0,
            Alignment::Center => -width / 2.0,
            Alignment::Right => -width,
        }
    }
}

/// Font weight + italic flag, in Google Fonts notation
/// (`regular`, `italic`, `700`, `700italic`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontVariant {
    weight: u16,
    italic: bool,
}

const KNOWN_WEIGHTS: [u16; 10] = [100, 200, 300, 400, 500, 600, 700, 800, 900, 950];

impl FontVariant {
    pub const REGULAR: FontVariant = FontVariant {
        weight: 400,
        italic: false,
    };

    pub const ITALIC: FontVariant = FontVariant {
        weight: 400,
        italic: true,
    };

    /// Create a variant; `None` for weights the catalog never uses
    pub fn new(weight: u16, italic: bool) -> Option<Self> {
        KNOWN_WEIGHTS
            .contains(&weight)
            .then_some(Self { weight, italic })
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    /// Name shown to users, e.g. `Bold (700) Italic`
    pub fn human_readable(&self) -> String {
        let base = match (self.weight, self.italic) {
            (400, false) => return "Regular".to_string(),
            (400, true) => return "Italic".to_string(),
            (w, _) => match weight_name(w) {
                Some(name) => format!("{name} ({w})"),
                None => w.to_string(),
            },
        };
        if self.italic {
            format!("{base} Italic")
        } else {
            base
        }
    }
}

fn weight_name(weight: u16) -> Option<&'static str> {
    Some(match weight {
        100 => "Thin",
        200 => "Extra Light",
        300 => "Light",
        500 => "Medium",
        600 => "Semi Bold",
        700 => "Bold",
        800 => "Extra Bold",
        900 => "Black",
        950 => "Extra Black",
        _ => return None,
    })
}

impl Default for FontVariant {
    fn default() -> Self {
        Self::REGULAR
    }
}

impl fmt::Display for FontVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.weight, self.italic) {
            (400, false) => f.write_str("regular"),
            (400, true) => f.write_str("italic"),
            (w, false) => write!(f, "{w}"),
            (w, true) => write!(f, "{w}italic"),
        }
    }
}

/// Unknown variant string
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown font variant '{0}'")]
pub struct ParseFontVariantError(pub String);

impl FromStr for FontVariant {
    type Err = ParseFontVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        match lower.as_str() {
            "regular" => return Ok(Self::REGULAR),
            "italic" => return Ok(Self::ITALIC),
            _ => {}
        }

        let (digits, italic) = match lower.strip_suffix("italic") {
            Some(rest) => (rest, true),
            None => (lower.as_str(), false),
        };
        digits
            .parse::<u16>()
            .ok()
            .and_then(|w| Self::new(w, italic))
            .ok_or_else(|| ParseFontVariantError(s.to_string()))
    }
}

impl Serialize for FontVariant {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FontVariant {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
