//! Badge rendering (pure, side-effect free).
//!
//! Three outputs for one counter value:
//! - Classic: shields-like two-segment pill (SVG).
//! - Terminal: dark monospace `label: value` strip (SVG).
//! - Schema: JSON document for shields.io's endpoint badge, no drawing.
//!
//! Widths are a per-character estimate plus fixed padding, not text shaping:
//!
//! | style    | px/char | padding/segment | height |
//! |----------|---------|-----------------|--------|
//! | classic  | 6       | 10              | 20     |
//! | terminal | 8       | 14              | 24     |
//!
//! The value segment always starts where the label segment ends.
//!
//! Every caller-provided string is normalized before it reaches markup:
//! colors go through an allow-list, fonts through a character allow-list,
//! label text is XML-escaped. SVG output never references external resources.

mod color;
mod schema;
mod svg;

pub use color::{escape_xml, normalize_color, normalize_font, NAMED_COLORS};
pub use schema::{render_schema, BadgeSchema};
pub use svg::{render_svg, segment_widths, Segments};

pub const DEFAULT_LABEL: &str = "views";
pub const DEFAULT_COLOR: &str = "blue";
pub const DEFAULT_CLASSIC_FONT: &str = "Verdana,Geneva,DejaVu Sans,sans-serif";
pub const DEFAULT_TERMINAL_FONT: &str = "SFMono-Regular, SF Mono, Menlo, ui-monospace, monospace";
pub const DEFAULT_TERMINAL_BG: &str = "#1e1e1e";
pub const DEFAULT_TERMINAL_LABEL_COLOR: &str = "#aaa";
pub const DEFAULT_TERMINAL_VALUE_COLOR: &str = "#3cffb3";

pub const CLASSIC_CHAR_WIDTH: usize = 6;
pub const CLASSIC_PADDING: usize = 10;
pub const TERMINAL_CHAR_WIDTH: usize = 8;
pub const TERMINAL_PADDING: usize = 14;

/// SVG variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BadgeStyle {
    #[default]
    Classic,
    Terminal,
}

impl BadgeStyle {
    /// `terminal` / `mono` select the terminal style, anything else is classic.
    pub fn from_param(s: &str) -> Self {
        match s.trim() {
            "terminal" | "mono" => BadgeStyle::Terminal,
            _ => BadgeStyle::Classic,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BadgeStyle::Classic => "classic",
            BadgeStyle::Terminal => "terminal",
        }
    }
}

/// Raw color overrides as received. Empty or invalid entries fall back to
/// the style's defaults at render time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeColors {
    /// Classic value-segment fill.
    pub color: String,
    /// Terminal background.
    pub bg: String,
    /// Terminal label text.
    pub label_color: String,
    /// Terminal value text.
    pub value_color: String,
}

/// Request-scoped badge description. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeSpec {
    pub label: String,
    pub value: u64,
    pub style: BadgeStyle,
    pub colors: BadgeColors,
    pub font: String,
}

impl BadgeSpec {
    /// Classic badge with default colors and font. An empty label becomes
    /// `DEFAULT_LABEL`.
    pub fn new(label: impl Into<String>, value: u64) -> Self {
        let label = label.into();
        Self {
            label: if label.is_empty() { DEFAULT_LABEL.to_string() } else { label },
            value,
            style: BadgeStyle::Classic,
            colors: BadgeColors::default(),
            font: String::new(),
        }
    }

    pub fn style(mut self, style: BadgeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn colors(mut self, colors: BadgeColors) -> Self {
        self.colors = colors;
        self
    }

    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }
}
