use serde::Serialize;

use super::color::normalize_color;
use super::{DEFAULT_COLOR, DEFAULT_LABEL};

/// shields.io endpoint-badge document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeSchema {
    pub schema_version: u8,
    pub label: String,
    pub message: String,
    pub color: String,
}

/// Describe the badge for a third-party renderer. No drawing happens here.
pub fn render_schema(label: &str, value: u64, color: &str) -> BadgeSchema {
    BadgeSchema {
        schema_version: 1,
        label: if label.is_empty() { DEFAULT_LABEL.to_string() } else { label.to_string() },
        message: value.to_string(),
        color: normalize_color(color, DEFAULT_COLOR),
    }
}
