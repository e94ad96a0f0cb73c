use super::color::{escape_xml, normalize_color, normalize_font};
use super::{
    BadgeSpec, BadgeStyle, CLASSIC_CHAR_WIDTH, CLASSIC_PADDING, DEFAULT_CLASSIC_FONT, DEFAULT_COLOR,
    DEFAULT_TERMINAL_BG, DEFAULT_TERMINAL_FONT, DEFAULT_TERMINAL_LABEL_COLOR,
    DEFAULT_TERMINAL_VALUE_COLOR, TERMINAL_CHAR_WIDTH, TERMINAL_PADDING,
};

/// Horizontal layout of the two badge segments, in px.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segments {
    pub label_width: usize,
    pub value_width: usize,
}

impl Segments {
    pub fn total(&self) -> usize {
        self.label_width + self.value_width
    }
}

/// Segment widths for `style`. Terminal labels are drawn as `label:` and
/// are measured that way.
pub fn segment_widths(style: BadgeStyle, label: &str, value: u64) -> Segments {
    let value_chars = value.to_string().chars().count();
    match style {
        BadgeStyle::Classic => Segments {
            label_width: CLASSIC_CHAR_WIDTH * label.chars().count() + CLASSIC_PADDING,
            value_width: CLASSIC_CHAR_WIDTH * value_chars + CLASSIC_PADDING,
        },
        BadgeStyle::Terminal => Segments {
            label_width: TERMINAL_CHAR_WIDTH * (label.chars().count() + 1) + TERMINAL_PADDING,
            value_width: TERMINAL_CHAR_WIDTH * value_chars + TERMINAL_PADDING,
        },
    }
}

/// Render a complete, self-contained SVG document.
pub fn render_svg(spec: &BadgeSpec) -> String {
    match spec.style {
        BadgeStyle::Classic => classic(spec),
        BadgeStyle::Terminal => terminal(spec),
    }
}

fn classic(spec: &BadgeSpec) -> String {
    let seg = segment_widths(BadgeStyle::Classic, &spec.label, spec.value);
    let total = seg.total();
    let label = escape_xml(&spec.label);
    let value = spec.value.to_string();
    let color = normalize_color(&spec.colors.color, DEFAULT_COLOR);
    let font = escape_xml(&normalize_font(&spec.font, DEFAULT_CLASSIC_FONT));
    let label_x = seg.label_width / 2;
    let value_x = seg.label_width + seg.value_width / 2;
    let label_width = seg.label_width;
    let value_width = seg.value_width;

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="20" role="img" aria-label="{label}: {value}">
<linearGradient id="s" x2="0" y2="100%"><stop offset="0" stop-color="#bbb" stop-opacity=".1"/><stop offset="1" stop-opacity=".1"/></linearGradient>
<rect rx="3" width="{total}" height="20" fill="#555"/>
<rect rx="3" x="{label_width}" width="{value_width}" height="20" fill="{color}"/>
<rect rx="3" width="{total}" height="20" fill="url(#s)"/>
<g fill="#fff" text-anchor="middle" font-family="{font}" font-size="11">
<text x="{label_x}" y="15" fill="#010101" fill-opacity=".3">{label}</text>
<text x="{label_x}" y="14">{label}</text>
<text x="{value_x}" y="15" fill="#010101" fill-opacity=".3">{value}</text>
<text x="{value_x}" y="14">{value}</text>
</g>
</svg>"##
    )
}

fn terminal(spec: &BadgeSpec) -> String {
    let seg = segment_widths(BadgeStyle::Terminal, &spec.label, spec.value);
    let total = seg.total();
    let label = escape_xml(&spec.label);
    let value = spec.value.to_string();
    let bg = normalize_color(&spec.colors.bg, DEFAULT_TERMINAL_BG);
    let label_color = normalize_color(&spec.colors.label_color, DEFAULT_TERMINAL_LABEL_COLOR);
    let value_color = normalize_color(&spec.colors.value_color, DEFAULT_TERMINAL_VALUE_COLOR);
    let font = escape_xml(&normalize_font(&spec.font, DEFAULT_TERMINAL_FONT));
    let label_x = TERMINAL_CHAR_WIDTH;
    let value_x = seg.label_width;

    format!(
        r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="24" role="img" aria-label="{label}: {value}">
<rect rx="4" width="{total}" height="24" fill="{bg}"/>
<text x="{label_x}" y="16" font-family="{font}" font-size="12" fill="{label_color}">{label}:</text>
<text x="{value_x}" y="16" font-family="{font}" font-size="12" font-weight="600" fill="{value_color}">{value}</text>
</svg>"##
    )
}
