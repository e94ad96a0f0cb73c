/// Named colors accepted verbatim (lowercased).
pub const NAMED_COLORS: [&str; 9] = [
    "blue", "green", "red", "orange", "yellow", "gray", "grey", "purple", "teal",
];

const MAX_FONT_LEN: usize = 128;

/// Restrict a color to the allow-list: a named color or `#rgb` / `#rrggbb`.
/// Anything else (including empty input) yields `fallback`.
pub fn normalize_color(c: &str, fallback: &str) -> String {
    let lc = c.trim().to_ascii_lowercase();
    if lc.is_empty() {
        return fallback.to_string();
    }

    if let Some(hex) = lc.strip_prefix('#') {
        if (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return lc;
        }
        return fallback.to_string();
    }

    if NAMED_COLORS.contains(&lc.as_str()) {
        return lc;
    }
    fallback.to_string()
}

/// Restrict a font-family list to letters, digits, spaces and `,-_.`.
pub fn normalize_font(f: &str, fallback: &str) -> String {
    let f = f.trim();
    if f.is_empty() || f.len() > MAX_FONT_LEN {
        return fallback.to_string();
    }
    let ok = f
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, ' ' | ',' | '-' | '_' | '.'));
    if ok {
        f.to_string()
    } else {
        fallback.to_string()
    }
}

/// Escape text for element content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
