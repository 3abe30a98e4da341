//! Formatting utilities used for CLI and export outputs.

use unicode_width::UnicodeWidthStr;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

/// Cut `s` to at most `max` display columns, ending with `…` when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w + 1 > max {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push('…');
    out
}

/// Left-align `s` in `width` display columns.
pub fn pad_right(s: &str, width: usize) -> String {
    let w = UnicodeWidthStr::width(s);
    format!("{}{}", s, " ".repeat(width.saturating_sub(w)))
}

/// `Paris, France` style location, skipping unknown parts.
pub fn describe_location(city: &str, country: &str) -> String {
    let parts: Vec<&str> = [city, country]
        .into_iter()
        .filter(|p| !crate::models::post::is_unknown(Some(p)))
        .collect();

    if parts.is_empty() {
        crate::models::UNKNOWN.to_string()
    } else {
        parts.join(", ")
    }
}
