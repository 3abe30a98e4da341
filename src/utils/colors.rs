/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Published posts in green, drafts in grey.
pub fn color_for_published(published: bool) -> &'static str {
    if published { GREEN } else { GREY }
}

/// Colored rendering of an optional value, `--` in grey when absent.
pub fn colorize_optional(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => format!("{GREY}--{RESET}"),
    }
}

/// Rating as filled/empty stars, in yellow.
pub fn colorize_rating(rating: Option<i64>) -> String {
    match rating {
        Some(r) => {
            let r = r.clamp(0, 5) as usize;
            format!("{YELLOW}{}{}{RESET}", "★".repeat(r), "☆".repeat(5 - r))
        }
        None => format!("{GREY}--{RESET}"),
    }
}
