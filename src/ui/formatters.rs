//! Shared formatting utilities for UI components.

use chrono::{Local, TimeZone};

/// Format a number with thousand separators.
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a magnitude with one decimal, or a dash when unknown.
pub fn format_magnitude(mag: Option<f64>) -> String {
    match mag {
        Some(m) if m.is_finite() => format!("{:.1}", m),
        _ => "-".to_string(),
    }
}

/// Format a depth in km with one decimal, or a dash when unknown.
pub fn format_depth(depth_km: Option<f64>) -> String {
    match depth_km {
        Some(d) if d.is_finite() => format!("{:.1} km", d),
        _ => "-".to_string(),
    }
}

/// Format a coordinate in degrees.
pub fn format_coordinate(deg: f64) -> String {
    format!("{:.3}", deg)
}

/// Render an epoch-millisecond timestamp in the local timezone.
pub fn format_local_time(epoch_ms: i64) -> String {
    match Local.timestamp_millis_opt(epoch_ms).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Truncate `text` to at most `width` terminal columns, marking the cut.
pub fn truncate(text: &str, width: usize) -> String {
    use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
