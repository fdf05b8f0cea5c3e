//! Small helpers shared across the crate.

use image::Rgba;

/// Parse a hex color string (e.g., "#ff0000") to an opaque RGBA pixel
pub fn parse_color(hex: &str) -> Option<Rgba<u8>> {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Rgba([r, g, b, 255]))
    } else {
        None
    }
}

/// Milliseconds since the Unix epoch, used as a cache-busting query value.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
