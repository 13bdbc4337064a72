//! Conversions from configuration values to page-coordinate values

use crate::constants::POINTS_PER_CM;
use crate::types::{PaginateError, Result, Rgb};

/// Convert a physical length such as `"2.5cm"` to points.
pub fn length_to_points(value: &str) -> Result<f32> {
    let trimmed = value.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == '-' || c == '+'))
        .unwrap_or(trimmed.len());
    let (magnitude, unit) = trimmed.split_at(split);

    let magnitude: f32 = magnitude
        .parse()
        .map_err(|_| PaginateError::Config(format!("Invalid length {:?}", value)))?;

    match unit.trim() {
        "cm" => Ok(magnitude * POINTS_PER_CM),
        other => Err(PaginateError::Config(format!(
            "Unsupported unit {:?} in length {:?} (expected cm)",
            other, value
        ))),
    }
}

/// Parse `#rrggbb` into normalized channels.
///
/// Channels that fail to parse come out as 0.0; use [`is_hex_color`] to reject
/// malformed input when the configuration is loaded.
pub fn color_from_hex(hex: &str) -> Rgb {
    let digits = hex.trim().trim_start_matches('#');
    let channel = |i: usize| -> f32 {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .map(|v| v as f32 / 255.0)
            .unwrap_or(0.0)
    };
    Rgb {
        r: channel(0),
        g: channel(2),
        b: channel(4),
    }
}

/// Whether `hex` is exactly `#rrggbb`
pub fn is_hex_color(hex: &str) -> bool {
    let hex = hex.trim();
    hex.len() == 7 && hex.starts_with('#') && hex[1..].chars().all(|c| c.is_ascii_hexdigit())
}
