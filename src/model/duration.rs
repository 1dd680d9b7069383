//! Wire-format duration handling.
//!
//! The service accepts durations as decimal seconds with an `s` suffix
//! (`"300s"`, `"1.5s"`); minute and hour suffixes are accepted from user
//! input. Two duration strings are equal when they denote the same elapsed
//! time regardless of textual form.

/// Parse a duration string into seconds. Returns `None` for anything that
/// is not a recognizable duration.
pub fn parse_duration(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let (number, unit) = match raw.char_indices().rfind(|(_, c)| c.is_ascii_digit()) {
        Some((idx, _)) => raw.split_at(idx + 1),
        None => return None,
    };

    let value: f64 = number.parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }

    match unit {
        "" | "s" => Some(value),
        "m" => Some(value * 60.0),
        "h" => Some(value * 3600.0),
        _ => None,
    }
}

/// Canonical equality for optional duration strings: unset equals unset,
/// and two set values are equal when they parse to the same elapsed time.
/// Unparseable values fall back to exact string comparison.
pub fn durations_equal(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => match (parse_duration(a), parse_duration(b)) {
            (Some(x), Some(y)) => (x - y).abs() < f64::EPSILON,
            _ => a == b,
        },
        (None, Some(v)) | (Some(v), None) => v.is_empty(),
    }
}
