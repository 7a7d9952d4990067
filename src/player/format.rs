//! Pure derivations used by the player views.

/// Format seconds as `mm:ss`, or `hh:mm:ss` past the first hour.
///
/// NaN, infinite and negative inputs render as `00:00`.
pub fn second_to_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

/// Clamp a value to `[0, 1]`, mapping NaN to 0
pub fn clamp_fraction(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// `part / whole` as a percentage in `[0, 100]`
pub fn percentage(part: f64, whole: f64) -> f64 {
    clamp_fraction(part / whole) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_to_time() {
        assert_eq!(second_to_time(0.0), "00:00");
        assert_eq!(second_to_time(59.9), "00:59");
        assert_eq!(second_to_time(61.0), "01:01");
        assert_eq!(second_to_time(3725.0), "01:02:05");
        assert_eq!(second_to_time(f64::NAN), "00:00");
        assert_eq!(second_to_time(-4.0), "00:00");
    }

    #[test]
    fn test_percentage_is_clamped() {
        assert_eq!(percentage(30.0, 120.0), 25.0);
        assert_eq!(percentage(200.0, 120.0), 100.0);
        assert_eq!(percentage(-1.0, 120.0), 0.0);
        // Unknown duration
        assert_eq!(percentage(10.0, f64::NAN), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
    }
}
