pub mod active;
pub mod clock;
pub mod derive;
pub mod window;

pub const DEFAULT_IN_BUFFER_MIN: i64 = 240;
pub const DEFAULT_OUT_BEFORE_END_MIN: i64 = 120;
/// Out-buffer default for the per-shift attendance query.
pub const DEFAULT_SHIFT_OUT_BUFFER_MIN: i64 = 360;
/// Out-buffer default for the current/recent instance queries.
pub const DEFAULT_INSTANCE_OUT_BUFFER_MIN: i64 = 240;
pub const DEFAULT_MIN_PRESENT_MIN: i64 = 480;
/// Pre-start slack for the "is this instance live" test. Intentionally
/// distinct from the in-buffer: coarse liveness vs. clock-in matching.
pub const ACTIVE_PRE_START_SLACK_MIN: i64 = 60;
pub const DEFAULT_DAYS_BACK: i64 = 1;
pub const MAX_DAYS_BACK: i64 = 7;

/// Buffer set applied by the attendance deriver. All quantities are minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRules {
    pub in_buffer_minutes: i64,
    pub out_before_end_minutes: i64,
    pub out_after_end_minutes: i64,
    pub min_present_minutes: i64,
}

impl Default for AttendanceRules {
    fn default() -> Self {
        Self {
            in_buffer_minutes: DEFAULT_IN_BUFFER_MIN,
            out_before_end_minutes: DEFAULT_OUT_BEFORE_END_MIN,
            out_after_end_minutes: DEFAULT_SHIFT_OUT_BUFFER_MIN,
            min_present_minutes: DEFAULT_MIN_PRESENT_MIN,
        }
    }
}

impl AttendanceRules {
    pub fn with_out_buffer(out_after_end_minutes: i64) -> Self {
        Self {
            out_after_end_minutes,
            ..Self::default()
        }
    }
}

/// Parses a raw `out_buffer_minutes` query value. Non-numeric or negative
/// input falls back to `default` instead of failing the request.
pub fn parse_out_buffer(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|v| *v >= 0)
        .unwrap_or(default)
}

/// Parses a raw `days_back` query value, clamped to [0, 7].
pub fn parse_days_back(raw: Option<&str>) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .unwrap_or(DEFAULT_DAYS_BACK)
        .clamp(0, MAX_DAYS_BACK)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_buffer_accepts_valid_numbers() {
        assert_eq!(parse_out_buffer(Some("120"), 360), 120);
        assert_eq!(parse_out_buffer(Some(" 0 "), 360), 0);
    }

    #[test]
    fn out_buffer_falls_back_on_bad_input() {
        assert_eq!(parse_out_buffer(None, 360), 360);
        assert_eq!(parse_out_buffer(Some("abc"), 360), 360);
        assert_eq!(parse_out_buffer(Some("-5"), 240), 240);
        assert_eq!(parse_out_buffer(Some("12.5"), 240), 240);
    }

    #[test]
    fn days_back_is_clamped() {
        assert_eq!(parse_days_back(None), DEFAULT_DAYS_BACK);
        assert_eq!(parse_days_back(Some("3")), 3);
        assert_eq!(parse_days_back(Some("99")), MAX_DAYS_BACK);
        assert_eq!(parse_days_back(Some("-2")), 0);
        assert_eq!(parse_days_back(Some("junk")), DEFAULT_DAYS_BACK);
    }
}
