use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Absolute instant range of one (shift, date) occurrence. Derived on every
/// request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Resolves the absolute window of a shift on a calendar date.
///
/// An end time-of-day numerically below the start time-of-day means the
/// shift runs past midnight, so the end lands on `date + 1` (e.g. a
/// 22:00–06:00 night shift). The comparison of the two times-of-day is the
/// sole overnight rule.
pub fn resolve_window(start_time: NaiveTime, end_time: NaiveTime, date: NaiveDate) -> ShiftWindow {
    let end_date = if end_time >= start_time {
        date
    } else {
        date + Days::new(1)
    };
    ShiftWindow {
        start: date.and_time(start_time),
        end: end_date.and_time(end_time),
    }
}

/// Resolves the window of the same shift `offset_days` away from `anchor`
/// (0 = today's instance, -1 = yesterday's).
pub fn resolve_relative_window(
    start_time: NaiveTime,
    end_time: NaiveTime,
    anchor: NaiveDate,
    offset_days: i64,
) -> ShiftWindow {
    resolve_window(start_time, end_time, anchor + Duration::days(offset_days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, mo: u32, da: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, da).unwrap()
    }

    #[test]
    fn day_shift_stays_on_its_date() {
        let w = resolve_window(t(9, 0), t(17, 0), d(2024, 1, 10));
        assert_eq!(w.start, d(2024, 1, 10).and_time(t(9, 0)));
        assert_eq!(w.end, d(2024, 1, 10).and_time(t(17, 0)));
    }

    #[test]
    fn night_shift_ends_on_the_next_date() {
        let w = resolve_window(t(22, 0), t(6, 0), d(2024, 1, 10));
        assert_eq!(w.start, d(2024, 1, 10).and_time(t(22, 0)));
        assert_eq!(w.end, d(2024, 1, 11).and_time(t(6, 0)));
    }

    #[test]
    fn window_length_matches_nominal_duration() {
        // wraps through midnight when needed
        let cases = [
            (t(9, 0), t(17, 0), 8 * 60),
            (t(22, 0), t(6, 0), 8 * 60),
            (t(23, 30), t(0, 15), 45),
            (t(6, 0), t(14, 30), 8 * 60 + 30),
        ];
        for (start, end, minutes) in cases {
            let w = resolve_window(start, end, d(2024, 3, 1));
            assert_eq!(w.end - w.start, Duration::minutes(minutes));
            assert!(w.end > w.start);
        }
    }

    #[test]
    fn relative_window_shifts_the_anchor_date() {
        let today = d(2024, 1, 10);
        let yesterday = resolve_relative_window(t(22, 0), t(6, 0), today, -1);
        assert_eq!(yesterday.start, d(2024, 1, 9).and_time(t(22, 0)));
        assert_eq!(yesterday.end, d(2024, 1, 10).and_time(t(6, 0)));

        let same = resolve_relative_window(t(22, 0), t(6, 0), today, 0);
        assert_eq!(same, resolve_window(t(22, 0), t(6, 0), today));
    }
}
