use std::collections::HashMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::window::{ShiftWindow, resolve_relative_window, resolve_window};
use super::{ACTIVE_PRE_START_SLACK_MIN, MAX_DAYS_BACK};
use crate::model::shift::Shift;

/// One concrete occurrence of a recurring shift definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftInstance {
    pub shift_code: String,
    pub date: NaiveDate,
    pub window: ShiftWindow,
    pub is_active: bool,
    /// Only attached by [`find_recent_with_counts`].
    pub mapped_count: Option<i64>,
}

/// The instance is live while `now` sits inside the window widened by a
/// fixed 1 h before the start and `out_buffer_minutes` after the end.
fn is_live(window: &ShiftWindow, now: NaiveDateTime, out_buffer_minutes: i64) -> bool {
    now >= window.start - Duration::minutes(ACTIVE_PRE_START_SLACK_MIN)
        && now <= window.end + Duration::minutes(out_buffer_minutes)
}

/// Enumerates the shift instances live right now. Today's and yesterday's
/// occurrence of each shift are both candidates, since an overnight shift
/// started yesterday can still be running. OFF shifts (no nominal times)
/// never produce instances. Ordered by window start ascending.
pub fn find_active(
    shifts: &[Shift],
    today: NaiveDate,
    now: NaiveDateTime,
    out_buffer_minutes: i64,
) -> Vec<ShiftInstance> {
    let mut live = Vec::new();
    for shift in shifts {
        let (Some(start), Some(end)) = (shift.start_time, shift.end_time) else {
            continue;
        };
        for offset in [0i64, -1] {
            let window = resolve_relative_window(start, end, today, offset);
            if is_live(&window, now, out_buffer_minutes) {
                live.push(ShiftInstance {
                    shift_code: shift.shift_code.clone(),
                    date: today + Duration::days(offset),
                    window,
                    is_active: true,
                    mapped_count: None,
                });
            }
        }
    }
    live.sort_by_key(|i| i.window.start);
    live
}

/// Enumerates every (shift, date) instance over the last `days_back` days
/// that has at least one employee mapped, flagging which are still live.
/// `counts` is keyed by (shift_code, date); missing keys mean zero mapped.
/// Ordered by date descending, then window start descending.
pub fn find_recent_with_counts(
    shifts: &[Shift],
    counts: &HashMap<(String, NaiveDate), i64>,
    today: NaiveDate,
    now: NaiveDateTime,
    out_buffer_minutes: i64,
    days_back: i64,
) -> Vec<ShiftInstance> {
    let days_back = days_back.clamp(0, MAX_DAYS_BACK);
    let mut instances = Vec::new();
    for offset in 0..=days_back {
        let date = today - Duration::days(offset);
        for shift in shifts {
            let (Some(start), Some(end)) = (shift.start_time, shift.end_time) else {
                continue;
            };
            let mapped = counts
                .get(&(shift.shift_code.clone(), date))
                .copied()
                .unwrap_or(0);
            if mapped == 0 {
                continue;
            }
            let window = resolve_window(start, end, date);
            instances.push(ShiftInstance {
                shift_code: shift.shift_code.clone(),
                date,
                is_active: is_live(&window, now, out_buffer_minutes),
                window,
                mapped_count: Some(mapped),
            });
        }
    }
    instances.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.window.start.cmp(&a.window.start))
    });
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        d(day).and_hms_opt(h, m, 0).unwrap()
    }

    fn shift(code: &str, start: Option<NaiveTime>, end: Option<NaiveTime>) -> Shift {
        Shift {
            id: 0,
            shift_code: code.to_string(),
            name: format!("{code} shift"),
            start_time: start,
            end_time: end,
        }
    }

    fn roster() -> Vec<Shift> {
        vec![
            shift("G", Some(t(9, 0)), Some(t(17, 0))),
            shift("N", Some(t(22, 0)), Some(t(6, 0))),
            shift("OFF", None, None),
        ]
    }

    #[test]
    fn day_shift_is_active_during_its_window() {
        let live = find_active(&roster(), d(10), at(10, 12, 0), 240);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].shift_code, "G");
        assert_eq!(live[0].date, d(10));
        assert!(live[0].is_active);
    }

    #[test]
    fn yesterdays_night_shift_is_still_active_in_the_morning() {
        // 07:00: N started 22:00 the day before, end 06:00 + 240min buffer
        let live = find_active(&roster(), d(11), at(11, 7, 0), 240);
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].shift_code, "N");
        assert_eq!(live[0].date, d(10));
    }

    #[test]
    fn pre_start_slack_is_one_hour() {
        // small out-buffer so yesterday's N is long gone by morning
        let live = find_active(&roster(), d(10), at(10, 8, 0), 60);
        assert_eq!(live.len(), 1, "exactly 1h before start is live");
        assert_eq!(live[0].shift_code, "G");
        let live = find_active(&roster(), d(10), at(10, 7, 59), 60);
        assert!(live.is_empty());
    }

    #[test]
    fn overlapping_instances_are_ordered_by_start() {
        // 22:30: both today's N (22:00) and nothing else... use a buffer big
        // enough to keep G (ended 17:00) live too
        let live = find_active(&roster(), d(10), at(10, 22, 30), 360);
        assert_eq!(live.len(), 2);
        assert_eq!(live[0].shift_code, "G");
        assert_eq!(live[1].shift_code, "N");
        assert!(live[0].window.start < live[1].window.start);
    }

    #[test]
    fn off_shifts_never_produce_instances() {
        let live = find_active(
            &[shift("OFF", None, None), shift("HALF", Some(t(9, 0)), None)],
            d(10),
            at(10, 12, 0),
            240,
        );
        assert!(live.is_empty());
    }

    #[test]
    fn recent_instances_skip_unmapped_pairs() {
        let mut counts = HashMap::new();
        counts.insert(("G".to_string(), d(10)), 12i64);
        counts.insert(("N".to_string(), d(9)), 4i64);
        let recent =
            find_recent_with_counts(&roster(), &counts, d(10), at(10, 12, 0), 240, 1);
        assert_eq!(recent.len(), 2);
        // date desc, then start desc
        assert_eq!(recent[0].shift_code, "G");
        assert_eq!(recent[0].date, d(10));
        assert_eq!(recent[0].mapped_count, Some(12));
        assert!(recent[0].is_active);
        assert_eq!(recent[1].shift_code, "N");
        assert_eq!(recent[1].date, d(9));
        assert!(!recent[1].is_active, "ended 06:00 on the 10th + 240min");
    }

    #[test]
    fn recent_ordering_within_a_date_is_start_descending() {
        let mut counts = HashMap::new();
        counts.insert(("G".to_string(), d(10)), 1i64);
        counts.insert(("N".to_string(), d(10)), 1i64);
        let recent =
            find_recent_with_counts(&roster(), &counts, d(10), at(10, 23, 0), 240, 0);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].shift_code, "N");
        assert_eq!(recent[1].shift_code, "G");
    }

    #[test]
    fn days_back_is_clamped_inside_the_finder() {
        let mut counts = HashMap::new();
        for day in 1..=10 {
            counts.insert(("G".to_string(), d(day)), 1i64);
        }
        let recent =
            find_recent_with_counts(&roster(), &counts, d(10), at(10, 12, 0), 240, 50);
        // 7 days back + today = 8 instances at most
        assert_eq!(recent.len(), 8);
        assert_eq!(recent.last().unwrap().date, d(3));
    }
}
