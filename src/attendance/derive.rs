use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use utoipa::ToSchema;

use super::AttendanceRules;
use super::window::ShiftWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub enum AttendanceStatus {
    Present,
    Working,
    Absent,
}

/// Derived per (employee, shift, date); recomputed on every request, so the
/// same query at two different instants can legitimately disagree for an
/// ongoing shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttendanceRecord {
    pub clock_in: Option<NaiveDateTime>,
    pub clock_out: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
}

/// Derives clock-in, clock-out and status from one employee's punches.
///
/// Clock-in is the earliest punch within `start ± in_buffer`. Clock-out is
/// the earliest punch within `[end - out_before_end, end + out_after_end]`
/// and is only looked for once a clock-in exists; earlier stray punches are
/// noise, not attendance signals. Both window bounds are inclusive.
///
/// Status: no clock-in is Absent. A clock-out later than the clock-in with
/// at least `min_present_minutes` worked is Present. Anything else is
/// Working while `now` has not passed the closing bound of the out-window
/// (the session may still accumulate punches), Absent after it.
pub fn derive_attendance(
    window: ShiftWindow,
    rules: &AttendanceRules,
    punches: &[NaiveDateTime],
    now: NaiveDateTime,
) -> AttendanceRecord {
    let in_lo = window.start - Duration::minutes(rules.in_buffer_minutes);
    let in_hi = window.start + Duration::minutes(rules.in_buffer_minutes);
    let out_lo = window.end - Duration::minutes(rules.out_before_end_minutes);
    let out_hi = window.end + Duration::minutes(rules.out_after_end_minutes);

    let clock_in = punches
        .iter()
        .copied()
        .filter(|p| *p >= in_lo && *p <= in_hi)
        .min();

    let clock_out = match clock_in {
        Some(_) => punches
            .iter()
            .copied()
            .filter(|p| *p >= out_lo && *p <= out_hi)
            .min(),
        None => None,
    };

    let still_open = now < out_hi;

    let status = match clock_in {
        None => AttendanceStatus::Absent,
        Some(ci) => match clock_out {
            // an out-punch at or before the in-punch is bad device data,
            // treated as if no clock-out happened
            Some(co) if co > ci => {
                if co - ci >= Duration::minutes(rules.min_present_minutes) {
                    AttendanceStatus::Present
                } else if still_open {
                    AttendanceStatus::Working
                } else {
                    AttendanceStatus::Absent
                }
            }
            _ => {
                if still_open {
                    AttendanceStatus::Working
                } else {
                    AttendanceStatus::Absent
                }
            }
        },
    };

    AttendanceRecord {
        clock_in,
        clock_out,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attendance::window::resolve_window;
    use chrono::{NaiveDate, NaiveTime};

    fn day_shift() -> ShiftWindow {
        // 09:00-17:00 on 2024-01-10
        resolve_window(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        )
    }

    fn at(day: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn full_day_is_present() {
        let rec = derive_attendance(
            day_shift(),
            &AttendanceRules::default(),
            &[at(10, 8, 50), at(10, 17, 10)],
            at(10, 20, 0),
        );
        assert_eq!(rec.clock_in, Some(at(10, 8, 50)));
        assert_eq!(rec.clock_out, Some(at(10, 17, 10)));
        assert_eq!(rec.status, AttendanceStatus::Present);
    }

    #[test]
    fn open_session_is_working_before_the_window_closes() {
        // out-window closes at 17:00 + 120min = 19:00
        let rules = AttendanceRules::with_out_buffer(120);
        let rec = derive_attendance(day_shift(), &rules, &[at(10, 9, 5)], at(10, 18, 30));
        assert_eq!(rec.clock_in, Some(at(10, 9, 5)));
        assert_eq!(rec.clock_out, None);
        assert_eq!(rec.status, AttendanceStatus::Working);
    }

    #[test]
    fn open_session_turns_absent_after_the_window_closes() {
        let rules = AttendanceRules::with_out_buffer(120);
        let rec = derive_attendance(day_shift(), &rules, &[at(10, 9, 5)], at(10, 20, 0));
        assert_eq!(rec.status, AttendanceStatus::Absent);
        assert_eq!(rec.clock_out, None);
    }

    #[test]
    fn no_punches_is_absent_without_error() {
        let rec = derive_attendance(
            day_shift(),
            &AttendanceRules::default(),
            &[],
            at(10, 12, 0),
        );
        assert_eq!(rec.clock_in, None);
        assert_eq!(rec.clock_out, None);
        assert_eq!(rec.status, AttendanceStatus::Absent);
    }

    #[test]
    fn earliest_in_window_punch_wins_regardless_of_input_order() {
        let rec = derive_attendance(
            day_shift(),
            &AttendanceRules::default(),
            &[at(10, 9, 20), at(10, 8, 45), at(10, 9, 5)],
            at(10, 12, 0),
        );
        assert_eq!(rec.clock_in, Some(at(10, 8, 45)));
    }

    #[test]
    fn no_clock_in_means_no_clock_out() {
        // punch well inside the out-window, nothing near the start
        let rec = derive_attendance(
            day_shift(),
            &AttendanceRules::default(),
            &[at(10, 16, 30)],
            at(10, 23, 30),
        );
        assert_eq!(rec.clock_in, None);
        assert_eq!(rec.clock_out, None);
        assert_eq!(rec.status, AttendanceStatus::Absent);
    }

    #[test]
    fn present_threshold_is_exact() {
        let rules = AttendanceRules::default();
        // exactly 480 minutes: 08:50 -> 16:50
        let rec = derive_attendance(
            day_shift(),
            &rules,
            &[at(10, 8, 50), at(10, 16, 50)],
            at(11, 0, 0),
        );
        assert_eq!(rec.status, AttendanceStatus::Present);

        // one minute short, window long closed
        let rec = derive_attendance(
            day_shift(),
            &rules,
            &[at(10, 8, 50), at(10, 16, 49)],
            at(11, 0, 0),
        );
        assert_eq!(rec.status, AttendanceStatus::Absent);

        // one minute short but the out-window is still open
        let rec = derive_attendance(
            day_shift(),
            &rules,
            &[at(10, 8, 50), at(10, 16, 49)],
            at(10, 18, 0),
        );
        assert_eq!(rec.status, AttendanceStatus::Working);
    }

    #[test]
    fn short_session_stays_working_while_open() {
        let rules = AttendanceRules::with_out_buffer(120);
        // 09:00 in, 15:30 out-window punch, only 6.5h worked
        let rec = derive_attendance(
            day_shift(),
            &rules,
            &[at(10, 9, 0), at(10, 15, 30)],
            at(10, 16, 0),
        );
        assert_eq!(rec.clock_out, Some(at(10, 15, 30)));
        assert_eq!(rec.status, AttendanceStatus::Working);
    }

    #[test]
    fn out_punch_not_after_in_punch_is_ignored_for_status() {
        // single punch sits in both windows of a short shift
        let w = resolve_window(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        let rules = AttendanceRules::with_out_buffer(120);
        let rec = derive_attendance(w, &rules, &[at(10, 9, 30)], at(10, 13, 0));
        // 09:30 is the clock-in and also the earliest out-window punch;
        // co == ci falls through to the no-clock-out branch, window closed
        assert_eq!(rec.clock_in, Some(at(10, 9, 30)));
        assert_eq!(rec.clock_out, Some(at(10, 9, 30)));
        assert_eq!(rec.status, AttendanceStatus::Absent);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let rules = AttendanceRules::default();
        // exactly at start - 240min and end + 360min
        let rec = derive_attendance(
            day_shift(),
            &rules,
            &[at(10, 5, 0), at(10, 23, 0)],
            at(11, 6, 0),
        );
        assert_eq!(rec.clock_in, Some(at(10, 5, 0)));
        assert_eq!(rec.clock_out, Some(at(10, 23, 0)));
        assert_eq!(rec.status, AttendanceStatus::Present);
    }

    #[test]
    fn overnight_shift_derives_across_midnight() {
        let w = resolve_window(
            NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
        );
        let rec = derive_attendance(
            w,
            &AttendanceRules::default(),
            &[at(10, 21, 55), at(11, 6, 5)],
            at(11, 9, 0),
        );
        assert_eq!(rec.clock_in, Some(at(10, 21, 55)));
        assert_eq!(rec.clock_out, Some(at(11, 6, 5)));
        assert_eq!(rec.status, AttendanceStatus::Present);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let punches = [at(10, 9, 5), at(10, 15, 30)];
        let rules = AttendanceRules::default();
        let a = derive_attendance(day_shift(), &rules, &punches, at(10, 16, 0));
        let b = derive_attendance(day_shift(), &rules, &punches, at(10, 16, 0));
        assert_eq!(a, b);
    }
}
