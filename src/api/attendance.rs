use std::collections::HashMap;

use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

use crate::attendance::clock::{Clock, SystemClock};
use crate::attendance::derive::{AttendanceStatus, derive_attendance};
use crate::attendance::window::resolve_window;
use crate::attendance::{
    AttendanceRules, DEFAULT_INSTANCE_OUT_BUFFER_MIN, DEFAULT_SHIFT_OUT_BUFFER_MIN,
    active::{find_active, find_recent_with_counts},
    parse_days_back, parse_out_buffer,
};
use crate::model::shift::Shift;
use crate::utils::name_cache;

// -------------------- Per-shift attendance --------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct ShiftAttendanceQuery {
    /// Shift code, e.g. "G"
    pub shift_code: String,
    /// Attendance date (YYYY-MM-DD)
    #[param(value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Minutes after shift end to keep accepting out-punches.
    /// Non-numeric or negative input falls back to 360.
    pub out_buffer_minutes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceRow {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    #[schema(example = "Rahim Uddin")]
    pub name: String,
    #[schema(example = "G")]
    pub shift_code: String,
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub attendance_date: NaiveDate,
    #[schema(example = "2024-01-10T08:50:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_in: Option<NaiveDateTime>,
    #[schema(example = "2024-01-10T17:10:00", value_type = String, format = "date-time", nullable = true)]
    pub clock_out: Option<NaiveDateTime>,
    #[schema(example = "Present")]
    pub status: AttendanceStatus,
}

#[derive(Serialize, ToSchema, Default)]
pub struct AttendanceSummary {
    #[schema(example = 10)]
    pub present: u32,
    #[schema(example = 2)]
    pub working: u32,
    #[schema(example = 1)]
    pub absent: u32,
}

/// Rule parameters echoed back so the frontend can display how the
/// statuses were judged.
#[derive(Serialize, ToSchema)]
pub struct RuleEcho {
    #[schema(example = 240)]
    pub in_buffer_minutes: i64,
    #[schema(example = 120)]
    pub out_before_end_minutes: i64,
    #[schema(example = 360)]
    pub out_after_end_minutes: i64,
    #[schema(example = 480)]
    pub min_present_minutes: i64,
}

impl From<&AttendanceRules> for RuleEcho {
    fn from(r: &AttendanceRules) -> Self {
        Self {
            in_buffer_minutes: r.in_buffer_minutes,
            out_before_end_minutes: r.out_before_end_minutes,
            out_after_end_minutes: r.out_after_end_minutes,
            min_present_minutes: r.min_present_minutes,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct ShiftAttendanceResponse {
    pub data: Vec<AttendanceRow>,
    pub summary: AttendanceSummary,
    pub rules: RuleEcho,
    #[schema(nullable = true, example = json!(null))]
    pub note: Option<String>,
}

/// Per-shift attendance
///
/// Derives clock-in/clock-out and a live Present/Working/Absent status for
/// every employee mapped to the shift on the given date. Nothing is
/// persisted; repeating the request later can change Working to Absent.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/shift",
    params(ShiftAttendanceQuery),
    responses(
        (status = 200, description = "Derived attendance with counts", body = ShiftAttendanceResponse),
        (status = 404, description = "Shift not found", body = Object, example = json!({
            "message": "Shift not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn shift_attendance(
    pool: web::Data<MySqlPool>,
    clock: web::Data<SystemClock>,
    query: web::Query<ShiftAttendanceQuery>,
) -> actix_web::Result<impl Responder> {
    let shift = sqlx::query_as::<_, Shift>("SELECT * FROM shifts WHERE shift_code = ?")
        .bind(&query.shift_code)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, shift_code = %query.shift_code, "Failed to fetch shift");
            ErrorInternalServerError("Database error")
        })?;

    let Some(shift) = shift else {
        return Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Shift not found"
        })));
    };

    let rules = AttendanceRules::with_out_buffer(parse_out_buffer(
        query.out_buffer_minutes.as_deref(),
        DEFAULT_SHIFT_OUT_BUFFER_MIN,
    ));

    let (Some(start_time), Some(end_time)) = (shift.start_time, shift.end_time) else {
        // OFF shift: no window, nothing to derive
        return Ok(HttpResponse::Ok().json(ShiftAttendanceResponse {
            data: vec![],
            summary: AttendanceSummary::default(),
            rules: RuleEcho::from(&rules),
            note: Some("Shift has no start/end time; attendance is not derived for OFF shifts".into()),
        }));
    };

    let emp_codes: Vec<String> = sqlx::query_scalar::<_, String>(
        "SELECT emp_code FROM shift_mappings WHERE date = ? AND shift_code = ? ORDER BY emp_code",
    )
    .bind(query.date)
    .bind(&query.shift_code)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, shift_code = %query.shift_code, "Failed to fetch shift mappings");
        ErrorInternalServerError("Database error")
    })?;

    let window = resolve_window(start_time, end_time, query.date);

    // Bound the punch scan to the widest range the deriver can use
    let range_lo = window.start - Duration::minutes(rules.in_buffer_minutes);
    let range_hi = window.end + Duration::minutes(rules.out_after_end_minutes);

    let mut punches_by_emp: HashMap<String, Vec<NaiveDateTime>> = HashMap::new();
    if !emp_codes.is_empty() {
        let placeholders = vec!["?"; emp_codes.len()].join(", ");
        let sql = format!(
            "SELECT emp_code, punch_time FROM punches \
             WHERE punch_time >= ? AND punch_time <= ? AND emp_code IN ({}) \
             ORDER BY punch_time",
            placeholders
        );
        debug!(sql = %sql, from = %range_lo, to = %range_hi, "Fetching punches");

        let mut punch_query = sqlx::query_as::<_, (String, NaiveDateTime)>(&sql)
            .bind(range_lo)
            .bind(range_hi);
        for code in &emp_codes {
            punch_query = punch_query.bind(code);
        }

        let rows = punch_query.fetch_all(pool.get_ref()).await.map_err(|e| {
            error!(error = %e, "Failed to fetch punches");
            ErrorInternalServerError("Database error")
        })?;

        for (code, at) in rows {
            punches_by_emp.entry(code).or_default().push(at);
        }
    }

    let now = clock.now_local();
    let mut summary = AttendanceSummary::default();
    let mut data = Vec::with_capacity(emp_codes.len());

    for emp_code in emp_codes {
        let punches = punches_by_emp.remove(&emp_code).unwrap_or_default();
        let record = derive_attendance(window, &rules, &punches, now);

        match record.status {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Working => summary.working += 1,
            AttendanceStatus::Absent => summary.absent += 1,
        }

        let name = name_cache::get_name(pool.get_ref(), &emp_code)
            .await
            .unwrap_or_else(|| emp_code.clone());

        data.push(AttendanceRow {
            emp_code,
            name,
            shift_code: shift.shift_code.clone(),
            attendance_date: query.date,
            clock_in: record.clock_in,
            clock_out: record.clock_out,
            status: record.status,
        });
    }

    Ok(HttpResponse::Ok().json(ShiftAttendanceResponse {
        data,
        summary,
        rules: RuleEcho::from(&rules),
        note: None,
    }))
}

// -------------------- Active-now instances --------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct InstanceQuery {
    /// Minutes after shift end an instance stays active. Invalid input
    /// falls back to 240.
    pub out_buffer_minutes: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct CurrentInstance {
    #[schema(example = "N")]
    pub shift_code: String,
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "2024-01-10T22:00:00", value_type = String, format = "date-time")]
    pub shift_start: NaiveDateTime,
    #[schema(example = "2024-01-11T06:00:00", value_type = String, format = "date-time")]
    pub shift_end: NaiveDateTime,
}

/// Shift instances active right now
///
/// Today's and yesterday's occurrence of every shift are candidates, so an
/// overnight shift started yesterday still shows up in the morning.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/current",
    params(InstanceQuery),
    responses(
        (status = 200, description = "Active shift instances, earliest start first", body = [CurrentInstance]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn current_instances(
    pool: web::Data<MySqlPool>,
    clock: web::Data<SystemClock>,
    query: web::Query<InstanceQuery>,
) -> actix_web::Result<impl Responder> {
    let shifts = sqlx::query_as::<_, Shift>("SELECT * FROM shifts ORDER BY shift_code")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch shifts");
            ErrorInternalServerError("Database error")
        })?;

    let out_buffer = parse_out_buffer(
        query.out_buffer_minutes.as_deref(),
        DEFAULT_INSTANCE_OUT_BUFFER_MIN,
    );

    let now = clock.now_local();
    let instances: Vec<CurrentInstance> = find_active(&shifts, now.date(), now, out_buffer)
        .into_iter()
        .map(|i| CurrentInstance {
            shift_code: i.shift_code,
            date: i.date,
            shift_start: i.window.start,
            shift_end: i.window.end,
        })
        .collect();

    Ok(HttpResponse::Ok().json(instances))
}

// -------------------- Recent instances with counts --------------------

#[derive(Debug, Deserialize, IntoParams)]
pub struct RecentInstanceQuery {
    /// Minutes after shift end an instance stays active. Invalid input
    /// falls back to 240.
    pub out_buffer_minutes: Option<String>,
    /// How many days back to look, clamped to 0-7. Default 1.
    pub days_back: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RecentInstance {
    #[schema(example = "G")]
    pub shift_code: String,
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(example = "2024-01-10T09:00:00", value_type = String, format = "date-time")]
    pub shift_start: NaiveDateTime,
    #[schema(example = "2024-01-10T17:00:00", value_type = String, format = "date-time")]
    pub shift_end: NaiveDateTime,
    #[schema(example = 12)]
    pub mapped_count: i64,
    #[schema(example = true)]
    pub is_active: bool,
}

/// Recent shift instances with mapped-employee counts
///
/// Every (shift, date) pair over the window that has at least one employee
/// mapped, most recent first, flagged live/ended.
#[utoipa::path(
    get,
    path = "/api/v1/attendance/recent",
    params(RecentInstanceQuery),
    responses(
        (status = 200, description = "Recent shift instances, most recent first", body = [RecentInstance]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn recent_instances(
    pool: web::Data<MySqlPool>,
    clock: web::Data<SystemClock>,
    query: web::Query<RecentInstanceQuery>,
) -> actix_web::Result<impl Responder> {
    let shifts = sqlx::query_as::<_, Shift>("SELECT * FROM shifts ORDER BY shift_code")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch shifts");
            ErrorInternalServerError("Database error")
        })?;

    let out_buffer = parse_out_buffer(
        query.out_buffer_minutes.as_deref(),
        DEFAULT_INSTANCE_OUT_BUFFER_MIN,
    );
    let days_back = parse_days_back(query.days_back.as_deref());

    let now = clock.now_local();
    let today = now.date();
    let from = today - Duration::days(days_back);

    let count_rows = sqlx::query_as::<_, (String, NaiveDate, i64)>(
        r#"
        SELECT shift_code, date, COUNT(*)
        FROM shift_mappings
        WHERE date >= ? AND date <= ?
        GROUP BY shift_code, date
        "#,
    )
    .bind(from)
    .bind(today)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, "Failed to count shift mappings");
        ErrorInternalServerError("Database error")
    })?;

    let counts: HashMap<(String, NaiveDate), i64> = count_rows
        .into_iter()
        .map(|(code, date, n)| ((code, date), n))
        .collect();

    let instances: Vec<RecentInstance> =
        find_recent_with_counts(&shifts, &counts, today, now, out_buffer, days_back)
            .into_iter()
            .map(|i| RecentInstance {
                shift_code: i.shift_code,
                date: i.date,
                shift_start: i.window.start,
                shift_end: i.window.end,
                mapped_count: i.mapped_count.unwrap_or(0),
                is_active: i.is_active,
            })
            .collect();

    Ok(HttpResponse::Ok().json(instances))
}
