use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::{Duration, NaiveDateTime};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::{IntoParams, ToSchema};

use crate::attendance::clock::{Clock, SystemClock};
use crate::model::punch::Punch;

#[derive(Deserialize, ToSchema)]
pub struct CreatePunch {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    #[schema(example = "2024-01-10T08:50:00", value_type = String, format = "date-time")]
    pub punch_time: NaiveDateTime,
}

/// Record a punch
///
/// Append-only ingest from badge/biometric devices. A device replaying the
/// same (employee, instant) pair is absorbed silently.
#[utoipa::path(
    post,
    path = "/api/v1/punches",
    request_body = CreatePunch,
    responses(
        (status = 200, description = "Punch recorded", body = Object, example = json!({
            "message": "Punch recorded"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Punch"
)]
pub async fn create_punch(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreatePunch>,
) -> impl Responder {
    let result = sqlx::query(
        r#"
        INSERT INTO punches (emp_code, punch_time)
        VALUES (?, ?)
        "#,
    )
    .bind(&payload.emp_code)
    .bind(payload.punch_time)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Punch recorded"
        })),
        Err(e) => {
            // device replayed the same event
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return HttpResponse::Ok().json(json!({
                        "message": "Duplicate punch ignored"
                    }));
                }
            }

            error!(error = %e, emp_code = %payload.emp_code, "Failed to record punch");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PunchQuery {
    /// Employee code
    pub emp_code: String,
    /// Range start; defaults to 24 hours before now
    #[param(value_type = Option<String>, format = "date-time")]
    pub from: Option<NaiveDateTime>,
    /// Range end; defaults to now
    #[param(value_type = Option<String>, format = "date-time")]
    pub to: Option<NaiveDateTime>,
}

/// List punches for an employee
#[utoipa::path(
    get,
    path = "/api/v1/punches",
    params(PunchQuery),
    responses(
        (status = 200, description = "Punches in the range, oldest first", body = [Punch]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Punch"
)]
pub async fn list_punches(
    pool: web::Data<MySqlPool>,
    clock: web::Data<SystemClock>,
    query: web::Query<PunchQuery>,
) -> actix_web::Result<impl Responder> {
    let now = clock.now_local();
    let to = query.to.unwrap_or(now);
    let from = query.from.unwrap_or(to - Duration::hours(24));

    let punches = sqlx::query_as::<_, Punch>(
        r#"
        SELECT * FROM punches
        WHERE emp_code = ? AND punch_time >= ? AND punch_time <= ?
        ORDER BY punch_time
        LIMIT 1000
        "#,
    )
    .bind(&query.emp_code)
    .bind(from)
    .bind(to)
    .fetch_all(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, emp_code = %query.emp_code, "Failed to fetch punches");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(punches))
}
