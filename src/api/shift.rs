use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveTime;
use serde::Deserialize;
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::{
    model::shift::Shift,
    utils::db_utils::{SqlValue, build_update_sql, execute_update},
};

#[derive(Deserialize, ToSchema)]
pub struct CreateShift {
    #[schema(example = "N")]
    pub shift_code: String,
    #[schema(example = "Night")]
    pub name: String,
    /// Leave both times null for an OFF shift
    #[schema(example = "22:00:00", value_type = String, nullable = true)]
    pub start_time: Option<NaiveTime>,
    #[schema(example = "06:00:00", value_type = String, nullable = true)]
    pub end_time: Option<NaiveTime>,
}

/// Create shift definition
#[utoipa::path(
    post,
    path = "/api/v1/shifts",
    request_body = CreateShift,
    responses(
        (status = 200, description = "Shift created", body = Object, example = json!({
            "message": "Shift created successfully"
        })),
        (status = 400, description = "Shift code already exists", body = Object, example = json!({
            "message": "Shift code already exists"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn create_shift(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateShift>,
) -> impl Responder {
    let result = sqlx::query(
        r#"
        INSERT INTO shifts (shift_code, name, start_time, end_time)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&payload.shift_code)
    .bind(&payload.name)
    .bind(payload.start_time)
    .bind(payload.end_time)
    .execute(pool.get_ref())
    .await;

    match result {
        Ok(_) => HttpResponse::Ok().json(json!({
            "message": "Shift created successfully"
        })),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return HttpResponse::BadRequest().json(json!({
                        "message": "Shift code already exists"
                    }));
                }
            }

            error!(error = %e, shift_code = %payload.shift_code, "Failed to create shift");
            HttpResponse::InternalServerError().json(json!({
                "message": "Internal Server Error"
            }))
        }
    }
}

/// List shift definitions
#[utoipa::path(
    get,
    path = "/api/v1/shifts",
    responses(
        (status = 200, description = "All shift definitions", body = [Shift]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn list_shifts(pool: web::Data<MySqlPool>) -> actix_web::Result<impl Responder> {
    let shifts = sqlx::query_as::<_, Shift>("SELECT * FROM shifts ORDER BY shift_code")
        .fetch_all(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to fetch shifts");
            ErrorInternalServerError("Database error")
        })?;

    Ok(HttpResponse::Ok().json(shifts))
}

/// Get shift definition by code
#[utoipa::path(
    get,
    path = "/api/v1/shifts/{shift_code}",
    params(
        ("shift_code", Path, description = "Shift code")
    ),
    responses(
        (status = 200, description = "Shift found", body = Shift),
        (status = 404, description = "Shift not found", body = Object, example = json!({
            "message": "Shift not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn get_shift(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shift_code = path.into_inner();

    let shift = sqlx::query_as::<_, Shift>("SELECT * FROM shifts WHERE shift_code = ?")
        .bind(&shift_code)
        .fetch_optional(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, shift_code, "Failed to fetch shift");
            ErrorInternalServerError("Database error")
        })?;

    match shift {
        Some(s) => Ok(HttpResponse::Ok().json(s)),
        None => Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        }))),
    }
}

/// Update shift definition
///
/// Partial update: only the fields present in the body are written.
#[utoipa::path(
    put,
    path = "/api/v1/shifts/{shift_code}",
    params(
        ("shift_code", Path, description = "Shift code")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Shift updated", body = Object, example = json!({
            "message": "Shift updated successfully"
        })),
        (status = 404, description = "Shift not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn update_shift(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    let shift_code = path.into_inner();

    let update = build_update_sql("shifts", &body, "shift_code", SqlValue::String(shift_code))?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;

    if affected == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Shift updated successfully"
    })))
}

/// Delete shift definition
///
/// Refused while any employee-shift mapping still references the shift.
#[utoipa::path(
    delete,
    path = "/api/v1/shifts/{shift_code}",
    params(
        ("shift_code", Path, description = "Shift code")
    ),
    responses(
        (status = 200, description = "Shift deleted", body = Object, example = json!({
            "message": "Successfully deleted"
        })),
        (status = 404, description = "Shift not found"),
        (status = 409, description = "Shift still referenced by mappings", body = Object, example = json!({
            "message": "Shift is still assigned to employees"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Shift"
)]
pub async fn delete_shift(
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> actix_web::Result<impl Responder> {
    let shift_code = path.into_inner();

    let referenced = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM shift_mappings WHERE shift_code = ?",
    )
    .bind(&shift_code)
    .fetch_one(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, shift_code, "Failed to check shift references");
        ErrorInternalServerError("Database error")
    })?;

    if referenced > 0 {
        return Ok(HttpResponse::Conflict().json(json!({
            "message": "Shift is still assigned to employees"
        })));
    }

    let result = sqlx::query("DELETE FROM shifts WHERE shift_code = ?")
        .bind(&shift_code)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, shift_code, "Failed to delete shift");
            ErrorInternalServerError("Database error")
        })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        })));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Successfully deleted"
    })))
}
