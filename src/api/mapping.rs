use actix_web::{HttpResponse, Responder, error::ErrorInternalServerError, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::{IntoParams, ToSchema};

use crate::model::mapping::ShiftMapping;

#[derive(Debug, Deserialize, IntoParams)]
pub struct MappingQuery {
    /// Roster date (YYYY-MM-DD)
    #[param(value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Optional shift filter
    pub shift_code: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpsertMapping {
    #[schema(example = "EMP-001")]
    pub emp_code: String,
    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,
    /// Empty string removes the employee's mapping for that date
    #[schema(example = "G")]
    pub shift_code: String,
}

/// List employee-shift mappings for a date
#[utoipa::path(
    get,
    path = "/api/v1/shift-mappings",
    params(MappingQuery),
    responses(
        (status = 200, description = "Mappings for the date", body = [ShiftMapping]),
        (status = 500, description = "Internal server error")
    ),
    tag = "ShiftMapping"
)]
pub async fn list_mappings(
    pool: web::Data<MySqlPool>,
    query: web::Query<MappingQuery>,
) -> actix_web::Result<impl Responder> {
    let mut sql =
        String::from("SELECT * FROM shift_mappings WHERE date = ?");
    if query.shift_code.is_some() {
        sql.push_str(" AND shift_code = ?");
    }
    sql.push_str(" ORDER BY shift_code, emp_code");
    debug!(sql = %sql, date = %query.date, "Fetching shift mappings");

    let mut mapping_query = sqlx::query_as::<_, ShiftMapping>(&sql).bind(query.date);
    if let Some(code) = &query.shift_code {
        mapping_query = mapping_query.bind(code);
    }

    let mappings = mapping_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, "Failed to fetch shift mappings");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(mappings))
}

/// Upsert an employee-shift mapping
///
/// One mapping per employee per date. An empty shift code deletes the
/// mapping; otherwise it is inserted or the existing one is repointed.
#[utoipa::path(
    put,
    path = "/api/v1/shift-mappings",
    request_body = UpsertMapping,
    responses(
        (status = 200, description = "Mapping stored or removed", body = Object, example = json!({
            "message": "Mapping saved"
        })),
        (status = 404, description = "Shift not found", body = Object, example = json!({
            "message": "Shift not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "ShiftMapping"
)]
pub async fn upsert_mapping(
    pool: web::Data<MySqlPool>,
    payload: web::Json<UpsertMapping>,
) -> actix_web::Result<impl Responder> {
    let shift_code = payload.shift_code.trim();

    if shift_code.is_empty() {
        let result = sqlx::query("DELETE FROM shift_mappings WHERE emp_code = ? AND date = ?")
            .bind(&payload.emp_code)
            .bind(payload.date)
            .execute(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, emp_code = %payload.emp_code, "Failed to remove mapping");
                ErrorInternalServerError("Database error")
            })?;

        let message = if result.rows_affected() == 0 {
            "No mapping to remove"
        } else {
            "Mapping removed"
        };
        return Ok(HttpResponse::Ok().json(json!({ "message": message })));
    }

    let shift_exists =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM shifts WHERE shift_code = ?")
            .bind(shift_code)
            .fetch_one(pool.get_ref())
            .await
            .map_err(|e| {
                error!(error = %e, shift_code, "Failed to check shift");
                ErrorInternalServerError("Database error")
            })?;

    if shift_exists == 0 {
        return Ok(HttpResponse::NotFound().json(json!({
            "message": "Shift not found"
        })));
    }

    sqlx::query(
        r#"
        INSERT INTO shift_mappings (emp_code, date, shift_code)
        VALUES (?, ?, ?)
        ON DUPLICATE KEY UPDATE shift_code = VALUES(shift_code)
        "#,
    )
    .bind(&payload.emp_code)
    .bind(payload.date)
    .bind(shift_code)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        error!(error = %e, emp_code = %payload.emp_code, "Failed to upsert mapping");
        ErrorInternalServerError("Database error")
    })?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Mapping saved"
    })))
}
