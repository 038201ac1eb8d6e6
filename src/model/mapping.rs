use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One employee, one date, one shift. Upserted by the roster endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct ShiftMapping {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[schema(example = "2024-01-10", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "G")]
    pub shift_code: String,
}
