use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Append-only badge/biometric event. No in/out flag is recorded; direction
/// is inferred from the punch's position relative to shift windows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Punch {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[schema(example = "2024-01-10T08:50:00", value_type = String, format = "date-time")]
    pub punch_time: NaiveDateTime,
}
