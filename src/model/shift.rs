use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "shift_code": "G",
        "name": "General",
        "start_time": "09:00:00",
        "end_time": "17:00:00"
    })
)]
pub struct Shift {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "G")]
    pub shift_code: String,

    #[schema(example = "General")]
    pub name: String,

    /// Null start or end marks an OFF shift with no derivable window.
    #[schema(example = "09:00:00", value_type = String, nullable = true)]
    pub start_time: Option<NaiveTime>,

    #[schema(example = "17:00:00", value_type = String, nullable = true)]
    pub end_time: Option<NaiveTime>,
}
