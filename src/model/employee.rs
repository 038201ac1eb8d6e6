use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "emp_code": "EMP-001",
        "name": "Rahim Uddin",
        "department": "Printing",
        "status": "active"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "EMP-001")]
    pub emp_code: String,

    #[schema(example = "Rahim Uddin")]
    pub name: String,

    #[schema(example = "Printing", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "active", nullable = true)]
    pub status: Option<String>,
}
