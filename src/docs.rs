use crate::api::attendance::{
    AttendanceRow, AttendanceSummary, CurrentInstance, RecentInstance, RuleEcho,
    ShiftAttendanceResponse,
};
use crate::api::employee::{CreateEmployee, EmployeeListResponse};
use crate::api::mapping::UpsertMapping;
use crate::api::punch::CreatePunch;
use crate::api::shift::CreateShift;
use crate::attendance::derive::AttendanceStatus;
use crate::model::employee::Employee;
use crate::model::mapping::ShiftMapping;
use crate::model::punch::Punch;
use crate::model::shift::Shift;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cup Factory ERP API",
        version = "1.0.0",
        description = r#"
## Cup Factory ERP — Shift Attendance Backend

REST backend for shift rosters and attendance derivation in a small
manufacturing plant.

### 🔹 Key Features
- **Shift Master**
  - Define recurring shifts, including overnight (e.g. 22:00–06:00) and OFF shifts
- **Shift Rosters**
  - Map employees to a shift per calendar date
- **Punch Ingest**
  - Append-only badge/biometric events, no in/out flag recorded
- **Attendance Derivation**
  - Clock-in/clock-out and live Present/Working/Absent status, derived from
    punches and the shift window on every request — never persisted

### 📦 Response Format
- JSON-based RESTful responses
- Derived statuses are time-relative: the same query can answer differently
  once a shift's out-window closes

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::shift_attendance,
        crate::api::attendance::current_instances,
        crate::api::attendance::recent_instances,

        crate::api::shift::create_shift,
        crate::api::shift::list_shifts,
        crate::api::shift::get_shift,
        crate::api::shift::update_shift,
        crate::api::shift::delete_shift,

        crate::api::mapping::list_mappings,
        crate::api::mapping::upsert_mapping,

        crate::api::punch::create_punch,
        crate::api::punch::list_punches,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee
    ),
    components(
        schemas(
            Shift,
            CreateShift,
            ShiftMapping,
            UpsertMapping,
            Punch,
            CreatePunch,
            Employee,
            CreateEmployee,
            EmployeeListResponse,
            AttendanceStatus,
            AttendanceRow,
            AttendanceSummary,
            RuleEcho,
            ShiftAttendanceResponse,
            CurrentInstance,
            RecentInstance
        )
    ),
    tags(
        (name = "Attendance", description = "Derived attendance and shift instance APIs"),
        (name = "Shift", description = "Shift master APIs"),
        (name = "ShiftMapping", description = "Employee-shift roster APIs"),
        (name = "Punch", description = "Badge/biometric punch APIs"),
        (name = "Employee", description = "Employee record APIs"),
    )
)]
pub struct ApiDoc;
