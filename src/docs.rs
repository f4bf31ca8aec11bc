use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

use crate::api::reports::MonthlyReportQuery;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus};
use crate::model::role::Role;
use crate::model::user::PublicUser;
use crate::models::{AuthResp, LoginReq, RegisterReq};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "WorkShift API",
        version = "1.0.0",
        description = r#"
## Employee Time Tracking

This API powers a **time tracking** backend for small teams.

### 🔹 Key Features
- **Accounts**
  - Register and log in as an employee or an employer
- **Attendance**
  - Punch in, take a single break, punch out; nine work hours make a complete shift
- **Reports**
  - Personal history, today's roster, and monthly reports
- **Daily Alerts**
  - Employers are emailed at 9 PM IST about incomplete shifts

### 🔐 Security
Attendance and report endpoints are protected with **JWT Bearer authentication**.
Reporting endpoints are restricted to the **employer** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::attendance::punch_in,
        crate::api::attendance::punch_out,
        crate::api::attendance::start_break,
        crate::api::attendance::end_break,

        crate::api::reports::today_status,
        crate::api::reports::my_history,
        crate::api::reports::all_employees,
        crate::api::reports::monthly_report
    ),
    components(
        schemas(
            RegisterReq,
            LoginReq,
            AuthResp,
            PublicUser,
            Role,
            AttendanceRecord,
            AttendanceStatus,
            MonthlyReportQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login APIs"),
        (name = "Attendance", description = "Punch and break tracking APIs"),
        (name = "Reports", description = "Attendance report APIs"),
    )
)]
pub struct ApiDoc;
