use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::store::attendance::AttendanceStore;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MonthlyReportQuery {
    #[schema(example = 2025)]
    pub year: i32,
    /// 1-based calendar month.
    #[schema(example = 6)]
    pub month: u32,
}

/// First and last day of the given month, or `None` for an impossible
/// year/month pair.
pub(crate) fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next_month.pred_opt()?))
}

/// Today's record for the caller, if any.
#[utoipa::path(
    get,
    path = "/api/attendance/today-status",
    responses(
        (status = 200, description = "Today's attendance snapshot", body = Object, example = json!({
            "has_attendance": false
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn today_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("view their status")?;

    let today = Utc::now().date_naive();

    match AttendanceStore::for_user_on(pool.get_ref(), &auth.user_id, today).await? {
        Some(record) => Ok(HttpResponse::Ok().json(json!({
            "has_attendance": true,
            "attendance": record
        }))),
        None => Ok(HttpResponse::Ok().json(json!({ "has_attendance": false }))),
    }
}

/// The caller's recent records, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance/my-history",
    responses(
        (status = 200, description = "Up to 90 most recent records", body = Vec<AttendanceRecord>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn my_history(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("view their history")?;

    let records = AttendanceStore::history_for_user(pool.get_ref(), &auth.user_id).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Today's records across the whole roster. Employer only.
#[utoipa::path(
    get,
    path = "/api/attendance/all-employees",
    responses(
        (status = 200, description = "Every record dated today", body = Vec<AttendanceRecord>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn all_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employer("view all attendance")?;

    let today = Utc::now().date_naive();
    let records = AttendanceStore::for_date(pool.get_ref(), today).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Every record in a calendar month, newest first. Employer only;
/// months nobody worked come back as an empty list.
#[utoipa::path(
    post,
    path = "/api/attendance/monthly-report",
    request_body = MonthlyReportQuery,
    responses(
        (status = 200, description = "Records for the month", body = Vec<AttendanceRecord>),
        (status = 400, description = "Invalid year or month", body = Object, example = json!({
            "detail": "Invalid year or month"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reports"
)]
pub async fn monthly_report(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Json<MonthlyReportQuery>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employer("view monthly reports")?;

    let (start, end) = month_range(query.year, query.month)
        .ok_or_else(|| ApiError::BadRequest("Invalid year or month".to_string()))?;

    let records = AttendanceStore::for_date_range(pool.get_ref(), start, end).await?;
    Ok(HttpResponse::Ok().json(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_range_covers_a_normal_month() {
        let (start, end) = month_range(2025, 6).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 30).unwrap());
    }

    #[test]
    fn month_range_handles_december() {
        let (start, end) = month_range(2025, 12).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }

    #[test]
    fn month_range_handles_leap_february() {
        let (_, end) = month_range(2024, 2).unwrap();
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn month_range_rejects_month_zero_and_thirteen() {
        assert!(month_range(2025, 0).is_none());
        assert!(month_range(2025, 13).is_none());
    }
}
