use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{AttendanceRecord, summarize_shift};
use crate::store::{attendance::AttendanceStore, is_duplicate_key};

/// Punch-in endpoint. Opens today's record; one per employee per day.
#[utoipa::path(
    post,
    path = "/api/attendance/punch-in",
    responses(
        (status = 200, description = "Punched in successfully", body = Object, example = json!({
            "message": "Punched in successfully",
            "punch_in_time": "2025-06-17T03:30:00Z"
        })),
        (status = 400, description = "Already punched in today", body = Object, example = json!({
            "detail": "Already punched in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("punch in")?;

    let now = Utc::now();
    let today = now.date_naive();

    if let Some(existing) = AttendanceStore::for_user_on(pool.get_ref(), &auth.user_id, today).await?
    {
        if existing.punch_in.is_some() {
            return Err(ApiError::Conflict("Already punched in today".to_string()));
        }
    }

    let record = AttendanceRecord::open(&auth.user_id, &auth.name, &auth.email, now);

    match AttendanceStore::insert(pool.get_ref(), &record).await {
        Ok(()) => {}
        Err(e) if is_duplicate_key(&e) => {
            // lost the race against a concurrent punch-in
            return Err(ApiError::Conflict("Already punched in today".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    info!(
        user_id = %auth.user_id,
        date = %record.date,
        weekend = record.is_weekend,
        "Punched in"
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Punched in successfully",
        "punch_in_time": now
    })))
}

/// Punch-out endpoint. Closes the shift and stamps the derived hours.
#[utoipa::path(
    post,
    path = "/api/attendance/punch-out",
    responses(
        (status = 200, description = "Punched out successfully", body = Object, example = json!({
            "message": "Punched out successfully",
            "total_hours": 9.25,
            "break_duration": 0.5,
            "work_hours": 8.75,
            "is_complete": false
        })),
        (status = 400, description = "No active punch-in found for today", body = Object, example = json!({
            "detail": "No active punch-in found for today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn punch_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("punch out")?;

    let now = Utc::now();
    let today = now.date_naive();

    let record = AttendanceStore::for_user_on(pool.get_ref(), &auth.user_id, today).await?;

    let Some(record) = record else {
        return Err(ApiError::BadRequest(
            "No active punch-in found for today".to_string(),
        ));
    };
    let Some(punch_in) = record.punch_in else {
        return Err(ApiError::BadRequest(
            "No active punch-in found for today".to_string(),
        ));
    };
    if record.punch_out.is_some() {
        return Err(ApiError::BadRequest("Already punched out today".to_string()));
    }

    let summary = summarize_shift(punch_in, now, record.break_window());

    let updated =
        AttendanceStore::close(pool.get_ref(), &auth.user_id, today, now, &summary).await?;
    if updated == 0 {
        // a concurrent punch-out got there first
        return Err(ApiError::BadRequest("Already punched out today".to_string()));
    }

    info!(
        user_id = %auth.user_id,
        total_hours = summary.total_hours,
        work_hours = summary.work_hours,
        status = %summary.status,
        "Punched out"
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Punched out successfully",
        "total_hours": summary.total_hours,
        "break_duration": summary.break_duration,
        "work_hours": summary.work_hours,
        "is_complete": summary.is_complete
    })))
}

/// Start-break endpoint. One break window per shift.
#[utoipa::path(
    post,
    path = "/api/attendance/start-break",
    responses(
        (status = 200, description = "Break started", body = Object, example = json!({
            "message": "Break started",
            "break_start_time": "2025-06-17T07:30:00Z"
        })),
        (status = 400, description = "Must punch in first", body = Object, example = json!({
            "detail": "Must punch in first"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn start_break(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("start break")?;

    let now = Utc::now();
    let today = now.date_naive();

    let record = AttendanceStore::for_user_on(pool.get_ref(), &auth.user_id, today).await?;

    let Some(record) = record else {
        return Err(ApiError::BadRequest("Must punch in first".to_string()));
    };
    if record.punch_in.is_none() {
        return Err(ApiError::BadRequest("Must punch in first".to_string()));
    }
    if record.punch_out.is_some() {
        return Err(ApiError::BadRequest("Already punched out".to_string()));
    }
    if record.has_open_break() {
        return Err(ApiError::BadRequest("Break already in progress".to_string()));
    }
    if record.break_start.is_some() {
        return Err(ApiError::BadRequest("Break already taken today".to_string()));
    }

    let updated = AttendanceStore::start_break(pool.get_ref(), &auth.user_id, today, now).await?;
    if updated == 0 {
        return Err(ApiError::BadRequest("Break already in progress".to_string()));
    }

    info!(user_id = %auth.user_id, "Break started");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Break started",
        "break_start_time": now
    })))
}

/// End-break endpoint.
#[utoipa::path(
    post,
    path = "/api/attendance/end-break",
    responses(
        (status = 200, description = "Break ended", body = Object, example = json!({
            "message": "Break ended",
            "break_end_time": "2025-06-17T08:00:00Z"
        })),
        (status = 400, description = "No active break found", body = Object, example = json!({
            "detail": "No active break found"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn end_break(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    auth.require_employee("end break")?;

    let now = Utc::now();
    let today = now.date_naive();

    let record = AttendanceStore::for_user_on(pool.get_ref(), &auth.user_id, today).await?;

    let Some(record) = record else {
        return Err(ApiError::BadRequest("No active break found".to_string()));
    };
    if record.break_start.is_none() {
        return Err(ApiError::BadRequest("No active break found".to_string()));
    }
    if record.break_end.is_some() {
        return Err(ApiError::BadRequest("Break already ended".to_string()));
    }

    let updated = AttendanceStore::end_break(pool.get_ref(), &auth.user_id, today, now).await?;
    if updated == 0 {
        return Err(ApiError::BadRequest("Break already ended".to_string()));
    }

    info!(user_id = %auth.user_id, "Break ended");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Break ended",
        "break_end_time": now
    })))
}
