use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;

/// Work hours (total minus break) a shift needs to count as complete.
pub const REQUIRED_WORK_HOURS: f64 = 9.0;
/// Longest break, in hours, that does not force `break_exceeded`.
pub const MAX_BREAK_HOURS: f64 = 1.0;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Punched in, not yet punched out.
    Active,
    Incomplete,
    Complete,
    /// Break longer than [`MAX_BREAK_HOURS`]; overrides the completion outcome.
    BreakExceeded,
}

/// One employee-day. Name and email are snapshotted at punch-in so
/// reports read without joining back to the users table.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceRecord {
    #[schema(example = "5bfe4a6c-13d8-48e0-9c2d-70e3a9f4d21b")]
    pub attendance_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    #[schema(value_type = String, format = "date", example = "2025-06-17")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_in: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_out: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub break_start: Option<DateTime<Utc>>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub break_end: Option<DateTime<Utc>>,
    #[schema(example = 9.75)]
    pub total_hours: Option<f64>,
    #[schema(example = 0.5)]
    pub break_duration: Option<f64>,
    pub is_complete: bool,
    pub is_weekend: bool,
    pub status: AttendanceStatus,
}

impl AttendanceRecord {
    /// Fresh record for a punch-in happening at `now`.
    pub fn open(user_id: &str, user_name: &str, user_email: &str, now: DateTime<Utc>) -> Self {
        let date = now.date_naive();
        Self {
            attendance_id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            user_name: user_name.to_string(),
            user_email: user_email.to_string(),
            date,
            punch_in: Some(now),
            punch_out: None,
            break_start: None,
            break_end: None,
            total_hours: None,
            break_duration: None,
            is_complete: false,
            is_weekend: is_weekend(date),
            status: AttendanceStatus::Active,
        }
    }

    pub fn has_open_break(&self) -> bool {
        self.break_start.is_some() && self.break_end.is_none()
    }

    /// Completed break interval, if both ends were recorded.
    pub fn break_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.break_start, self.break_end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Elapsed hours between two instants, rounded to two decimals.
pub fn calculate_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    round2(elapsed.num_milliseconds() as f64 / 3_600_000.0)
}

fn round2(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// Outcome of closing a shift at punch-out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShiftSummary {
    pub total_hours: f64,
    pub break_duration: f64,
    pub work_hours: f64,
    pub is_complete: bool,
    pub status: AttendanceStatus,
}

/// Derive the punch-out snapshot from the raw timestamps.
///
/// `total_hours` and `break_duration` are each rounded to two decimals;
/// `work_hours` is their plain difference. A break over one hour forces
/// the `break_exceeded` status even when the work hours reach nine, but
/// `is_complete` still reports the nine-hour test on its own.
pub fn summarize_shift(
    punch_in: DateTime<Utc>,
    punch_out: DateTime<Utc>,
    break_window: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> ShiftSummary {
    let total_hours = calculate_hours(punch_in, punch_out);
    let break_duration = match break_window {
        Some((start, end)) => calculate_hours(start, end),
        None => 0.0,
    };
    let work_hours = total_hours - break_duration;
    let is_complete = work_hours >= REQUIRED_WORK_HOURS;

    let mut status = if is_complete {
        AttendanceStatus::Complete
    } else {
        AttendanceStatus::Incomplete
    };
    if break_duration > MAX_BREAK_HOURS {
        status = AttendanceStatus::BreakExceeded;
    }

    ShiftSummary {
        total_hours,
        break_duration,
        work_hours,
        is_complete,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 17, h, m, 0).unwrap()
    }

    #[test]
    fn full_day_with_half_hour_break_is_incomplete() {
        let summary = summarize_shift(at(9, 0), at(18, 15), Some((at(13, 0), at(13, 30))));
        assert_eq!(summary.total_hours, 9.25);
        assert_eq!(summary.break_duration, 0.5);
        assert_eq!(summary.work_hours, 8.75);
        assert!(!summary.is_complete);
        assert_eq!(summary.status, AttendanceStatus::Incomplete);
    }

    #[test]
    fn long_day_with_half_hour_break_is_complete() {
        let summary = summarize_shift(at(8, 30), at(18, 15), Some((at(13, 0), at(13, 30))));
        assert_eq!(summary.total_hours, 9.75);
        assert_eq!(summary.work_hours, 9.25);
        assert!(summary.is_complete);
        assert_eq!(summary.status, AttendanceStatus::Complete);
    }

    #[test]
    fn sixty_five_minute_break_marks_break_exceeded() {
        let summary = summarize_shift(at(9, 0), at(19, 0), Some((at(12, 0), at(13, 5))));
        assert_eq!(summary.total_hours, 10.0);
        assert_eq!(summary.break_duration, 1.08);
        assert!((summary.work_hours - 8.92).abs() < 1e-9);
        assert!(!summary.is_complete);
        assert_eq!(summary.status, AttendanceStatus::BreakExceeded);
    }

    #[test]
    fn break_exceeded_overrides_a_complete_day() {
        let summary = summarize_shift(at(8, 0), at(19, 0), Some((at(12, 0), at(14, 0))));
        assert_eq!(summary.total_hours, 11.0);
        assert_eq!(summary.break_duration, 2.0);
        assert_eq!(summary.work_hours, 9.0);
        assert!(summary.is_complete);
        assert_eq!(summary.status, AttendanceStatus::BreakExceeded);
    }

    #[test]
    fn exactly_nine_work_hours_is_complete() {
        let summary = summarize_shift(at(9, 0), at(18, 0), None);
        assert_eq!(summary.total_hours, 9.0);
        assert_eq!(summary.break_duration, 0.0);
        assert_eq!(summary.work_hours, 9.0);
        assert!(summary.is_complete);
        assert_eq!(summary.status, AttendanceStatus::Complete);
    }

    #[test]
    fn no_break_window_counts_zero_break() {
        let summary = summarize_shift(at(10, 0), at(16, 30), None);
        assert_eq!(summary.total_hours, 6.5);
        assert_eq!(summary.break_duration, 0.0);
        assert_eq!(summary.status, AttendanceStatus::Incomplete);
    }

    #[test]
    fn hours_round_to_two_decimals() {
        let start = Utc.with_ymd_and_hms(2025, 6, 17, 9, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 6, 17, 9, 50, 0).unwrap();
        assert_eq!(calculate_hours(start, end), 0.83);
    }

    #[test]
    fn weekend_detection() {
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 6, 14).unwrap()));
        assert!(is_weekend(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()));
        assert!(!is_weekend(NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()));
    }

    #[test]
    fn open_record_starts_active_on_the_punch_date() {
        let now = Utc.with_ymd_and_hms(2025, 6, 14, 8, 0, 0).unwrap();
        let record = AttendanceRecord::open("u-1", "Jane Doe", "jane@acme.test", now);
        assert_eq!(record.date, now.date_naive());
        assert_eq!(record.punch_in, Some(now));
        assert!(record.punch_out.is_none());
        assert!(record.is_weekend);
        assert!(!record.is_complete);
        assert_eq!(record.status, AttendanceStatus::Active);
        assert!(!record.has_open_break());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&AttendanceStatus::BreakExceeded).unwrap();
        assert_eq!(json, "\"break_exceeded\"");
    }
}
