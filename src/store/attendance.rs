use chrono::{DateTime, NaiveDate, Utc};
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceRecord, ShiftSummary};

/// Page size for an employee's own history.
pub const HISTORY_LIMIT: i64 = 90;
/// Cap on single-day scans (today's roster, the notifier sweep).
pub const DAY_SCAN_LIMIT: i64 = 1000;
/// Cap on the monthly report scan.
pub const MONTH_SCAN_LIMIT: i64 = 10_000;

pub struct AttendanceStore;

impl AttendanceStore {
    /// Fails with a duplicate-key error when a record for the same user
    /// and date already exists.
    pub async fn insert(pool: &MySqlPool, record: &AttendanceRecord) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO attendance
                (attendance_id, user_id, user_name, user_email, date,
                 punch_in, punch_out, break_start, break_end,
                 total_hours, break_duration, is_complete, is_weekend, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.attendance_id)
        .bind(&record.user_id)
        .bind(&record.user_name)
        .bind(&record.user_email)
        .bind(record.date)
        .bind(record.punch_in)
        .bind(record.punch_out)
        .bind(record.break_start)
        .bind(record.break_end)
        .bind(record.total_hours)
        .bind(record.break_duration)
        .bind(record.is_complete)
        .bind(record.is_weekend)
        .bind(record.status)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn for_user_on(
        pool: &MySqlPool,
        user_id: &str,
        date: NaiveDate,
    ) -> sqlx::Result<Option<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_id, user_id, user_name, user_email, date,
                   punch_in, punch_out, break_start, break_end,
                   total_hours, break_duration, is_complete, is_weekend, status
            FROM attendance
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    /// Open the break window. The guard clauses make the write a no-op
    /// unless the shift is open and no break was taken yet; returns the
    /// number of rows changed.
    pub async fn start_break(
        pool: &MySqlPool,
        user_id: &str,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET break_start = ?
            WHERE user_id = ? AND date = ?
              AND punch_in IS NOT NULL AND punch_out IS NULL
              AND break_start IS NULL
            "#,
        )
        .bind(at)
        .bind(user_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Close the break window; a no-op unless a break is open.
    pub async fn end_break(
        pool: &MySqlPool,
        user_id: &str,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET break_end = ?
            WHERE user_id = ? AND date = ?
              AND break_start IS NOT NULL AND break_end IS NULL
            "#,
        )
        .bind(at)
        .bind(user_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Punch out: stamp the exit time and the derived shift numbers in
    /// one write. A no-op when the shift was already closed.
    pub async fn close(
        pool: &MySqlPool,
        user_id: &str,
        date: NaiveDate,
        punch_out: DateTime<Utc>,
        summary: &ShiftSummary,
    ) -> sqlx::Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE attendance
            SET punch_out = ?, total_hours = ?, break_duration = ?,
                is_complete = ?, status = ?
            WHERE user_id = ? AND date = ? AND punch_out IS NULL
            "#,
        )
        .bind(punch_out)
        .bind(summary.total_hours)
        .bind(summary.break_duration)
        .bind(summary.is_complete)
        .bind(summary.status)
        .bind(user_id)
        .bind(date)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Most recent records first, capped at [`HISTORY_LIMIT`].
    pub async fn history_for_user(
        pool: &MySqlPool,
        user_id: &str,
    ) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_id, user_id, user_name, user_email, date,
                   punch_in, punch_out, break_start, break_end,
                   total_hours, break_duration, is_complete, is_weekend, status
            FROM attendance
            WHERE user_id = ?
            ORDER BY date DESC
            LIMIT ?
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_LIMIT)
        .fetch_all(pool)
        .await
    }

    pub async fn for_date(pool: &MySqlPool, date: NaiveDate) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_id, user_id, user_name, user_email, date,
                   punch_in, punch_out, break_start, break_end,
                   total_hours, break_duration, is_complete, is_weekend, status
            FROM attendance
            WHERE date = ?
            LIMIT ?
            "#,
        )
        .bind(date)
        .bind(DAY_SCAN_LIMIT)
        .fetch_all(pool)
        .await
    }

    /// Same-day records excluding weekend punch-ins; the notifier's view.
    pub async fn weekday_for_date(
        pool: &MySqlPool,
        date: NaiveDate,
    ) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_id, user_id, user_name, user_email, date,
                   punch_in, punch_out, break_start, break_end,
                   total_hours, break_duration, is_complete, is_weekend, status
            FROM attendance
            WHERE date = ? AND is_weekend = FALSE
            LIMIT ?
            "#,
        )
        .bind(date)
        .bind(DAY_SCAN_LIMIT)
        .fetch_all(pool)
        .await
    }

    pub async fn for_date_range(
        pool: &MySqlPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> sqlx::Result<Vec<AttendanceRecord>> {
        sqlx::query_as::<_, AttendanceRecord>(
            r#"
            SELECT attendance_id, user_id, user_name, user_email, date,
                   punch_in, punch_out, break_start, break_end,
                   total_hours, break_duration, is_complete, is_weekend, status
            FROM attendance
            WHERE date BETWEEN ? AND ?
            ORDER BY date DESC
            LIMIT ?
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(MONTH_SCAN_LIMIT)
        .fetch_all(pool)
        .await
    }
}
