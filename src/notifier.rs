use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use croner::Cron;
use croner::parser::{CronParser, Seconds};
use sqlx::MySqlPool;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::email::Mailer;
use crate::model::attendance::{AttendanceRecord, REQUIRED_WORK_HOURS};
use crate::model::role::Role;
use crate::store::attendance::AttendanceStore;
use crate::store::users::UserStore;

/// The daily sweep fires at 21:00 India Standard Time.
const ALERT_CRON: &str = "0 0 21 * * *";
/// IST is UTC+05:30 with no daylight saving, so a fixed offset is exact.
const IST_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// One employee flagged by the daily check.
#[derive(Debug, Clone, PartialEq)]
pub struct IncompleteShift {
    pub name: String,
    pub email: String,
    pub hours: f64,
}

/// Spawn the notifier background task.
///
/// Sleeps until the next 21:00 IST, sweeps today's weekday records for
/// incomplete shifts, and mails every employer. Clean shutdown via
/// CancellationToken.
pub fn start(pool: MySqlPool, mailer: Mailer, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        run_loop(pool, mailer, cancel).await;
    })
}

async fn run_loop(pool: MySqlPool, mailer: Mailer, cancel: CancellationToken) {
    let cron = match CronParser::builder()
        .seconds(Seconds::Optional)
        .build()
        .parse(ALERT_CRON)
    {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("Invalid alert cron '{}': {}", ALERT_CRON, e);
            return;
        }
    };

    tracing::info!("Daily notifier started, alerts fire at 21:00 IST");

    loop {
        let Some(next) = next_run(&cron, Utc::now()) else {
            tracing::error!("No next occurrence for the alert cron, notifier stopping");
            return;
        };

        let sleep_duration = (next - Utc::now())
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(1));

        tracing::debug!("Notifier sleeping for {:?}", sleep_duration);

        tokio::select! {
            _ = tokio::time::sleep(sleep_duration) => {},
            _ = cancel.cancelled() => {
                tracing::info!("Notifier shutting down");
                return;
            }
        }

        if let Err(e) = daily_attendance_check(&pool, &mailer).await {
            tracing::error!("Daily attendance check failed: {:#}", e);
        }
    }
}

fn ist() -> FixedOffset {
    FixedOffset::east_opt(IST_OFFSET_SECS).expect("IST offset is in range")
}

/// Next 21:00 IST instant strictly after `now`.
fn next_run(cron: &Cron, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let local = now.with_timezone(&ist());
    match cron.find_next_occurrence(&local, false) {
        Ok(next) => Some(next.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Failed to compute next alert time: {:#}", e);
            None
        }
    }
}

/// One sweep: collect incomplete shifts for today and mail employers.
/// A send failure is logged per employer; the sweep keeps going.
pub async fn daily_attendance_check(pool: &MySqlPool, mailer: &Mailer) -> Result<()> {
    tracing::info!("Running daily attendance check");

    let today = Utc::now().date_naive();
    let records = AttendanceStore::weekday_for_date(pool, today)
        .await
        .context("Failed to load today's attendance records")?;

    let incomplete = flag_incomplete(&records);
    if incomplete.is_empty() {
        tracing::info!("All shifts complete, no alert to send");
        return Ok(());
    }

    let employers = UserStore::list_by_role(pool, Role::Employer)
        .await
        .context("Failed to load employer accounts")?;

    tracing::info!(
        flagged = incomplete.len(),
        employers = employers.len(),
        "Sending incomplete-shift alerts"
    );

    for employer in &employers {
        if let Err(e) = mailer
            .send_incomplete_shift_alert(&employer.email, &incomplete)
            .await
        {
            tracing::error!(employer = %employer.email, "Failed to send alert email: {:#}", e);
        }
    }

    Ok(())
}

/// Pick out employees whose day falls short of a full shift.
///
/// Closed shifts are flagged when the recorded hours are under nine;
/// a shift still open at sweep time is flagged with zero hours. Records
/// without a punch-in never appear here.
pub(crate) fn flag_incomplete(records: &[AttendanceRecord]) -> Vec<IncompleteShift> {
    let mut incomplete = Vec::new();

    for record in records {
        match (record.punch_in, record.punch_out) {
            (Some(_), Some(_)) => {
                let hours = record.total_hours.unwrap_or(0.0);
                if hours < REQUIRED_WORK_HOURS {
                    incomplete.push(IncompleteShift {
                        name: record.user_name.clone(),
                        email: record.user_email.clone(),
                        hours,
                    });
                }
            }
            (Some(_), None) => {
                // Still on the clock at 9 PM
                incomplete.push(IncompleteShift {
                    name: record.user_name.clone(),
                    email: record.user_email.clone(),
                    hours: 0.0,
                });
            }
            _ => {}
        }
    }

    incomplete
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    use crate::model::attendance::AttendanceRecord;

    fn parse_alert_cron() -> Cron {
        CronParser::builder()
            .seconds(Seconds::Optional)
            .build()
            .parse(ALERT_CRON)
            .unwrap()
    }

    fn record(name: &str, email: &str) -> AttendanceRecord {
        let now = Utc.with_ymd_and_hms(2025, 6, 17, 3, 30, 0).unwrap();
        AttendanceRecord::open("u-1", name, email, now)
    }

    #[test]
    fn alert_cron_parses() {
        parse_alert_cron();
    }

    #[test]
    fn next_run_is_nine_pm_ist() {
        let cron = parse_alert_cron();
        let now = Utc.with_ymd_and_hms(2025, 6, 17, 3, 30, 0).unwrap();
        let next = next_run(&cron, now).unwrap();
        assert!(next > now);
        let local = next.with_timezone(&ist());
        assert_eq!(local.hour(), 21);
        assert_eq!(local.minute(), 0);
        assert_eq!(local.second(), 0);
    }

    #[test]
    fn next_run_rolls_to_tomorrow_after_nine_pm() {
        let cron = parse_alert_cron();
        // 21:30 IST == 16:00 UTC
        let now = Utc.with_ymd_and_hms(2025, 6, 17, 16, 0, 0).unwrap();
        let next = next_run(&cron, now).unwrap();
        let local = next.with_timezone(&ist());
        assert_eq!(local.date_naive().to_string(), "2025-06-18");
        assert_eq!(local.hour(), 21);
    }

    #[test]
    fn short_closed_shift_is_flagged_with_its_hours() {
        let mut rec = record("Jane Doe", "jane@acme.test");
        rec.punch_out = rec.punch_in.map(|t| t + chrono::Duration::hours(9));
        rec.total_hours = Some(8.75);

        let flagged = flag_incomplete(&[rec]);
        assert_eq!(
            flagged,
            vec![IncompleteShift {
                name: "Jane Doe".to_string(),
                email: "jane@acme.test".to_string(),
                hours: 8.75,
            }]
        );
    }

    #[test]
    fn open_shift_is_flagged_with_zero_hours() {
        let rec = record("Ravi Kumar", "ravi@acme.test");
        let flagged = flag_incomplete(&[rec]);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].hours, 0.0);
    }

    #[test]
    fn full_closed_shift_is_not_flagged() {
        let mut rec = record("Jane Doe", "jane@acme.test");
        rec.punch_out = rec.punch_in.map(|t| t + chrono::Duration::hours(10));
        rec.total_hours = Some(9.5);

        assert!(flag_incomplete(&[rec]).is_empty());
    }

    #[test]
    fn exactly_nine_hours_is_not_flagged() {
        let mut rec = record("Jane Doe", "jane@acme.test");
        rec.punch_out = rec.punch_in.map(|t| t + chrono::Duration::hours(9));
        rec.total_hours = Some(9.0);

        assert!(flag_incomplete(&[rec]).is_empty());
    }

    #[test]
    fn closed_shift_without_recorded_hours_counts_as_zero() {
        let mut rec = record("Jane Doe", "jane@acme.test");
        rec.punch_out = rec.punch_in.map(|t| t + chrono::Duration::hours(9));
        rec.total_hours = None;

        let flagged = flag_incomplete(&[rec]);
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0].hours, 0.0);
    }

    #[tokio::test]
    async fn notifier_stops_on_cancellation() {
        let pool = MySqlPool::connect_lazy("mysql://invalid:3306/db").unwrap();
        let mailer = Mailer::new("", "onboarding@resend.dev");
        let cancel = CancellationToken::new();
        let cancel_clone = cancel.clone();

        let handle = start(pool, mailer, cancel.clone());

        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            cancel_clone.cancel();
        });

        let result = tokio::time::timeout(std::time::Duration::from_secs(5), handle).await;
        assert!(result.is_ok(), "Notifier should have stopped after cancellation");
    }
}
