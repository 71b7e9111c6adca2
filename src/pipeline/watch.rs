// src/pipeline/watch.rs

//! Long-running watch mode.
//!
//! Two independent loops share one runtime: the daily report and the
//! hourly probe. Each tick is a single unit of work; the loops never
//! wait on each other, and the only shared mutable state is the history
//! inside the tracker. Deadlines are computed against the local clock;
//! the deployment is expected to set `TZ=Europe/Paris`.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, Timelike};

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::probe::run_probe;
use crate::pipeline::report::run_report;
use crate::services::{Notifier, TimelineFetcher, VersionTracker};

/// Next daily deadline strictly after `after`.
///
/// Times skipped by a daylight-saving jump roll to the next day; the
/// fallback of a flat day never triggers on real calendars.
pub fn next_daily(after: DateTime<Local>, hour: u32, minute: u32) -> DateTime<Local> {
    let mut date = after.date_naive();
    for _ in 0..3 {
        if let Some(naive) = date.and_hms_opt(hour, minute, 0) {
            if let Some(candidate) = naive.and_local_timezone(Local).earliest() {
                if candidate > after {
                    return candidate;
                }
            }
        }
        date = match date.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }
    after + chrono::Duration::hours(24)
}

/// Next hourly deadline strictly after `after`, at the given minute.
pub fn next_hourly(after: DateTime<Local>, minute: u32) -> DateTime<Local> {
    for offset in 0..=25 {
        let base = after + chrono::Duration::hours(offset);
        if let Some(naive) = base.date_naive().and_hms_opt(base.hour(), minute, 0) {
            if let Some(candidate) = naive.and_local_timezone(Local).earliest() {
                if candidate > after {
                    return candidate;
                }
            }
        }
    }
    after + chrono::Duration::hours(1)
}

/// Sleep until a local deadline. Past deadlines return immediately.
async fn wait_until(deadline: DateTime<Local>) {
    let wait = (deadline - Local::now()).to_std().unwrap_or(Duration::ZERO);
    tokio::time::sleep(wait).await;
}

/// Run both schedules until ctrl-c.
///
/// Tick failures are logged and swallowed: a failed tick is simply
/// absent from the history and the next schedule retries naturally.
pub async fn run_watch(
    config: Config,
    fetcher: TimelineFetcher,
    tracker: VersionTracker,
    notifier: Notifier,
) -> Result<()> {
    let config = Arc::new(config);
    let fetcher = Arc::new(fetcher);
    let tracker = Arc::new(tracker);
    let notifier = Arc::new(notifier);

    log::info!(
        "Watching {} (daily report {:02}:{:02}, probe at :{:02})",
        config.watcher.code_name,
        config.schedule.daily_hour,
        config.schedule.daily_minute,
        config.schedule.hourly_minute
    );

    let daily = {
        let config = Arc::clone(&config);
        let fetcher = Arc::clone(&fetcher);
        let notifier = Arc::clone(&notifier);
        tokio::spawn(async move {
            loop {
                let deadline = next_daily(
                    Local::now(),
                    config.schedule.daily_hour,
                    config.schedule.daily_minute,
                );
                log::info!("Next daily report at {}", deadline.format("%Y-%m-%d %H:%M:%S"));
                wait_until(deadline).await;

                let today = Local::now().date_naive();
                if let Err(e) = run_report(&config, &fetcher, &notifier, today).await {
                    log::error!("Daily report failed: {}", e);
                }
            }
        })
    };

    let hourly = {
        let config = Arc::clone(&config);
        let fetcher = Arc::clone(&fetcher);
        let tracker = Arc::clone(&tracker);
        let notifier = Arc::clone(&notifier);
        tokio::spawn(async move {
            loop {
                let deadline = next_hourly(Local::now(), config.schedule.hourly_minute);
                wait_until(deadline).await;

                if let Err(e) = run_probe(&config, &fetcher, &tracker, &notifier).await {
                    log::error!("Hourly probe failed: {}", e);
                }
            }
        })
    };

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    daily.abort();
    hourly.abort();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn local(hour: u32, minute: u32, second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 1, 7, hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_next_daily_later_same_day() {
        let next = next_daily(local(9, 30, 0), 22, 0);
        assert_eq!(next, local(22, 0, 0));
    }

    #[test]
    fn test_next_daily_rolls_to_tomorrow() {
        let after = local(22, 30, 0);
        let next = next_daily(after, 22, 0);
        assert_eq!(next.date_naive(), after.date_naive().succ_opt().unwrap());
        assert_eq!(next.hour(), 22);
        assert_eq!(next.minute(), 0);
    }

    #[test]
    fn test_next_daily_is_strictly_future() {
        let at_deadline = local(22, 0, 0);
        let next = next_daily(at_deadline, 22, 0);
        assert!(next > at_deadline);
        assert_eq!(next.date_naive(), at_deadline.date_naive().succ_opt().unwrap());
    }

    #[test]
    fn test_next_hourly_later_same_hour() {
        let next = next_hourly(local(9, 30, 0), 45);
        assert_eq!(next, local(9, 45, 0));
    }

    #[test]
    fn test_next_hourly_rolls_to_next_hour() {
        let next = next_hourly(local(9, 30, 0), 0);
        assert_eq!(next, local(10, 0, 0));
    }

    #[test]
    fn test_next_hourly_is_strictly_future() {
        let on_the_hour = local(9, 0, 0);
        let next = next_hourly(on_the_hour, 0);
        assert_eq!(next, local(10, 0, 0));

        for minute in [0, 15, 59] {
            let after = local(14, 15, 0);
            let next = next_hourly(after, minute);
            assert!(next > after);
            assert_eq!(next.minute(), minute);
        }
    }
}
