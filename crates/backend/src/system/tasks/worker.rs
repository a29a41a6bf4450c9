use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use contracts::domain::common::AggregateId;
use contracts::system::tasks::progress::TaskStatus;
use cron::Schedule;
use std::str::FromStr;
use std::sync::Arc;
use tokio::time::{self, MissedTickBehavior};
use tracing::{error, info, warn};
use uuid::Uuid;

use super::{logger::TaskLogger, registry::TaskManagerRegistry, service};

/// Fallback cadence for tasks without a parsable cron expression
const DEFAULT_RERUN_HOURS: i64 = 1;

/// Background worker driving the scheduled tasks
pub struct ScheduledTaskWorker {
    registry: Arc<TaskManagerRegistry>,
    logger: Arc<TaskLogger>,
    interval_seconds: u64,
}

/// Next fire time after `now` for the task's cron expression.
/// Unparsable or missing expressions fall back to a fixed cadence.
pub fn next_run_after(cron_expr: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(expr) = cron_expr {
        // The cron crate wants the seconds field; prepend it for the
        // common five-field form
        let candidates = [expr.to_string(), format!("0 {}", expr)];
        for candidate in &candidates {
            if let Ok(schedule) = Schedule::from_str(candidate) {
                if let Some(next) = schedule.after(&now).next() {
                    return next;
                }
            }
        }
        warn!("Unparsable cron expression '{}', using fallback cadence", expr);
    }
    now + Duration::hours(DEFAULT_RERUN_HOURS)
}

impl ScheduledTaskWorker {
    pub fn new(
        registry: Arc<TaskManagerRegistry>,
        logger: Arc<TaskLogger>,
        interval_seconds: u64,
    ) -> Self {
        Self {
            registry,
            logger,
            interval_seconds,
        }
    }

    /// Tick forever, firing due tasks
    pub async fn run_loop(&self) {
        info!(
            "Scheduled task worker started with interval {} seconds",
            self.interval_seconds
        );
        let mut interval = time::interval(time::Duration::from_secs(self.interval_seconds));
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Err(e) = self.process_due_tasks().await {
                error!("Error processing scheduled tasks: {:?}", e);
            }
        }
    }

    async fn process_due_tasks(&self) -> Result<()> {
        let now = Utc::now();
        let tasks = service::list_enabled_tasks().await?;

        for task in tasks {
            let should_run = match task.next_run_at {
                Some(next_run_at) => next_run_at <= now,
                // Never ran: fire once now, the run computes the next slot
                None => true,
            };
            if !should_run {
                continue;
            }

            info!(
                "Task '{}' ({}) is due. Running...",
                task.base.description,
                task.base.id.as_string()
            );

            let session_id = Uuid::new_v4().to_string();
            let task_id = task.base.id;
            let task_type = task.task_type.clone();
            let task_description = task.base.description.clone();
            let task_logger = Arc::clone(&self.logger);
            let registry = Arc::clone(&self.registry);

            let next_run = next_run_after(task.schedule_cron.as_deref(), now);

            service::update_run_status(
                &task_id,
                Some(now),
                Some(next_run),
                Some(task_logger.get_log_file_path(&session_id)),
                Some(TaskStatus::Running.to_string()),
            )
            .await?;

            let task_clone = task.clone();
            tokio::spawn(async move {
                let manager = registry.get(&task_type);
                match manager {
                    Some(mgr) => {
                        if let Err(e) = mgr.run(&task_clone, &session_id, task_logger).await {
                            error!(
                                "Task '{}' session {} failed: {:?}",
                                task_description, session_id, e
                            );
                            let _ = service::update_run_status(
                                &task_id,
                                Some(now),
                                Some(next_run),
                                None,
                                Some(TaskStatus::Failed.to_string()),
                            )
                            .await;
                        } else {
                            info!(
                                "Task '{}' session {} completed successfully",
                                task_description, session_id
                            );
                            let _ = service::update_run_status(
                                &task_id,
                                Some(now),
                                Some(next_run),
                                None,
                                Some(TaskStatus::Completed.to_string()),
                            )
                            .await;
                        }
                    }
                    None => {
                        warn!(
                            "No manager found for task type '{}' of task '{}'",
                            task_type, task_description
                        );
                        let _ = service::update_run_status(
                            &task_id,
                            Some(now),
                            Some(next_run),
                            None,
                            Some(TaskStatus::Failed.to_string()),
                        )
                        .await;
                    }
                }
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn five_field_cron_gets_next_slot() {
        // Every day at 03:00 UTC
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 12, 0, 0).unwrap();
        let next = next_run_after(Some("0 3 * * *"), now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 8, 2, 3, 0, 0).unwrap());
    }

    #[test]
    fn six_field_cron_is_accepted_as_is() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let next = next_run_after(Some("0 30 * * * *"), now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 8, 1, 0, 30, 0).unwrap());
    }

    #[test]
    fn garbage_cron_falls_back() {
        let now = Utc.with_ymd_and_hms(2025, 8, 1, 0, 0, 0).unwrap();
        let next = next_run_after(Some("not a cron"), now);
        assert_eq!(next, now + Duration::hours(DEFAULT_RERUN_HOURS));
    }

    #[test]
    fn missing_cron_falls_back() {
        let now = Utc::now();
        let next = next_run_after(None, now);
        assert_eq!(next, now + Duration::hours(DEFAULT_RERUN_HOURS));
    }
}
