use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique scheduled task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledTaskId(pub Uuid);

impl ScheduledTaskId {
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for ScheduledTaskId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ScheduledTaskId)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Background task driven by the scheduler worker.
/// `task_type` selects a TaskManager, `config_json` is manager-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledTask {
    #[serde(flatten)]
    pub base: BaseAggregate<ScheduledTaskId>,

    #[serde(rename = "taskType")]
    pub task_type: String,

    /// Standard five-field cron expression, UTC
    #[serde(rename = "scheduleCron")]
    pub schedule_cron: Option<String>,

    #[serde(rename = "configJson")]
    pub config_json: String,

    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,

    #[serde(rename = "lastRunAt")]
    pub last_run_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(rename = "nextRunAt")]
    pub next_run_at: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(rename = "lastRunStatus")]
    pub last_run_status: Option<String>,

    #[serde(rename = "lastRunLogFile")]
    pub last_run_log_file: Option<String>,
}

impl ScheduledTask {
    pub fn new_for_insert(
        code: String,
        description: String,
        task_type: String,
        schedule_cron: Option<String>,
        is_enabled: bool,
        config_json: String,
    ) -> Self {
        let base = BaseAggregate::new(ScheduledTaskId::new_v4(), code, description);

        Self {
            base,
            task_type,
            schedule_cron,
            config_json,
            is_enabled,
            last_run_at: None,
            next_run_at: None,
            last_run_status: None,
            last_run_log_file: None,
        }
    }
}
