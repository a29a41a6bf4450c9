use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Live progress of one background use-case session, polled by clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionProgress {
    pub session_id: String,
    pub status: SessionStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Last time anything below changed
    pub updated_at: DateTime<Utc>,

    /// Per-stage progress (one stage per aggregate, supplier, connection...)
    pub stages: Vec<StageProgress>,

    pub total_processed: i32,
    pub total_inserted: i32,
    pub total_updated: i32,
    pub total_errors: i32,

    pub errors: Vec<SessionError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
    CompletedWithErrors,
    Failed,
    Cancelled,
}

/// Progress of one stage within a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageProgress {
    /// Stable key, e.g. "a002_supplier_product" or a connection id
    pub stage_key: String,
    /// Human-readable label
    pub stage_name: String,
    pub status: StageStatus,
    pub processed: i32,
    pub total: Option<i32>,
    pub inserted: i32,
    pub updated: i32,
    pub errors: i32,
    /// What the stage is working on right now
    pub current_item: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionError {
    pub stage_key: Option<String>,
    pub message: String,
    pub details: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl SessionProgress {
    pub fn new(session_id: String) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            status: SessionStatus::Running,
            started_at: now,
            completed_at: None,
            updated_at: now,
            stages: Vec::new(),
            total_processed: 0,
            total_inserted: 0,
            total_updated: 0,
            total_errors: 0,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, stage_key: Option<String>, message: String, details: Option<String>) {
        self.total_errors += 1;
        self.errors.push(SessionError {
            stage_key,
            message,
            details,
            occurred_at: Utc::now(),
        });
    }
}
