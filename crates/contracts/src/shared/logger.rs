use serde::{Deserialize, Serialize};

/// One row of the persisted operation log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Option<i64>,
    pub level: String,
    pub source: String,
    pub message: String,
    pub details: Option<String>,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogEntry {
    pub level: String,
    pub source: String,
    pub message: String,
    pub details: Option<String>,
}
