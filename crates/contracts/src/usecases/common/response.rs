use serde::{Deserialize, Serialize};

/// Returned when a background use-case session has been started
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStartResponse {
    pub session_id: String,
    pub status: SessionStartStatus,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStartStatus {
    Started,
    Rejected,
}
