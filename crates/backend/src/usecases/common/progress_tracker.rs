use contracts::usecases::common::progress::{
    SessionProgress, SessionStatus, StageProgress, StageStatus,
};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory progress tracker shared by every background use-case session.
/// Clients poll the progress endpoint; nothing here touches the database.
#[derive(Clone)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, SessionProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn create_session(&self, session_id: String) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), SessionProgress::new(session_id));
    }

    pub fn get_progress(&self, session_id: &str) -> Option<SessionProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }

    pub fn add_stage(&self, session_id: &str, stage_key: String, stage_name: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.stages.push(StageProgress {
                stage_key,
                stage_name,
                status: StageStatus::Pending,
                processed: 0,
                total: None,
                inserted: 0,
                updated: 0,
                errors: 0,
                current_item: None,
            });
            progress.updated_at = chrono::Utc::now();
        }
    }

    pub fn update_stage(
        &self,
        session_id: &str,
        stage_key: &str,
        processed: i32,
        total: Option<i32>,
        inserted: i32,
        updated: i32,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(stage) = progress.stages.iter_mut().find(|s| s.stage_key == stage_key) {
                stage.status = StageStatus::Running;
                stage.processed = processed;
                stage.total = total;
                stage.inserted = inserted;
                stage.updated = updated;

                progress.total_processed = progress.stages.iter().map(|s| s.processed).sum();
                progress.total_inserted = progress.stages.iter().map(|s| s.inserted).sum();
                progress.total_updated = progress.stages.iter().map(|s| s.updated).sum();
                progress.updated_at = chrono::Utc::now();
            }
        }
    }

    pub fn set_current_item(&self, session_id: &str, stage_key: &str, label: Option<String>) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(stage) = progress.stages.iter_mut().find(|s| s.stage_key == stage_key) {
                stage.current_item = label;
                progress.updated_at = chrono::Utc::now();
            }
        }
    }

    pub fn complete_stage(&self, session_id: &str, stage_key: &str) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(stage) = progress.stages.iter_mut().find(|s| s.stage_key == stage_key) {
                stage.status = StageStatus::Completed;
                stage.current_item = None;
                progress.updated_at = chrono::Utc::now();
            }
        }
    }

    pub fn fail_stage(&self, session_id: &str, stage_key: &str, error: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            if let Some(stage) = progress.stages.iter_mut().find(|s| s.stage_key == stage_key) {
                stage.status = StageStatus::Failed;
                stage.errors += 1;
            }
            progress.add_error(Some(stage_key.to_string()), error, None);
            progress.updated_at = chrono::Utc::now();
        }
    }

    pub fn add_error(
        &self,
        session_id: &str,
        stage_key: Option<String>,
        message: String,
        details: Option<String>,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.add_error(stage_key, message, details);
            progress.updated_at = chrono::Utc::now();
        }
    }

    pub fn complete_session(&self, session_id: &str, status: SessionStatus) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = status;
            progress.completed_at = Some(chrono::Utc::now());
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Drop completed sessions older than max_age_hours
    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.sessions.write().unwrap();
        let now = chrono::Utc::now();
        sessions.retain(|_, progress| {
            if let Some(completed_at) = progress.completed_at {
                (now - completed_at).num_hours() < max_age_hours
            } else {
                true
            }
        });
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}
