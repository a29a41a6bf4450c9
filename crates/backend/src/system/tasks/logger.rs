use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Per-session file logger for scheduled-task runs.
/// One log file per session under target/logs/tasks.
pub struct TaskLogger {
    log_dir: PathBuf,
}

impl TaskLogger {
    pub fn new() -> Self {
        let log_dir = std::path::Path::new("target").join("logs").join("tasks");
        let _ = std::fs::create_dir_all(&log_dir);
        Self { log_dir }
    }

    pub fn get_log_file_path(&self, session_id: &str) -> String {
        self.log_dir
            .join(format!("{}.log", session_id))
            .to_string_lossy()
            .to_string()
    }

    pub fn log(&self, session_id: &str, message: &str) {
        let path = self.get_log_file_path(session_id);
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
            let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
            let _ = writeln!(file, "[{}] {}", timestamp, message);
        }
        tracing::info!(session_id = session_id, "{}", message);
    }
}

impl Default for TaskLogger {
    fn default() -> Self {
        Self::new()
    }
}
