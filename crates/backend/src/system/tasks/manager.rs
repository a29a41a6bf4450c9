use anyhow::Result;
use async_trait::async_trait;
use contracts::system::tasks::aggregate::ScheduledTask;
use std::sync::Arc;

/// Interface every scheduled-task type implements.
/// `config_json` on the task row carries manager-specific parameters.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// Task type handled by this manager
    fn task_type(&self) -> &'static str;

    /// Execute one run of the task
    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<super::logger::TaskLogger>,
    ) -> Result<()>;
}
