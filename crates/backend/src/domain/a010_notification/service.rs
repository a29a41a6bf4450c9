use super::repository;
use crate::shared::config;
use contracts::domain::a010_notification::aggregate::{
    Notification, NotificationLevel, NotificationTopic,
};
use serde_json::json;
use uuid::Uuid;

pub async fn list_recent(limit: u64) -> anyhow::Result<Vec<Notification>> {
    repository::list_recent(limit).await
}

/// Persist a notification and push it to the configured webhook.
/// Webhook delivery is best effort; a failed push never fails the caller.
pub async fn notify(
    level: NotificationLevel,
    topic: NotificationTopic,
    message: String,
    subject_ref: Option<String>,
) -> anyhow::Result<Uuid> {
    let mut notification = Notification::new_for_insert(
        format!("NTF-{}", topic.as_str().to_uppercase()),
        level,
        topic,
        message.clone(),
        subject_ref,
    );
    notification.before_write();
    let id = repository::insert(&notification).await?;

    if let Some(webhook_url) = config::get().notify.webhook_url.clone() {
        let delivered = push_webhook(&webhook_url, &notification).await;
        if let Err(e) = &delivered {
            tracing::warn!("Webhook delivery failed: {}", e);
        }
        let _ = repository::set_webhook_delivered(id, delivered.is_ok()).await;
    }

    Ok(id)
}

async fn push_webhook(url: &str, notification: &Notification) -> anyhow::Result<()> {
    let payload = json!({
        "level": notification.level.as_str(),
        "topic": notification.topic.as_str(),
        "message": notification.message,
        "subjectRef": notification.subject_ref,
    });
    let response = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()?
        .post(url)
        .json(&payload)
        .send()
        .await?;
    if !response.status().is_success() {
        anyhow::bail!("webhook returned status {}", response.status());
    }
    Ok(())
}
