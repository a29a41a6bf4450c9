use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for NotificationId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(NotificationId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Level / topic
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "info" => Some(NotificationLevel::Info),
            "warning" => Some(NotificationLevel::Warning),
            "error" => Some(NotificationLevel::Error),
            _ => None,
        }
    }
}

/// What the notification is about; drives routing and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTopic {
    MarginViolation,
    OrderFailed,
    Stockout,
    RegistrationFailed,
    SettlementReady,
}

impl NotificationTopic {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationTopic::MarginViolation => "margin_violation",
            NotificationTopic::OrderFailed => "order_failed",
            NotificationTopic::Stockout => "stockout",
            NotificationTopic::RegistrationFailed => "registration_failed",
            NotificationTopic::SettlementReady => "settlement_ready",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "margin_violation" => Some(NotificationTopic::MarginViolation),
            "order_failed" => Some(NotificationTopic::OrderFailed),
            "stockout" => Some(NotificationTopic::Stockout),
            "registration_failed" => Some(NotificationTopic::RegistrationFailed),
            "settlement_ready" => Some(NotificationTopic::SettlementReady),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// One operator notification, persisted and (best effort) pushed to the
/// configured webhook
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(flatten)]
    pub base: BaseAggregate<NotificationId>,

    pub level: NotificationLevel,

    pub topic: NotificationTopic,

    pub message: String,

    /// Id of the entity the notification is about, when there is one
    #[serde(rename = "subjectRef")]
    pub subject_ref: Option<String>,

    /// Whether the webhook push succeeded; None = not attempted
    #[serde(rename = "webhookDelivered")]
    pub webhook_delivered: Option<bool>,
}

impl Notification {
    pub fn new_for_insert(
        code: String,
        level: NotificationLevel,
        topic: NotificationTopic,
        message: String,
        subject_ref: Option<String>,
    ) -> Self {
        let base = BaseAggregate::new(NotificationId::new_v4(), code, message.clone());

        Self {
            base,
            level,
            topic,
            message,
            subject_ref,
            webhook_delivered: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}
