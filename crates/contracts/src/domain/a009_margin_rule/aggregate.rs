use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique margin rule identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarginRuleId(pub Uuid);

impl MarginRuleId {
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

impl AggregateId for MarginRuleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MarginRuleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Violation action
// ============================================================================

/// What the pipeline does with an order that violates the rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarginAction {
    /// Park the order in MarginHold for an operator decision
    Hold,
    /// Cancel the order outright
    Reject,
    /// Let it through, log and notify only
    WarnOnly,
}

impl MarginAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarginAction::Hold => "hold",
            MarginAction::Reject => "reject",
            MarginAction::WarnOnly => "warn_only",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "hold" => Some(MarginAction::Hold),
            "reject" => Some(MarginAction::Reject),
            "warn_only" => Some(MarginAction::WarnOnly),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Margin-protection rule. A marketplace-scoped rule beats the global one;
/// among rules with the same scope the highest priority wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginRule {
    #[serde(flatten)]
    pub base: BaseAggregate<MarginRuleId>,

    /// Reference to a003_marketplace; None = applies to every marketplace
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: Option<String>,

    /// Minimum acceptable margin rate, e.g. 0.1
    #[serde(rename = "minMarginRate")]
    pub min_margin_rate: f64,

    /// Minimum acceptable absolute profit in KRW
    #[serde(rename = "minProfitAmount")]
    pub min_profit_amount: f64,

    pub action: MarginAction,

    pub priority: i32,

    #[serde(rename = "isEnabled")]
    pub is_enabled: bool,
}

impl MarginRule {
    pub fn new_for_insert(
        code: String,
        description: String,
        marketplace_ref: Option<String>,
        min_margin_rate: f64,
        min_profit_amount: f64,
        action: MarginAction,
        priority: i32,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(MarginRuleId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            marketplace_ref,
            min_margin_rate,
            min_profit_amount,
            action,
            priority,
            is_enabled: true,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &MarginRuleDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.marketplace_ref = dto.marketplace_ref.clone();
        self.min_margin_rate = dto.min_margin_rate;
        self.min_profit_amount = dto.min_profit_amount;
        self.action = dto.action;
        self.priority = dto.priority;
        self.is_enabled = dto.is_enabled;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if !(0.0..1.0).contains(&self.min_margin_rate) {
            return Err("Minimum margin rate must be in [0, 1)".into());
        }
        if self.min_profit_amount < 0.0 {
            return Err("Minimum profit amount must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for margin rule create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarginRuleDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: Option<String>,
    #[serde(rename = "minMarginRate")]
    pub min_margin_rate: f64,
    #[serde(rename = "minProfitAmount", default)]
    pub min_profit_amount: f64,
    pub action: MarginAction,
    #[serde(default)]
    pub priority: i32,
    #[serde(rename = "isEnabled", default = "default_true")]
    pub is_enabled: bool,
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}
