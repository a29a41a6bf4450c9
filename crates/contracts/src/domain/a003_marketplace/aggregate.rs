use crate::domain::common::{AggregateId, BaseAggregate};
use crate::enums::marketplace_type::MarketplaceType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique marketplace identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarketplaceId(pub Uuid);

impl MarketplaceId {
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

impl AggregateId for MarketplaceId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(MarketplaceId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Downstream sales channel products are registered on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marketplace {
    #[serde(flatten)]
    pub base: BaseAggregate<MarketplaceId>,

    pub url: String,

    #[serde(rename = "marketplaceType")]
    pub marketplace_type: MarketplaceType,

    /// Sales commission rate the platform charges, e.g. 0.108
    #[serde(rename = "feeRate")]
    pub fee_rate: f64,
}

impl Marketplace {
    pub fn new_for_insert(
        code: String,
        description: String,
        url: String,
        marketplace_type: MarketplaceType,
        fee_rate: f64,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(MarketplaceId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            url,
            marketplace_type,
            fee_rate,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &MarketplaceDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.url = dto.url.clone();
        self.marketplace_type = dto.marketplace_type;
        self.fee_rate = dto.fee_rate;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code must not be empty".into());
        }
        if self.url.trim().is_empty() {
            return Err("URL must not be empty".into());
        }
        if !self.url.starts_with("http://") && !self.url.starts_with("https://") {
            return Err("URL must start with http:// or https://".into());
        }
        if !(0.0..1.0).contains(&self.fee_rate) {
            return Err("Fee rate must be in [0, 1)".into());
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

/// DTO for marketplace create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketplaceDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub url: String,
    #[serde(rename = "marketplaceType")]
    pub marketplace_type: MarketplaceType,
    #[serde(rename = "feeRate")]
    pub fee_rate: f64,
    pub comment: Option<String>,
}
