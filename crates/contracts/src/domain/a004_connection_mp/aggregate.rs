use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique marketplace connection identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectionMPId(pub Uuid);

impl ConnectionMPId {
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

impl AggregateId for ConnectionMPId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ConnectionMPId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Seller account on one marketplace.
///
/// Credential fields are marketplace-specific: Coupang needs vendor id plus
/// an HMAC access/secret key pair, Naver a client id/secret for OAuth,
/// 11st a single API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionMP {
    #[serde(flatten)]
    pub base: BaseAggregate<ConnectionMPId>,

    /// Reference to a003_marketplace
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: String,

    /// Coupang vendor id (e.g. "A00012345")
    #[serde(rename = "vendorId")]
    pub vendor_id: Option<String>,

    #[serde(rename = "accessKey")]
    pub access_key: Option<String>,

    #[serde(rename = "secretKey")]
    pub secret_key: Option<String>,

    #[serde(rename = "clientId")]
    pub client_id: Option<String>,

    #[serde(rename = "clientSecret")]
    pub client_secret: Option<String>,

    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,

    /// Commission override for this account; falls back to the marketplace rate
    #[serde(rename = "feeRateOverride")]
    pub fee_rate_override: Option<f64>,

    #[serde(rename = "isUsed")]
    pub is_used: bool,

    #[serde(rename = "testMode")]
    pub test_mode: bool,
}

impl ConnectionMP {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        marketplace_ref: String,
        vendor_id: Option<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        api_key: Option<String>,
        fee_rate_override: Option<f64>,
        test_mode: bool,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ConnectionMPId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            marketplace_ref,
            vendor_id,
            access_key,
            secret_key,
            client_id,
            client_secret,
            api_key,
            fee_rate_override,
            is_used: true,
            test_mode,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &ConnectionMPDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.marketplace_ref = dto.marketplace_ref.clone();
        self.vendor_id = dto.vendor_id.clone();
        self.access_key = dto.access_key.clone();
        self.secret_key = dto.secret_key.clone();
        self.client_id = dto.client_id.clone();
        self.client_secret = dto.client_secret.clone();
        self.api_key = dto.api_key.clone();
        self.fee_rate_override = dto.fee_rate_override;
        self.is_used = dto.is_used;
        self.test_mode = dto.test_mode;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if self.marketplace_ref.trim().is_empty() {
            return Err("Marketplace reference must not be empty".into());
        }
        if let Some(rate) = self.fee_rate_override {
            if !(0.0..1.0).contains(&rate) {
                return Err("Fee rate override must be in [0, 1)".into());
            }
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

/// DTO for marketplace connection create/update and connection tests
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConnectionMPDto {
    pub id: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "marketplaceRef", default)]
    pub marketplace_ref: String,
    #[serde(rename = "vendorId")]
    pub vendor_id: Option<String>,
    #[serde(rename = "accessKey")]
    pub access_key: Option<String>,
    #[serde(rename = "secretKey")]
    pub secret_key: Option<String>,
    #[serde(rename = "clientId")]
    pub client_id: Option<String>,
    #[serde(rename = "clientSecret")]
    pub client_secret: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "feeRateOverride")]
    pub fee_rate_override: Option<f64>,
    #[serde(rename = "isUsed", default)]
    pub is_used: bool,
    #[serde(rename = "testMode", default)]
    pub test_mode: bool,
    pub comment: Option<String>,
}
