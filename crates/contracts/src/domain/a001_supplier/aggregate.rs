use crate::domain::common::{AggregateId, BaseAggregate};
use crate::enums::supplier_type::SupplierType;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique supplier identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierId(pub Uuid);

impl SupplierId {
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

impl AggregateId for SupplierId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SupplierId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Upstream wholesaler the catalog is collected from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(flatten)]
    pub base: BaseAggregate<SupplierId>,

    #[serde(rename = "supplierType")]
    pub supplier_type: SupplierType,

    /// API base URL; empty means the client default
    #[serde(rename = "apiUrl")]
    pub api_url: String,

    /// Account for JWT-authenticated suppliers (OwnerClan)
    pub username: Option<String>,
    pub password: Option<String>,

    /// Key for key-authenticated suppliers (Zentrade, Domeggook)
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,

    /// Shipping fee applied when an item does not carry its own
    #[serde(rename = "defaultShippingFee")]
    pub default_shipping_fee: f64,

    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl Supplier {
    pub fn new_for_insert(
        code: String,
        description: String,
        supplier_type: SupplierType,
        api_url: String,
        username: Option<String>,
        password: Option<String>,
        api_key: Option<String>,
        default_shipping_fee: f64,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(SupplierId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            supplier_type,
            api_url,
            username,
            password,
            api_key,
            default_shipping_fee,
            is_active: true,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &SupplierDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.supplier_type = dto.supplier_type;
        self.api_url = dto.api_url.clone();
        self.username = dto.username.clone();
        self.password = dto.password.clone();
        self.api_key = dto.api_key.clone();
        self.default_shipping_fee = dto.default_shipping_fee;
        self.is_active = dto.is_active;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code must not be empty".into());
        }
        match self.supplier_type {
            SupplierType::OwnerClan => {
                if self.username.as_deref().unwrap_or("").trim().is_empty() {
                    return Err("OwnerClan supplier requires a username".into());
                }
            }
            SupplierType::Zentrade | SupplierType::Domeggook => {
                if self.api_key.as_deref().unwrap_or("").trim().is_empty() {
                    return Err("Supplier requires an API key".into());
                }
            }
        }
        if self.default_shipping_fee < 0.0 {
            return Err("Default shipping fee must not be negative".into());
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

/// DTO for supplier create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "supplierType")]
    pub supplier_type: SupplierType,
    #[serde(rename = "apiUrl", default)]
    pub api_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    #[serde(rename = "apiKey")]
    pub api_key: Option<String>,
    #[serde(rename = "defaultShippingFee", default)]
    pub default_shipping_fee: f64,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
    pub comment: Option<String>,
}

fn default_true() -> bool {
    true
}
