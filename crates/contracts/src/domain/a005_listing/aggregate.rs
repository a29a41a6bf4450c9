use crate::domain::common::{AggregateId, BaseAggregate};
use crate::domain::a006_sales_order::aggregate::MarginSnapshot;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique listing identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub Uuid);

impl ListingId {
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

impl AggregateId for ListingId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(ListingId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Registration state of a listing on its marketplace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    /// Created locally, not yet queued
    Draft,
    /// Queued for the next registration batch
    Pending,
    /// Live on the marketplace
    Registered,
    /// Registration attempts exhausted
    Failed,
    /// Taken down (soldout or manual)
    Suspended,
}

impl ListingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Draft => "draft",
            ListingStatus::Pending => "pending",
            ListingStatus::Registered => "registered",
            ListingStatus::Failed => "failed",
            ListingStatus::Suspended => "suspended",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(ListingStatus::Draft),
            "pending" => Some(ListingStatus::Pending),
            "registered" => Some(ListingStatus::Registered),
            "failed" => Some(ListingStatus::Failed),
            "suspended" => Some(ListingStatus::Suspended),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A supplier product registered (or queued for registration) on one
/// marketplace connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    #[serde(flatten)]
    pub base: BaseAggregate<ListingId>,

    /// Reference to a002_supplier_product
    #[serde(rename = "supplierProductRef")]
    pub supplier_product_ref: String,

    /// Reference to a003_marketplace
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: String,

    /// Reference to a004_connection_mp
    #[serde(rename = "connectionMpRef")]
    pub connection_mp_ref: String,

    /// Product id assigned by the marketplace once registered
    #[serde(rename = "marketplaceProductId")]
    pub marketplace_product_id: Option<String>,

    /// Title used on the marketplace (possibly LLM-generated)
    #[serde(rename = "saleTitle")]
    pub sale_title: Option<String>,

    #[serde(rename = "salePrice")]
    pub sale_price: f64,

    /// Margin breakdown computed when the listing was priced
    #[serde(rename = "marginSnapshot")]
    pub margin_snapshot: Option<MarginSnapshot>,

    pub status: ListingStatus,

    #[serde(rename = "failureReason")]
    pub failure_reason: Option<String>,

    #[serde(rename = "retryCount")]
    pub retry_count: i32,

    #[serde(rename = "registeredAt")]
    pub registered_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Listing {
    pub fn new_for_insert(
        code: String,
        description: String,
        supplier_product_ref: String,
        marketplace_ref: String,
        connection_mp_ref: String,
        sale_price: f64,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(ListingId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            supplier_product_ref,
            marketplace_ref,
            connection_mp_ref,
            marketplace_product_id: None,
            sale_title: None,
            sale_price,
            margin_snapshot: None,
            status: ListingStatus::Draft,
            failure_reason: None,
            retry_count: 0,
            registered_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn mark_registered(&mut self, marketplace_product_id: String) {
        self.marketplace_product_id = Some(marketplace_product_id);
        self.status = ListingStatus::Registered;
        self.failure_reason = None;
        self.registered_at = Some(chrono::Utc::now());
    }

    pub fn mark_failed(&mut self, reason: String) {
        self.status = ListingStatus::Failed;
        self.failure_reason = Some(reason);
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if self.supplier_product_ref.trim().is_empty() {
            return Err("Supplier product reference must not be empty".into());
        }
        if self.connection_mp_ref.trim().is_empty() {
            return Err("Connection reference must not be empty".into());
        }
        if self.sale_price < 0.0 {
            return Err("Sale price must not be negative".into());
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

/// DTO for listing create/update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    #[serde(rename = "supplierProductRef")]
    pub supplier_product_ref: String,
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: String,
    #[serde(rename = "connectionMpRef")]
    pub connection_mp_ref: String,
    #[serde(rename = "salePrice", default)]
    pub sale_price: f64,
    pub status: Option<ListingStatus>,
    pub comment: Option<String>,
}
