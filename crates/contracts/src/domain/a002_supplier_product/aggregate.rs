use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a collected wholesale item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SupplierProductId(pub Uuid);

impl SupplierProductId {
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

impl AggregateId for SupplierProductId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SupplierProductId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Availability of a wholesale item as last seen upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierProductStatus {
    Active,
    Soldout,
    Discontinued,
}

impl SupplierProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SupplierProductStatus::Active => "active",
            SupplierProductStatus::Soldout => "soldout",
            SupplierProductStatus::Discontinued => "discontinued",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SupplierProductStatus::Active),
            "soldout" => Some(SupplierProductStatus::Soldout),
            "discontinued" => Some(SupplierProductStatus::Discontinued),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Wholesale item collected from a supplier catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierProduct {
    #[serde(flatten)]
    pub base: BaseAggregate<SupplierProductId>,

    /// Reference to a001_supplier
    #[serde(rename = "supplierRef")]
    pub supplier_ref: String,

    /// Item key in the supplier's own catalog
    #[serde(rename = "supplierSku")]
    pub supplier_sku: String,

    /// Wholesale (purchase) price
    #[serde(rename = "costPrice")]
    pub cost_price: f64,

    /// Supplier's suggested retail price, when published
    #[serde(rename = "listPrice")]
    pub list_price: Option<f64>,

    pub stock: i32,

    #[serde(rename = "shippingFee")]
    pub shipping_fee: f64,

    pub category: Option<String>,

    pub brand: Option<String>,

    /// Sanitized HTML detail content from the supplier page
    #[serde(rename = "detailHtml")]
    pub detail_html: Option<String>,

    pub status: SupplierProductStatus,

    /// When this item was last seen during catalog collection
    #[serde(rename = "collectedAt")]
    pub collected_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl SupplierProduct {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        supplier_ref: String,
        supplier_sku: String,
        cost_price: f64,
        list_price: Option<f64>,
        stock: i32,
        shipping_fee: f64,
        category: Option<String>,
        brand: Option<String>,
        detail_html: Option<String>,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(SupplierProductId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            supplier_ref,
            supplier_sku,
            cost_price,
            list_price,
            stock,
            shipping_fee,
            category,
            brand,
            detail_html,
            status: SupplierProductStatus::Active,
            collected_at: Some(chrono::Utc::now()),
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Refresh mutable catalog fields from a newly collected snapshot
    pub fn apply_collected(
        &mut self,
        description: String,
        cost_price: f64,
        list_price: Option<f64>,
        stock: i32,
        shipping_fee: f64,
        category: Option<String>,
        brand: Option<String>,
        detail_html: Option<String>,
    ) {
        self.base.description = description;
        self.cost_price = cost_price;
        self.list_price = list_price;
        self.stock = stock;
        self.shipping_fee = shipping_fee;
        self.category = category;
        self.brand = brand;
        self.detail_html = detail_html;
        self.status = if stock > 0 {
            SupplierProductStatus::Active
        } else {
            SupplierProductStatus::Soldout
        };
        self.collected_at = Some(chrono::Utc::now());
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Description must not be empty".into());
        }
        if self.supplier_ref.trim().is_empty() {
            return Err("Supplier reference must not be empty".into());
        }
        if self.supplier_sku.trim().is_empty() {
            return Err("Supplier SKU must not be empty".into());
        }
        if self.cost_price < 0.0 {
            return Err("Cost price must not be negative".into());
        }
        if self.stock < 0 {
            return Err("Stock must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}
