use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique purchase order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PurchaseOrderId(pub Uuid);

impl PurchaseOrderId {
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

impl AggregateId for PurchaseOrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(PurchaseOrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseOrderStatus {
    /// Prepared locally, not yet sent to the supplier
    Created,
    /// Accepted by the supplier
    Placed,
    /// Supplier handed the parcel to a carrier
    Shipped,
    Delivered,
    Failed,
    Cancelled,
}

impl PurchaseOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PurchaseOrderStatus::Created => "created",
            PurchaseOrderStatus::Placed => "placed",
            PurchaseOrderStatus::Shipped => "shipped",
            PurchaseOrderStatus::Delivered => "delivered",
            PurchaseOrderStatus::Failed => "failed",
            PurchaseOrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(PurchaseOrderStatus::Created),
            "placed" => Some(PurchaseOrderStatus::Placed),
            "shipped" => Some(PurchaseOrderStatus::Shipped),
            "delivered" => Some(PurchaseOrderStatus::Delivered),
            "failed" => Some(PurchaseOrderStatus::Failed),
            "cancelled" => Some(PurchaseOrderStatus::Cancelled),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Wholesale order placed with a supplier to fulfil one sales order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<PurchaseOrderId>,

    /// Reference to a006_sales_order
    #[serde(rename = "salesOrderRef")]
    pub sales_order_ref: String,

    /// Reference to a001_supplier
    #[serde(rename = "supplierRef")]
    pub supplier_ref: String,

    /// Reference to a002_supplier_product
    #[serde(rename = "supplierProductRef")]
    pub supplier_product_ref: String,

    /// Order number assigned by the supplier once placed
    #[serde(rename = "supplierOrderNo")]
    pub supplier_order_no: Option<String>,

    pub quantity: i32,

    #[serde(rename = "costTotal")]
    pub cost_total: f64,

    #[serde(rename = "shippingFee")]
    pub shipping_fee: f64,

    #[serde(rename = "trackingCarrier")]
    pub tracking_carrier: Option<String>,

    #[serde(rename = "trackingNo")]
    pub tracking_no: Option<String>,

    pub status: PurchaseOrderStatus,

    /// Placement attempts made so far (retry bookkeeping)
    #[serde(rename = "attemptCount")]
    pub attempt_count: i32,

    #[serde(rename = "failureReason")]
    pub failure_reason: Option<String>,

    #[serde(rename = "placedAt")]
    pub placed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PurchaseOrder {
    pub fn new_for_insert(
        code: String,
        description: String,
        sales_order_ref: String,
        supplier_ref: String,
        supplier_product_ref: String,
        quantity: i32,
        cost_total: f64,
        shipping_fee: f64,
    ) -> Self {
        let base = BaseAggregate::new(PurchaseOrderId::new_v4(), code, description);

        Self {
            base,
            sales_order_ref,
            supplier_ref,
            supplier_product_ref,
            supplier_order_no: None,
            quantity,
            cost_total,
            shipping_fee,
            tracking_carrier: None,
            tracking_no: None,
            status: PurchaseOrderStatus::Created,
            attempt_count: 0,
            failure_reason: None,
            placed_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn mark_placed(&mut self, supplier_order_no: String) {
        self.supplier_order_no = Some(supplier_order_no);
        self.status = PurchaseOrderStatus::Placed;
        self.failure_reason = None;
        self.placed_at = Some(chrono::Utc::now());
    }

    pub fn mark_shipped(&mut self, carrier: Option<String>, tracking_no: String) {
        self.tracking_carrier = carrier;
        self.tracking_no = Some(tracking_no);
        self.status = PurchaseOrderStatus::Shipped;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sales_order_ref.trim().is_empty() {
            return Err("Sales order reference must not be empty".into());
        }
        if self.supplier_ref.trim().is_empty() {
            return Err("Supplier reference must not be empty".into());
        }
        if self.quantity <= 0 {
            return Err("Quantity must be positive".into());
        }
        if self.cost_total < 0.0 {
            return Err("Cost total must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}
