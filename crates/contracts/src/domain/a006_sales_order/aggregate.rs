use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique sales order identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesOrderId(pub Uuid);

impl SalesOrderId {
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

impl AggregateId for SalesOrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SalesOrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status / state machine
// ============================================================================

/// Lifecycle of a dropshipping order.
///
/// Happy path: Received -> Validated -> Confirmed -> Purchasing -> Purchased
/// -> Shipped -> Delivered -> Settled. MarginHold parks an order whose margin
/// gate failed until an operator releases it back to Validated. Cancellation
/// is allowed up to (and including) Purchased; a shipped order can no longer
/// be cancelled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Received,
    Validated,
    MarginHold,
    Confirmed,
    Purchasing,
    Purchased,
    Shipped,
    Delivered,
    Settled,
    Cancelled,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Received => "received",
            OrderStatus::Validated => "validated",
            OrderStatus::MarginHold => "margin_hold",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Purchasing => "purchasing",
            OrderStatus::Purchased => "purchased",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Settled => "settled",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "received" => Some(OrderStatus::Received),
            "validated" => Some(OrderStatus::Validated),
            "margin_hold" => Some(OrderStatus::MarginHold),
            "confirmed" => Some(OrderStatus::Confirmed),
            "purchasing" => Some(OrderStatus::Purchasing),
            "purchased" => Some(OrderStatus::Purchased),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "settled" => Some(OrderStatus::Settled),
            "cancelled" => Some(OrderStatus::Cancelled),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }

    /// No further transitions leave a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Settled | OrderStatus::Cancelled | OrderStatus::Failed
        )
    }

    /// Legal next statuses from this one
    pub fn allowed_next(&self) -> &'static [OrderStatus] {
        use OrderStatus::*;
        match self {
            Received => &[Validated, Cancelled, Failed],
            Validated => &[Confirmed, MarginHold, Cancelled, Failed],
            MarginHold => &[Validated, Cancelled],
            Confirmed => &[Purchasing, Cancelled, Failed],
            Purchasing => &[Purchased, Failed],
            Purchased => &[Shipped, Cancelled, Failed],
            Shipped => &[Delivered],
            Delivered => &[Settled],
            Settled | Cancelled | Failed => &[],
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionError {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "illegal order transition {} -> {}",
            self.from.as_str(),
            self.to.as_str()
        )
    }
}

impl std::error::Error for TransitionError {}

/// One entry of the order's status history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub at: chrono::DateTime<chrono::Utc>,
    pub note: Option<String>,
}

// ============================================================================
// Margin snapshot
// ============================================================================

/// Margin breakdown frozen onto an order or listing at decision time.
/// Amounts are KRW.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarginSnapshot {
    pub revenue: f64,
    #[serde(rename = "platformFee")]
    pub platform_fee: f64,
    pub cost: f64,
    #[serde(rename = "shippingCost")]
    pub shipping_cost: f64,
    #[serde(rename = "marginAmount")]
    pub margin_amount: f64,
    #[serde(rename = "marginRate")]
    pub margin_rate: f64,
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// One marketplace order line driven through the dropshipping pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<SalesOrderId>,

    /// Order number assigned by the marketplace
    #[serde(rename = "marketplaceOrderNo")]
    pub marketplace_order_no: String,

    /// Reference to a003_marketplace
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: String,

    /// Reference to a004_connection_mp
    #[serde(rename = "connectionMpRef")]
    pub connection_mp_ref: String,

    /// Reference to a005_listing, once mapped
    #[serde(rename = "listingRef")]
    pub listing_ref: Option<String>,

    #[serde(rename = "orderedAt")]
    pub ordered_at: chrono::DateTime<chrono::Utc>,

    pub quantity: i32,

    #[serde(rename = "unitPrice")]
    pub unit_price: f64,

    #[serde(rename = "totalPrice")]
    pub total_price: f64,

    #[serde(rename = "buyerName")]
    pub buyer_name: String,

    #[serde(rename = "receiverName")]
    pub receiver_name: String,

    #[serde(rename = "receiverPhone")]
    pub receiver_phone: String,

    #[serde(rename = "receiverAddress")]
    pub receiver_address: String,

    #[serde(rename = "receiverZip")]
    pub receiver_zip: Option<String>,

    /// Margin breakdown computed at the margin gate
    #[serde(rename = "marginSnapshot")]
    pub margin_snapshot: Option<MarginSnapshot>,

    pub status: OrderStatus,

    #[serde(rename = "statusHistory")]
    pub status_history: Vec<StatusChange>,

    #[serde(rename = "failureReason")]
    pub failure_reason: Option<String>,

    #[serde(rename = "retryCount")]
    pub retry_count: i32,
}

impl SalesOrder {
    #[allow(clippy::too_many_arguments)]
    pub fn new_for_insert(
        code: String,
        description: String,
        marketplace_order_no: String,
        marketplace_ref: String,
        connection_mp_ref: String,
        ordered_at: chrono::DateTime<chrono::Utc>,
        quantity: i32,
        unit_price: f64,
        total_price: f64,
        buyer_name: String,
        receiver_name: String,
        receiver_phone: String,
        receiver_address: String,
        receiver_zip: Option<String>,
    ) -> Self {
        let base = BaseAggregate::new(SalesOrderId::new_v4(), code, description);

        Self {
            base,
            marketplace_order_no,
            marketplace_ref,
            connection_mp_ref,
            listing_ref: None,
            ordered_at,
            quantity,
            unit_price,
            total_price,
            buyer_name,
            receiver_name,
            receiver_phone,
            receiver_address,
            receiver_zip,
            margin_snapshot: None,
            status: OrderStatus::Received,
            status_history: Vec::new(),
            failure_reason: None,
            retry_count: 0,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Move the order to `next`, recording the change in the status history.
    /// Illegal transitions are rejected and leave the order untouched.
    pub fn transition_to(
        &mut self,
        next: OrderStatus,
        note: Option<String>,
    ) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status_history.push(StatusChange {
            from: self.status,
            to: next,
            at: chrono::Utc::now(),
            note,
        });
        self.status = next;
        self.base.touch();
        Ok(())
    }

    pub fn record_failure(&mut self, reason: String) {
        self.failure_reason = Some(reason);
        self.retry_count += 1;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.marketplace_order_no.trim().is_empty() {
            return Err("Marketplace order number must not be empty".into());
        }
        if self.connection_mp_ref.trim().is_empty() {
            return Err("Connection reference must not be empty".into());
        }
        if self.quantity <= 0 {
            return Err("Quantity must be positive".into());
        }
        if self.total_price < 0.0 {
            return Err("Total price must not be negative".into());
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> SalesOrder {
        SalesOrder::new_for_insert(
            "ORD-TEST-1".into(),
            "test order".into(),
            "CP-20250801-001".into(),
            "mp-ref".into(),
            "conn-ref".into(),
            chrono::Utc::now(),
            1,
            12000.0,
            12000.0,
            "buyer".into(),
            "receiver".into(),
            "010-0000-0000".into(),
            "Seoul".into(),
            None,
        )
    }

    #[test]
    fn happy_path_transitions() {
        let mut o = order();
        for next in [
            OrderStatus::Validated,
            OrderStatus::Confirmed,
            OrderStatus::Purchasing,
            OrderStatus::Purchased,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Settled,
        ] {
            o.transition_to(next, None).unwrap();
        }
        assert_eq!(o.status, OrderStatus::Settled);
        assert_eq!(o.status_history.len(), 7);
    }

    #[test]
    fn margin_hold_release_reenters_validated() {
        let mut o = order();
        o.transition_to(OrderStatus::Validated, None).unwrap();
        o.transition_to(OrderStatus::MarginHold, Some("margin below minimum".into()))
            .unwrap();
        o.transition_to(OrderStatus::Validated, Some("released".into()))
            .unwrap();
        o.transition_to(OrderStatus::Confirmed, None).unwrap();
        assert_eq!(o.status, OrderStatus::Confirmed);
    }

    #[test]
    fn cannot_skip_validation() {
        let mut o = order();
        let err = o.transition_to(OrderStatus::Confirmed, None).unwrap_err();
        assert_eq!(err.from, OrderStatus::Received);
        assert_eq!(err.to, OrderStatus::Confirmed);
        assert_eq!(o.status, OrderStatus::Received);
        assert!(o.status_history.is_empty());
    }

    #[test]
    fn shipped_order_cannot_be_cancelled() {
        let mut o = order();
        o.transition_to(OrderStatus::Validated, None).unwrap();
        o.transition_to(OrderStatus::Confirmed, None).unwrap();
        o.transition_to(OrderStatus::Purchasing, None).unwrap();
        o.transition_to(OrderStatus::Purchased, None).unwrap();
        o.transition_to(OrderStatus::Shipped, None).unwrap();
        assert!(o.transition_to(OrderStatus::Cancelled, None).is_err());
    }

    #[test]
    fn terminal_statuses_have_no_exits() {
        for s in [
            OrderStatus::Settled,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert!(s.is_terminal());
            assert!(s.allowed_next().is_empty());
        }
    }

    #[test]
    fn status_roundtrips_through_str() {
        for s in [
            OrderStatus::Received,
            OrderStatus::Validated,
            OrderStatus::MarginHold,
            OrderStatus::Confirmed,
            OrderStatus::Purchasing,
            OrderStatus::Purchased,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Settled,
            OrderStatus::Cancelled,
            OrderStatus::Failed,
        ] {
            assert_eq!(OrderStatus::from_str(s.as_str()), Some(s));
        }
        assert_eq!(OrderStatus::from_str("unknown"), None);
    }
}
