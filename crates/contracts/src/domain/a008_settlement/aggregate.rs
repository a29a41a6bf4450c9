use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique settlement identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementId(pub Uuid);

impl SettlementId {
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

impl AggregateId for SettlementId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SettlementId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    /// Recomputable working document
    Draft,
    /// Confirmed by an operator; frozen
    Confirmed,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SettlementStatus::Draft => "draft",
            SettlementStatus::Confirmed => "confirmed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(SettlementStatus::Draft),
            "confirmed" => Some(SettlementStatus::Confirmed),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Periodic reconciliation of one marketplace over a date range.
/// All money amounts are KRW.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    #[serde(flatten)]
    pub base: BaseAggregate<SettlementId>,

    /// Reference to a003_marketplace
    #[serde(rename = "marketplaceRef")]
    pub marketplace_ref: String,

    #[serde(rename = "periodFrom")]
    pub period_from: chrono::NaiveDate,

    #[serde(rename = "periodTo")]
    pub period_to: chrono::NaiveDate,

    #[serde(rename = "orderCount")]
    pub order_count: i32,

    #[serde(rename = "grossRevenue")]
    pub gross_revenue: f64,

    #[serde(rename = "platformFees")]
    pub platform_fees: f64,

    #[serde(rename = "productCost")]
    pub product_cost: f64,

    #[serde(rename = "shippingCost")]
    pub shipping_cost: f64,

    #[serde(rename = "netProfit")]
    pub net_profit: f64,

    /// Profit / revenue over the whole period; 0 when there was no revenue
    #[serde(rename = "avgMarginRate")]
    pub avg_margin_rate: f64,

    pub status: SettlementStatus,
}

impl Settlement {
    pub fn new_for_insert(
        code: String,
        description: String,
        marketplace_ref: String,
        period_from: chrono::NaiveDate,
        period_to: chrono::NaiveDate,
    ) -> Self {
        let base = BaseAggregate::new(SettlementId::new_v4(), code, description);

        Self {
            base,
            marketplace_ref,
            period_from,
            period_to,
            order_count: 0,
            gross_revenue: 0.0,
            platform_fees: 0.0,
            product_cost: 0.0,
            shipping_cost: 0.0,
            net_profit: 0.0,
            avg_margin_rate: 0.0,
            status: SettlementStatus::Draft,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Replace the computed totals (draft documents only)
    pub fn apply_totals(
        &mut self,
        order_count: i32,
        gross_revenue: f64,
        platform_fees: f64,
        product_cost: f64,
        shipping_cost: f64,
    ) {
        self.order_count = order_count;
        self.gross_revenue = gross_revenue;
        self.platform_fees = platform_fees;
        self.product_cost = product_cost;
        self.shipping_cost = shipping_cost;
        self.net_profit = gross_revenue - platform_fees - product_cost - shipping_cost;
        self.avg_margin_rate = if gross_revenue > 0.0 {
            self.net_profit / gross_revenue
        } else {
            0.0
        };
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.marketplace_ref.trim().is_empty() {
            return Err("Marketplace reference must not be empty".into());
        }
        if self.period_from > self.period_to {
            return Err("Settlement period start must not be after its end".into());
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

    #[test]
    fn totals_derive_profit_and_rate() {
        let mut s = Settlement::new_for_insert(
            "STL-1".into(),
            "august".into(),
            "mp".into(),
            chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        );
        s.apply_totals(10, 1_000_000.0, 108_000.0, 600_000.0, 30_000.0);
        assert_eq!(s.net_profit, 262_000.0);
        assert!((s.avg_margin_rate - 0.262).abs() < 1e-9);
    }

    #[test]
    fn zero_revenue_period_has_zero_rate() {
        let mut s = Settlement::new_for_insert(
            "STL-2".into(),
            "empty".into(),
            "mp".into(),
            chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 8, 31).unwrap(),
        );
        s.apply_totals(0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(s.avg_margin_rate, 0.0);
    }

    #[test]
    fn inverted_period_is_invalid() {
        let s = Settlement::new_for_insert(
            "STL-3".into(),
            "bad".into(),
            "mp".into(),
            chrono::NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        );
        assert!(s.validate().is_err());
    }
}
