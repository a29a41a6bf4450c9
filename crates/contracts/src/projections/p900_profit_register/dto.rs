use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One row of the profit register: the realized economics of one settled
/// order line. Rows are written when a settlement posts and keyed by
/// (marketplace, order no).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitRegisterRow {
    pub marketplace_ref: String,
    pub marketplace_order_no: String,
    /// a006_sales_order that produced this row
    pub registrar_ref: String,
    /// a008_settlement that posted this row
    pub settlement_ref: String,
    pub sale_date: NaiveDate,
    pub quantity: i32,
    pub revenue: f64,
    pub platform_fee: f64,
    pub product_cost: f64,
    pub shipping_cost: f64,
    pub profit: f64,
    pub margin_rate: f64,
    pub posted_at: DateTime<Utc>,
}

/// Query filter for the register listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProfitRegisterQuery {
    pub marketplace_ref: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

/// Aggregated register stats for one bucket (a date or a marketplace)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitStatsRow {
    pub bucket: String,
    pub order_count: i64,
    pub revenue: f64,
    pub platform_fee: f64,
    pub cost: f64,
    pub profit: f64,
}
