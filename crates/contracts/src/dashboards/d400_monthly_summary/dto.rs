use serde::{Deserialize, Serialize};

/// Monthly rollup of the profit register, one row per (month, marketplace)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummaryRow {
    /// "YYYY-MM"
    pub month: String,
    pub marketplace_ref: String,
    pub marketplace_name: String,
    pub order_count: i64,
    pub revenue: f64,
    pub platform_fees: f64,
    pub product_cost: f64,
    pub shipping_cost: f64,
    pub profit: f64,
    pub margin_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlySummaryResponse {
    pub rows: Vec<MonthlySummaryRow>,
    pub total_revenue: f64,
    pub total_profit: f64,
}
