use serde::{Deserialize, Serialize};

/// Build (or rebuild) a settlement for one marketplace and period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRequest {
    /// a003_marketplace id
    pub marketplace_id: String,
    pub period_from: chrono::NaiveDate,
    pub period_to: chrono::NaiveDate,
}
