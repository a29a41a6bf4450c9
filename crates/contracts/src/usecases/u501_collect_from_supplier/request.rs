use serde::{Deserialize, Serialize};

/// Start a catalog collection run for one supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectRequest {
    /// a001_supplier id
    pub supplier_id: String,
    /// Restrict collection to one upstream category, when supported
    #[serde(default)]
    pub category: Option<String>,
    /// Hard cap on collected items; None = full catalog
    #[serde(default)]
    pub max_items: Option<i32>,
    /// Mark items missing from this run as soldout
    #[serde(default = "default_true")]
    pub mark_missing_soldout: bool,
}

fn default_true() -> bool {
    true
}
