use serde::{Deserialize, Serialize};

/// Run the order automation pipeline over actionable orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOrdersRequest {
    /// Restrict to one order; None = every actionable order
    #[serde(default)]
    pub order_id: Option<String>,
    /// Also poll suppliers for tracking updates on purchased orders
    #[serde(default = "default_true")]
    pub sync_tracking: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProcessOrdersRequest {
    fn default() -> Self {
        Self {
            order_id: None,
            sync_tracking: true,
        }
    }
}
