use serde::{Deserialize, Serialize};

/// Start a registration batch for one marketplace connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// a004_connection_mp id
    pub connection_id: String,
    /// Listings taken per batch run
    #[serde(default = "default_batch_size")]
    pub batch_size: i32,
    /// Target margin rate used when pricing unpriced listings
    #[serde(default)]
    pub target_margin_rate: Option<f64>,
    /// Generate SEO titles with the configured LLM before registering
    #[serde(default)]
    pub generate_titles: bool,
}

fn default_batch_size() -> i32 {
    50
}
