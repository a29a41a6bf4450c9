use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fetch new orders from marketplaces.
/// With no connection id, every used connection is polled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOrdersRequest {
    #[serde(default)]
    pub connection_id: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
}
