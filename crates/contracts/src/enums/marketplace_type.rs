use serde::{Deserialize, Serialize};

/// Supported marketplaces (downstream sales channels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketplaceType {
    Coupang,
    Naver,
    ElevenSt,
}

impl MarketplaceType {
    /// Stable marketplace code
    pub fn code(&self) -> &'static str {
        match self {
            MarketplaceType::Coupang => "mp-coupang",
            MarketplaceType::Naver => "mp-naver",
            MarketplaceType::ElevenSt => "mp-11st",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            MarketplaceType::Coupang => "Coupang",
            MarketplaceType::Naver => "Naver SmartStore",
            MarketplaceType::ElevenSt => "11st",
        }
    }

    /// Default sales commission rate charged by the platform
    pub fn default_fee_rate(&self) -> f64 {
        match self {
            MarketplaceType::Coupang => 0.108,
            MarketplaceType::Naver => 0.055,
            MarketplaceType::ElevenSt => 0.12,
        }
    }

    pub fn all() -> Vec<MarketplaceType> {
        vec![
            MarketplaceType::Coupang,
            MarketplaceType::Naver,
            MarketplaceType::ElevenSt,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "mp-coupang" => Some(MarketplaceType::Coupang),
            "mp-naver" => Some(MarketplaceType::Naver),
            "mp-11st" => Some(MarketplaceType::ElevenSt),
            _ => None,
        }
    }
}

impl std::fmt::Display for MarketplaceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
