use serde::{Deserialize, Serialize};

/// Supported wholesalers (upstream catalog sources)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplierType {
    OwnerClan,
    Zentrade,
    Domeggook,
}

impl SupplierType {
    pub fn code(&self) -> &'static str {
        match self {
            SupplierType::OwnerClan => "sup-ownerclan",
            SupplierType::Zentrade => "sup-zentrade",
            SupplierType::Domeggook => "sup-domeggook",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupplierType::OwnerClan => "OwnerClan",
            SupplierType::Zentrade => "Zentrade",
            SupplierType::Domeggook => "Domeggook",
        }
    }

    pub fn all() -> Vec<SupplierType> {
        vec![
            SupplierType::OwnerClan,
            SupplierType::Zentrade,
            SupplierType::Domeggook,
        ]
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "sup-ownerclan" => Some(SupplierType::OwnerClan),
            "sup-zentrade" => Some(SupplierType::Zentrade),
            "sup-domeggook" => Some(SupplierType::Domeggook),
            _ => None,
        }
    }
}

impl std::fmt::Display for SupplierType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}
