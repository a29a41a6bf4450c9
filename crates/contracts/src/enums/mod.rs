pub mod marketplace_type;
pub mod supplier_type;

pub use marketplace_type::MarketplaceType;
pub use supplier_type::SupplierType;
