pub mod domeggook;
pub mod ownerclan;
pub mod zentrade;

use anyhow::Result;
use contracts::domain::a001_supplier::aggregate::Supplier;
use contracts::enums::supplier_type::SupplierType;
use serde::{Deserialize, Serialize};

/// One catalog item in supplier-neutral form
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectedItem {
    pub sku: String,
    pub name: String,
    pub cost_price: f64,
    pub list_price: Option<f64>,
    pub stock: i32,
    pub shipping_fee: Option<f64>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub detail_html: Option<String>,
}

/// Delivery target for a wholesale order
#[derive(Debug, Clone)]
pub struct ReceiverInfo {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub zip: Option<String>,
}

/// Wholesale order accepted by the supplier
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub supplier_order_no: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierOrderStatus {
    Accepted,
    Shipped,
    Delivered,
    Cancelled,
}

/// Tracking state of a placed wholesale order
#[derive(Debug, Clone)]
pub struct TrackingInfo {
    pub status: SupplierOrderStatus,
    pub carrier: Option<String>,
    pub tracking_no: Option<String>,
}

/// Collect the supplier's catalog, normalized to CollectedItem.
/// Pagination is handled inside each client.
pub async fn collect_catalog(
    supplier: &Supplier,
    category: Option<&str>,
    max_items: Option<i32>,
) -> Result<Vec<CollectedItem>> {
    match supplier.supplier_type {
        SupplierType::OwnerClan => {
            ownerclan::OwnerClanClient::new(supplier)?
                .collect_items(category, max_items)
                .await
        }
        SupplierType::Zentrade => {
            zentrade::ZentradeClient::new(supplier)?
                .collect_items(category, max_items)
                .await
        }
        SupplierType::Domeggook => {
            domeggook::DomeggookClient::new(supplier)?
                .collect_items(category, max_items)
                .await
        }
    }
}

/// Current stock of one item
pub async fn check_stock(supplier: &Supplier, sku: &str) -> Result<i32> {
    match supplier.supplier_type {
        SupplierType::OwnerClan => ownerclan::OwnerClanClient::new(supplier)?.fetch_stock(sku).await,
        SupplierType::Zentrade => zentrade::ZentradeClient::new(supplier)?.fetch_stock(sku).await,
        SupplierType::Domeggook => {
            domeggook::DomeggookClient::new(supplier)?.fetch_stock(sku).await
        }
    }
}

/// Place a wholesale order for one item
pub async fn place_order(
    supplier: &Supplier,
    sku: &str,
    quantity: i32,
    receiver: &ReceiverInfo,
) -> Result<PlacedOrder> {
    match supplier.supplier_type {
        SupplierType::OwnerClan => {
            ownerclan::OwnerClanClient::new(supplier)?
                .place_order(sku, quantity, receiver)
                .await
        }
        SupplierType::Zentrade => {
            zentrade::ZentradeClient::new(supplier)?
                .place_order(sku, quantity, receiver)
                .await
        }
        SupplierType::Domeggook => {
            domeggook::DomeggookClient::new(supplier)?
                .place_order(sku, quantity, receiver)
                .await
        }
    }
}

/// Tracking state of a previously placed order
pub async fn fetch_tracking(supplier: &Supplier, supplier_order_no: &str) -> Result<TrackingInfo> {
    match supplier.supplier_type {
        SupplierType::OwnerClan => {
            ownerclan::OwnerClanClient::new(supplier)?
                .fetch_tracking(supplier_order_no)
                .await
        }
        SupplierType::Zentrade => {
            zentrade::ZentradeClient::new(supplier)?
                .fetch_tracking(supplier_order_no)
                .await
        }
        SupplierType::Domeggook => {
            domeggook::DomeggookClient::new(supplier)?
                .fetch_tracking(supplier_order_no)
                .await
        }
    }
}
