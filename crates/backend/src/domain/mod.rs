pub mod a001_supplier;
pub mod a002_supplier_product;
pub mod a003_marketplace;
pub mod a004_connection_mp;
pub mod a005_listing;
pub mod a006_sales_order;
pub mod a007_purchase_order;
pub mod a008_settlement;
pub mod a009_margin_rule;
pub mod a010_notification;
