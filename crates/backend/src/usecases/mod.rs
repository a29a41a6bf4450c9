pub mod common;

pub mod u501_collect_from_supplier;
pub mod u502_register_listings;
pub mod u503_import_orders;
pub mod u504_process_orders;
pub mod u505_run_settlement;
