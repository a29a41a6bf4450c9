pub mod coupang;
pub mod elevenst;
pub mod naver;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPDto};
use contracts::enums::marketplace_type::MarketplaceType;

/// Result of probing a marketplace connection
#[derive(Debug, Clone)]
pub struct TestConnectionResult {
    pub success: bool,
    pub message: String,
    pub details: Option<String>,
}

/// Product payload sent to a marketplace registration endpoint
#[derive(Debug, Clone)]
pub struct RegisterProductRequest {
    pub title: String,
    pub sale_price: f64,
    pub stock: i32,
    pub detail_html: Option<String>,
    pub brand: Option<String>,
    pub category: Option<String>,
    /// Seller-side key, used for later reconciliation
    pub seller_sku: String,
}

/// Product id assigned by the marketplace
#[derive(Debug, Clone)]
pub struct RegisteredProduct {
    pub marketplace_product_id: String,
}

/// One order fetched from a marketplace, in channel-neutral form
#[derive(Debug, Clone)]
pub struct FetchedOrder {
    pub order_no: String,
    pub ordered_at: DateTime<Utc>,
    pub marketplace_product_id: String,
    pub quantity: i32,
    pub unit_price: f64,
    pub total_price: f64,
    pub buyer_name: String,
    pub receiver_name: String,
    pub receiver_phone: String,
    pub receiver_address: String,
    pub receiver_zip: Option<String>,
}

/// Shipment notice pushed back to the marketplace
#[derive(Debug, Clone)]
pub struct ShipNotice {
    pub order_no: String,
    pub carrier: Option<String>,
    pub tracking_no: String,
}

/// Client interface each marketplace integration implements
#[async_trait]
pub trait MarketplaceClient {
    async fn test_connection(dto: &ConnectionMPDto) -> TestConnectionResult;

    async fn register_product(
        connection: &ConnectionMP,
        request: &RegisterProductRequest,
    ) -> Result<RegisteredProduct>;

    async fn fetch_new_orders(
        connection: &ConnectionMP,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<Vec<FetchedOrder>>;

    async fn send_ship_notice(connection: &ConnectionMP, notice: &ShipNotice) -> Result<()>;
}

/// Register one product on the connection's marketplace
pub async fn register_product(
    marketplace_type: MarketplaceType,
    connection: &ConnectionMP,
    request: &RegisterProductRequest,
) -> Result<RegisteredProduct> {
    match marketplace_type {
        MarketplaceType::Coupang => coupang::CoupangClient::register_product(connection, request).await,
        MarketplaceType::Naver => naver::NaverClient::register_product(connection, request).await,
        MarketplaceType::ElevenSt => {
            elevenst::ElevenStClient::register_product(connection, request).await
        }
    }
}

/// Fetch new orders in the window for the connection's marketplace
pub async fn fetch_new_orders(
    marketplace_type: MarketplaceType,
    connection: &ConnectionMP,
    date_from: DateTime<Utc>,
    date_to: DateTime<Utc>,
) -> Result<Vec<FetchedOrder>> {
    match marketplace_type {
        MarketplaceType::Coupang => {
            coupang::CoupangClient::fetch_new_orders(connection, date_from, date_to).await
        }
        MarketplaceType::Naver => {
            naver::NaverClient::fetch_new_orders(connection, date_from, date_to).await
        }
        MarketplaceType::ElevenSt => {
            elevenst::ElevenStClient::fetch_new_orders(connection, date_from, date_to).await
        }
    }
}

/// Push a tracking number back to the marketplace
pub async fn send_ship_notice(
    marketplace_type: MarketplaceType,
    connection: &ConnectionMP,
    notice: &ShipNotice,
) -> Result<()> {
    match marketplace_type {
        MarketplaceType::Coupang => coupang::CoupangClient::send_ship_notice(connection, notice).await,
        MarketplaceType::Naver => naver::NaverClient::send_ship_notice(connection, notice).await,
        MarketplaceType::ElevenSt => {
            elevenst::ElevenStClient::send_ship_notice(connection, notice).await
        }
    }
}

/// Probe the credentials in the DTO against the live marketplace API
pub async fn test_marketplace_connection(
    marketplace_type: MarketplaceType,
    dto: &ConnectionMPDto,
) -> TestConnectionResult {
    match marketplace_type {
        MarketplaceType::Coupang => coupang::CoupangClient::test_connection(dto).await,
        MarketplaceType::Naver => naver::NaverClient::test_connection(dto).await,
        MarketplaceType::ElevenSt => elevenst::ElevenStClient::test_connection(dto).await,
    }
}
