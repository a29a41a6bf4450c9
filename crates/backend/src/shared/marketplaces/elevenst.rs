use super::{
    FetchedOrder, MarketplaceClient, RegisterProductRequest, RegisteredProduct, ShipNotice,
    TestConnectionResult,
};
use crate::shared::config;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPDto};
use serde::Deserialize;
use serde_json::json;

/// Client for the 11st open API (single api-key header)
pub struct ElevenStClient;

fn api_key(connection: &ConnectionMP) -> Result<String> {
    connection
        .api_key
        .clone()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("11st connection has no API key"))
}

async fn request(
    connection: &ConnectionMP,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Result<String> {
    let key = api_key(connection)?;
    let base = &config::get().marketplaces.elevenst_api_url;

    let mut req = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?
        .request(method, format!("{}{}", base, path))
        .header("openapikey", key)
        .header("Content-Type", "application/json");
    if let Some(body) = body {
        req = req.json(&body);
    }

    let response = req.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::error!("11st API request failed: {} {}", status, text);
        anyhow::bail!("11st API request failed with status {}: {}", status, text);
    }
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(rename = "productNo")]
    product_no: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderListResponse {
    orders: Vec<ElevenStOrder>,
}

#[derive(Debug, Deserialize)]
struct ElevenStOrder {
    #[serde(rename = "ordNo")]
    ord_no: String,
    #[serde(rename = "ordDt")]
    ord_dt: DateTime<Utc>,
    #[serde(rename = "prdNo")]
    prd_no: String,
    #[serde(rename = "ordQty")]
    ord_qty: i32,
    #[serde(rename = "selPrc")]
    sel_prc: f64,
    #[serde(rename = "ordAmt")]
    ord_amt: f64,
    #[serde(rename = "ordNm")]
    ord_nm: String,
    #[serde(rename = "rcvrNm")]
    rcvr_nm: String,
    #[serde(rename = "rcvrTel")]
    rcvr_tel: Option<String>,
    #[serde(rename = "rcvrBaseAddr")]
    rcvr_base_addr: String,
    #[serde(rename = "rcvrMailNo")]
    rcvr_mail_no: Option<String>,
}

#[async_trait]
impl MarketplaceClient for ElevenStClient {
    async fn test_connection(dto: &ConnectionMPDto) -> TestConnectionResult {
        if dto.api_key.as_deref().unwrap_or("").trim().is_empty() {
            return TestConnectionResult {
                success: false,
                message: "API key is required for 11st".into(),
                details: None,
            };
        }
        let connection = ConnectionMP::new_for_insert(
            String::new(),
            "probe".into(),
            dto.marketplace_ref.clone(),
            None,
            None,
            None,
            None,
            None,
            dto.api_key.clone(),
            None,
            dto.test_mode,
            None,
        );
        match request(
            &connection,
            reqwest::Method::GET,
            "/rest/seller/v1/me",
            None,
        )
        .await
        {
            Ok(_) => TestConnectionResult {
                success: true,
                message: "11st connection OK".into(),
                details: None,
            },
            Err(e) => TestConnectionResult {
                success: false,
                message: "11st connection failed".into(),
                details: Some(e.to_string()),
            },
        }
    }

    async fn register_product(
        connection: &ConnectionMP,
        req: &RegisterProductRequest,
    ) -> Result<RegisteredProduct> {
        let body = json!({
            "prdNm": req.title,
            "selPrc": req.sale_price,
            "prdSelQty": req.stock,
            "htmlDetail": req.detail_html,
            "brand": req.brand,
            "dispCtgrNo": req.category,
            "sellerPrdCd": req.seller_sku,
        });
        let text = request(
            connection,
            reqwest::Method::POST,
            "/rest/prodservices/product",
            Some(body),
        )
        .await?;
        let parsed: RegisterResponse = serde_json::from_str(&text)?;
        let product_no = parsed
            .product_no
            .ok_or_else(|| anyhow::anyhow!("11st response carries no product number"))?;
        Ok(RegisteredProduct {
            marketplace_product_id: product_no,
        })
    }

    async fn fetch_new_orders(
        connection: &ConnectionMP,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<Vec<FetchedOrder>> {
        let path = format!(
            "/rest/ordservices/complete/{}/{}",
            date_from.format("%Y%m%d%H%M"),
            date_to.format("%Y%m%d%H%M"),
        );
        let text = request(connection, reqwest::Method::GET, &path, None).await?;
        let parsed: OrderListResponse = serde_json::from_str(&text)?;

        Ok(parsed
            .orders
            .into_iter()
            .map(|o| FetchedOrder {
                order_no: o.ord_no,
                ordered_at: o.ord_dt,
                marketplace_product_id: o.prd_no,
                quantity: o.ord_qty,
                unit_price: o.sel_prc,
                total_price: o.ord_amt,
                buyer_name: o.ord_nm,
                receiver_name: o.rcvr_nm,
                receiver_phone: o.rcvr_tel.unwrap_or_default(),
                receiver_address: o.rcvr_base_addr,
                receiver_zip: o.rcvr_mail_no,
            })
            .collect())
    }

    async fn send_ship_notice(connection: &ConnectionMP, notice: &ShipNotice) -> Result<()> {
        let path = format!(
            "/rest/ordservices/sendings/{}",
            urlencoding::encode(&notice.order_no)
        );
        let body = json!({
            "dlvNo": notice.tracking_no,
            "dlvEtprsCd": notice.carrier.as_deref().unwrap_or("00034"),
        });
        request(connection, reqwest::Method::PUT, &path, Some(body)).await?;
        Ok(())
    }
}
