use super::{
    FetchedOrder, MarketplaceClient, RegisterProductRequest, RegisteredProduct, ShipNotice,
    TestConnectionResult,
};
use crate::shared::config;
use anyhow::Result;
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Utc};
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPDto};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Client for the Naver Commerce (SmartStore) API.
/// client-credentials OAuth: the secret signs `client_id + "_" + timestamp`,
/// the resulting token is sent as a bearer.
pub struct NaverClient;

fn credentials(connection: &ConnectionMP) -> Result<(String, String)> {
    let client_id = connection
        .client_id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Naver connection has no client id"))?;
    let client_secret = connection
        .client_secret
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Naver connection has no client secret"))?;
    Ok((client_id, client_secret))
}

/// Base64 signature over `client_id + "_" + timestamp_millis`
pub fn client_secret_sign(client_id: &str, client_secret: &str, timestamp_millis: i64) -> String {
    let message = format!("{}_{}", client_id, timestamp_millis);
    let mut mac =
        HmacSha256::new_from_slice(client_secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    general_purpose::STANDARD.encode(mac.finalize().into_bytes())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

async fn fetch_token(connection: &ConnectionMP) -> Result<String> {
    let (client_id, client_secret) = credentials(connection)?;
    let base = &config::get().marketplaces.naver_api_url;
    let timestamp = Utc::now().timestamp_millis();
    let sign = client_secret_sign(&client_id, &client_secret, timestamp);

    let response = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?
        .post(format!("{}/external/v1/oauth2/token", base))
        .form(&[
            ("client_id", client_id.as_str()),
            ("timestamp", &timestamp.to_string()),
            ("client_secret_sign", &sign),
            ("grant_type", "client_credentials"),
            ("type", "SELF"),
        ])
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Naver token request failed: {} {}", status, body);
        anyhow::bail!("Naver token request failed with status {}: {}", status, body);
    }
    let token: TokenResponse = response.json().await?;
    Ok(token.access_token)
}

async fn request(
    connection: &ConnectionMP,
    method: reqwest::Method,
    path: &str,
    body: Option<serde_json::Value>,
) -> Result<String> {
    let token = fetch_token(connection).await?;
    let base = &config::get().marketplaces.naver_api_url;

    let mut req = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?
        .request(method, format!("{}{}", base, path))
        .bearer_auth(token)
        .header("Content-Type", "application/json");
    if let Some(body) = body {
        req = req.json(&body);
    }

    let response = req.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::error!("Naver API request failed: {} {}", status, text);
        anyhow::bail!("Naver API request failed with status {}: {}", status, text);
    }
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct RegisterResponse {
    #[serde(rename = "originProductNo")]
    origin_product_no: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct NewOrdersResponse {
    data: Option<NewOrdersData>,
}

#[derive(Debug, Deserialize)]
struct NewOrdersData {
    contents: Vec<OrderContent>,
}

#[derive(Debug, Deserialize)]
struct OrderContent {
    content: OrderEnvelope,
}

#[derive(Debug, Deserialize)]
struct OrderEnvelope {
    order: NaverOrder,
    #[serde(rename = "productOrder")]
    product_order: ProductOrder,
}

#[derive(Debug, Deserialize)]
struct NaverOrder {
    #[serde(rename = "orderId")]
    order_id: String,
    #[serde(rename = "orderDate")]
    order_date: DateTime<Utc>,
    #[serde(rename = "ordererName")]
    orderer_name: String,
}

#[derive(Debug, Deserialize)]
struct ProductOrder {
    #[serde(rename = "productId")]
    product_id: String,
    quantity: i32,
    #[serde(rename = "unitPrice")]
    unit_price: f64,
    #[serde(rename = "totalPaymentAmount")]
    total_payment_amount: f64,
    #[serde(rename = "shippingAddress")]
    shipping_address: ShippingAddress,
}

#[derive(Debug, Deserialize)]
struct ShippingAddress {
    name: String,
    #[serde(rename = "tel1")]
    tel1: Option<String>,
    #[serde(rename = "baseAddress")]
    base_address: String,
    #[serde(rename = "detailedAddress")]
    detailed_address: Option<String>,
    #[serde(rename = "zipCode")]
    zip_code: Option<String>,
}

#[async_trait]
impl MarketplaceClient for NaverClient {
    async fn test_connection(dto: &ConnectionMPDto) -> TestConnectionResult {
        if dto.client_id.as_deref().unwrap_or("").trim().is_empty()
            || dto.client_secret.as_deref().unwrap_or("").trim().is_empty()
        {
            return TestConnectionResult {
                success: false,
                message: "Client id and client secret are required for Naver".into(),
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
            dto.client_id.clone(),
            dto.client_secret.clone(),
            None,
            None,
            dto.test_mode,
            None,
        );
        match fetch_token(&connection).await {
            Ok(_) => TestConnectionResult {
                success: true,
                message: "Naver connection OK".into(),
                details: None,
            },
            Err(e) => TestConnectionResult {
                success: false,
                message: "Naver connection failed".into(),
                details: Some(e.to_string()),
            },
        }
    }

    async fn register_product(
        connection: &ConnectionMP,
        req: &RegisterProductRequest,
    ) -> Result<RegisteredProduct> {
        let body = json!({
            "originProduct": {
                "statusType": "SALE",
                "name": req.title,
                "salePrice": req.sale_price,
                "stockQuantity": req.stock,
                "detailContent": req.detail_html,
                "sellerManagementCode": req.seller_sku,
                "leafCategoryId": req.category,
            }
        });
        let text = request(
            connection,
            reqwest::Method::POST,
            "/external/v2/products",
            Some(body),
        )
        .await?;
        let parsed: RegisterResponse = serde_json::from_str(&text)?;
        let product_no = parsed
            .origin_product_no
            .ok_or_else(|| anyhow::anyhow!("Naver response carries no product number"))?;
        Ok(RegisteredProduct {
            marketplace_product_id: product_no.to_string(),
        })
    }

    async fn fetch_new_orders(
        connection: &ConnectionMP,
        date_from: DateTime<Utc>,
        _date_to: DateTime<Utc>,
    ) -> Result<Vec<FetchedOrder>> {
        let path = format!(
            "/external/v1/pay-order/seller/product-orders?from={}&rangeType=PAYED_DATETIME",
            urlencoding::encode(&date_from.to_rfc3339()),
        );
        let text = request(connection, reqwest::Method::GET, &path, None).await?;
        let parsed: NewOrdersResponse = serde_json::from_str(&text)?;

        let mut orders = Vec::new();
        if let Some(data) = parsed.data {
            for item in data.contents {
                let env = item.content;
                let addr = &env.product_order.shipping_address;
                let receiver_address = match &addr.detailed_address {
                    Some(d) if !d.is_empty() => format!("{} {}", addr.base_address, d),
                    _ => addr.base_address.clone(),
                };
                orders.push(FetchedOrder {
                    order_no: env.order.order_id.clone(),
                    ordered_at: env.order.order_date,
                    marketplace_product_id: env.product_order.product_id.clone(),
                    quantity: env.product_order.quantity,
                    unit_price: env.product_order.unit_price,
                    total_price: env.product_order.total_payment_amount,
                    buyer_name: env.order.orderer_name.clone(),
                    receiver_name: addr.name.clone(),
                    receiver_phone: addr.tel1.clone().unwrap_or_default(),
                    receiver_address,
                    receiver_zip: addr.zip_code.clone(),
                });
            }
        }
        Ok(orders)
    }

    async fn send_ship_notice(connection: &ConnectionMP, notice: &ShipNotice) -> Result<()> {
        let path = format!(
            "/external/v1/pay-order/seller/product-orders/{}/dispatch",
            urlencoding::encode(&notice.order_no)
        );
        let body = json!({
            "dispatchProductOrders": [{
                "productOrderId": notice.order_no,
                "deliveryMethod": "DELIVERY",
                "deliveryCompanyCode": notice.carrier.as_deref().unwrap_or("CJGLS"),
                "trackingNumber": notice.tracking_no,
                "dispatchDate": Utc::now().to_rfc3339(),
            }]
        });
        request(connection, reqwest::Method::POST, &path, Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_is_deterministic_base64() {
        let a = client_secret_sign("cid", "secret", 1_722_470_400_000);
        let b = client_secret_sign("cid", "secret", 1_722_470_400_000);
        assert_eq!(a, b);
        assert!(general_purpose::STANDARD.decode(&a).is_ok());
    }

    #[test]
    fn sign_varies_with_timestamp() {
        let a = client_secret_sign("cid", "secret", 1);
        let b = client_secret_sign("cid", "secret", 2);
        assert_ne!(a, b);
    }
}
