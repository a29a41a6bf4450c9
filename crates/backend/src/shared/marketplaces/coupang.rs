use super::{
    FetchedOrder, MarketplaceClient, RegisterProductRequest, RegisteredProduct, ShipNotice,
    TestConnectionResult,
};
use crate::shared::config;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contracts::domain::a004_connection_mp::aggregate::{ConnectionMP, ConnectionMPDto};
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Client for the Coupang WING open API.
///
/// Every request carries a CEA authorization header whose HMAC-SHA256
/// signature covers `signed-date + method + path + query`.
pub struct CoupangClient;

/// Build the value of the Authorization header for one request
pub fn build_authorization(
    access_key: &str,
    secret_key: &str,
    method: &str,
    path: &str,
    query: &str,
    signed_date: &str,
) -> String {
    let message = format!("{}{}{}{}", signed_date, method, path, query);
    let signature = sign(secret_key, &message);
    format!(
        "CEA algorithm=HmacSHA256, access-key={}, signed-date={}, signature={}",
        access_key, signed_date, signature
    )
}

/// Lowercase hex HMAC-SHA256 of `message` under `secret`
fn sign(secret: &str, message: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(message.as_bytes());
    let bytes = mac.finalize().into_bytes();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Coupang's signed-date format: yyMMddTHHmmssZ, UTC
fn signed_date_now() -> String {
    Utc::now().format("%y%m%dT%H%M%SZ").to_string()
}

fn credentials(connection: &ConnectionMP) -> Result<(String, String, String)> {
    let vendor_id = connection
        .vendor_id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Coupang connection has no vendor id"))?;
    let access_key = connection
        .access_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Coupang connection has no access key"))?;
    let secret_key = connection
        .secret_key
        .clone()
        .ok_or_else(|| anyhow::anyhow!("Coupang connection has no secret key"))?;
    Ok((vendor_id, access_key, secret_key))
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?)
}

async fn request(
    connection: &ConnectionMP,
    method: reqwest::Method,
    path: &str,
    query: &str,
    body: Option<serde_json::Value>,
) -> Result<String> {
    let (_, access_key, secret_key) = credentials(connection)?;
    let base = &config::get().marketplaces.coupang_api_url;
    let signed_date = signed_date_now();
    let authorization = build_authorization(
        &access_key,
        &secret_key,
        method.as_str(),
        path,
        query,
        &signed_date,
    );

    let url = if query.is_empty() {
        format!("{}{}", base, path)
    } else {
        format!("{}{}?{}", base, path, query)
    };

    let mut req = http_client()?
        .request(method, &url)
        .header("Authorization", authorization)
        .header("Content-Type", "application/json");
    if let Some(body) = body {
        req = req.json(&body);
    }

    let response = req.send().await?;
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        tracing::error!("Coupang API request failed: {} {}", status, text);
        anyhow::bail!("Coupang API request failed with status {}: {}", status, text);
    }
    Ok(text)
}

#[derive(Debug, Deserialize)]
struct SellerProductResponse {
    data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct OrderSheetResponse {
    data: Vec<OrderSheet>,
}

#[derive(Debug, Deserialize)]
struct OrderSheet {
    #[serde(rename = "orderId")]
    order_id: i64,
    #[serde(rename = "orderedAt")]
    ordered_at: DateTime<Utc>,
    orderer: Orderer,
    receiver: Receiver,
    #[serde(rename = "orderItems")]
    order_items: Vec<OrderItem>,
}

#[derive(Debug, Deserialize)]
struct Orderer {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Receiver {
    name: String,
    #[serde(rename = "safeNumber")]
    safe_number: Option<String>,
    addr1: String,
    addr2: Option<String>,
    #[serde(rename = "postCode")]
    post_code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OrderItem {
    #[serde(rename = "sellerProductId")]
    seller_product_id: i64,
    #[serde(rename = "shippingCount")]
    shipping_count: i32,
    #[serde(rename = "salesPrice")]
    sales_price: f64,
    #[serde(rename = "orderPrice")]
    order_price: f64,
}

#[async_trait]
impl MarketplaceClient for CoupangClient {
    async fn test_connection(dto: &ConnectionMPDto) -> TestConnectionResult {
        let vendor_id = match dto.vendor_id.as_deref() {
            Some(v) if !v.trim().is_empty() => v.to_string(),
            _ => {
                return TestConnectionResult {
                    success: false,
                    message: "Vendor id is required for Coupang".into(),
                    details: None,
                }
            }
        };
        if dto.access_key.as_deref().unwrap_or("").trim().is_empty()
            || dto.secret_key.as_deref().unwrap_or("").trim().is_empty()
        {
            return TestConnectionResult {
                success: false,
                message: "Access key and secret key are required for Coupang".into(),
                details: None,
            };
        }

        // Cheapest authenticated call: list outbound shipping places
        let connection = ConnectionMP::new_for_insert(
            String::new(),
            "probe".into(),
            dto.marketplace_ref.clone(),
            Some(vendor_id.clone()),
            dto.access_key.clone(),
            dto.secret_key.clone(),
            None,
            None,
            None,
            None,
            dto.test_mode,
            None,
        );
        let path = "/v2/providers/openapi/apis/api/v4/vendors/outboundShippingCenters";
        match request(&connection, reqwest::Method::GET, path, "", None).await {
            Ok(_) => TestConnectionResult {
                success: true,
                message: format!("Coupang connection OK (vendor {})", vendor_id),
                details: None,
            },
            Err(e) => TestConnectionResult {
                success: false,
                message: "Coupang connection failed".into(),
                details: Some(e.to_string()),
            },
        }
    }

    async fn register_product(
        connection: &ConnectionMP,
        req: &RegisterProductRequest,
    ) -> Result<RegisteredProduct> {
        let (vendor_id, _, _) = credentials(connection)?;
        let path = "/v2/providers/seller_api/apis/api/v1/marketplace/seller-products";

        let body = json!({
            "displayCategoryCode": req.category,
            "sellerProductName": req.title,
            "vendorId": vendor_id,
            "saleStartedAt": Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            "brand": req.brand,
            "items": [{
                "itemName": req.title,
                "originalPrice": req.sale_price,
                "salePrice": req.sale_price,
                "maximumBuyCount": req.stock,
                "externalVendorSku": req.seller_sku,
            }],
            "detailContent": req.detail_html,
        });

        let text = request(connection, reqwest::Method::POST, path, "", Some(body)).await?;
        let parsed: SellerProductResponse = serde_json::from_str(&text)?;
        let product_id = parsed
            .data
            .and_then(|d| match d {
                serde_json::Value::Number(n) => Some(n.to_string()),
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Object(o) => o
                    .get("sellerProductId")
                    .map(|v| v.to_string().trim_matches('"').to_string()),
                _ => None,
            })
            .ok_or_else(|| anyhow::anyhow!("Coupang response carries no seller product id"))?;

        Ok(RegisteredProduct {
            marketplace_product_id: product_id,
        })
    }

    async fn fetch_new_orders(
        connection: &ConnectionMP,
        date_from: DateTime<Utc>,
        date_to: DateTime<Utc>,
    ) -> Result<Vec<FetchedOrder>> {
        let (vendor_id, _, _) = credentials(connection)?;
        let path = format!(
            "/v2/providers/openapi/apis/api/v4/vendors/{}/ordersheets",
            vendor_id
        );
        let query = format!(
            "createdAtFrom={}&createdAtTo={}&status=ACCEPT",
            date_from.format("%Y-%m-%d"),
            date_to.format("%Y-%m-%d"),
        );

        let text = request(connection, reqwest::Method::GET, &path, &query, None).await?;
        let parsed: OrderSheetResponse = serde_json::from_str(&text)?;

        let mut orders = Vec::new();
        for sheet in parsed.data {
            for item in &sheet.order_items {
                let receiver_address = match &sheet.receiver.addr2 {
                    Some(addr2) if !addr2.is_empty() => {
                        format!("{} {}", sheet.receiver.addr1, addr2)
                    }
                    _ => sheet.receiver.addr1.clone(),
                };
                orders.push(FetchedOrder {
                    order_no: sheet.order_id.to_string(),
                    ordered_at: sheet.ordered_at,
                    marketplace_product_id: item.seller_product_id.to_string(),
                    quantity: item.shipping_count,
                    unit_price: item.sales_price,
                    total_price: item.order_price,
                    buyer_name: sheet.orderer.name.clone(),
                    receiver_name: sheet.receiver.name.clone(),
                    receiver_phone: sheet.receiver.safe_number.clone().unwrap_or_default(),
                    receiver_address,
                    receiver_zip: sheet.receiver.post_code.clone(),
                });
            }
        }
        Ok(orders)
    }

    async fn send_ship_notice(connection: &ConnectionMP, notice: &ShipNotice) -> Result<()> {
        let (vendor_id, _, _) = credentials(connection)?;
        let path = format!(
            "/v2/providers/openapi/apis/api/v4/vendors/{}/orders/invoices",
            vendor_id
        );
        let body = json!({
            "vendorId": vendor_id,
            "orderSheetInvoiceApplyDtos": [{
                "shipmentBoxId": notice.order_no,
                "orderId": notice.order_no,
                "deliveryCompanyCode": notice.carrier.as_deref().unwrap_or("CJGLS"),
                "invoiceNumber": notice.tracking_no,
            }]
        });
        request(connection, reqwest::Method::POST, &path, "", Some(body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_deterministic_hex() {
        let a = sign("secret", "250801T000000ZGET/v2/providers/x");
        let b = sign("secret", "250801T000000ZGET/v2/providers/x");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn signature_depends_on_secret_and_message() {
        let base = sign("secret", "250801T000000ZGET/path");
        assert_ne!(base, sign("other-secret", "250801T000000ZGET/path"));
        assert_ne!(base, sign("secret", "250801T000000ZPOST/path"));
    }

    #[test]
    fn authorization_header_shape() {
        let header = build_authorization("AK", "SK", "GET", "/v2/x", "a=1", "250801T010203Z");
        assert!(header.starts_with("CEA algorithm=HmacSHA256, access-key=AK"));
        assert!(header.contains("signed-date=250801T010203Z"));
        assert!(header.contains("signature="));
    }
}
