use super::{CollectedItem, PlacedOrder, ReceiverInfo, SupplierOrderStatus, TrackingInfo};
use anyhow::Result;
use contracts::domain::a001_supplier::aggregate::Supplier;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_API_URL: &str = "https://api.zentrade.co.kr";
const PAGE_SIZE: i32 = 200;

/// REST client for the Zentrade wholesale API (api-key header auth)
pub struct ZentradeClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ProductListResponse {
    products: Vec<ZentradeProduct>,
    total_count: i32,
}

#[derive(Debug, Deserialize)]
struct ZentradeProduct {
    goods_code: String,
    goods_name: String,
    supply_price: f64,
    consumer_price: Option<f64>,
    stock_qty: i32,
    delivery_fee: Option<f64>,
    category_name: Option<String>,
    brand_name: Option<String>,
    content_html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StockResponse {
    stock_qty: i32,
}

#[derive(Debug, Deserialize)]
struct OrderResponse {
    order_no: String,
}

#[derive(Debug, Deserialize)]
struct TrackingResponse {
    order_status: String,
    delivery_company: Option<String>,
    invoice_no: Option<String>,
}

impl ZentradeClient {
    pub fn new(supplier: &Supplier) -> Result<Self> {
        let api_key = supplier
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Zentrade supplier has no API key"))?;

        let api_url = if supplier.api_url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            supplier.api_url.trim_end_matches('/').to_string()
        };

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_url,
            api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self
            .client
            .get(&url)
            .header("x-api-key", &self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Zentrade API request failed: {} {}", status, body);
            anyhow::bail!("Zentrade API request failed with status {}: {}", status, body);
        }
        Ok(response.json().await?)
    }

    pub async fn collect_items(
        &self,
        category: Option<&str>,
        max_items: Option<i32>,
    ) -> Result<Vec<CollectedItem>> {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let mut query = vec![
                ("page", page.to_string()),
                ("size", PAGE_SIZE.to_string()),
            ];
            if let Some(cat) = category {
                query.push(("category", cat.to_string()));
            }

            let data: ProductListResponse = self.get_json("/v2/goods", &query).await?;
            let page_len = data.products.len();

            for p in data.products {
                items.push(CollectedItem {
                    sku: p.goods_code,
                    name: p.goods_name,
                    cost_price: p.supply_price,
                    list_price: p.consumer_price,
                    stock: p.stock_qty,
                    shipping_fee: p.delivery_fee,
                    category: p.category_name,
                    brand: p.brand_name,
                    detail_html: p.content_html,
                });
                if let Some(max) = max_items {
                    if items.len() as i32 >= max {
                        return Ok(items);
                    }
                }
            }

            if page_len < PAGE_SIZE as usize || items.len() as i32 >= data.total_count {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    pub async fn fetch_stock(&self, sku: &str) -> Result<i32> {
        let data: StockResponse = self
            .get_json(&format!("/v2/goods/{}/stock", urlencoding::encode(sku)), &[])
            .await?;
        Ok(data.stock_qty)
    }

    pub async fn place_order(
        &self,
        sku: &str,
        quantity: i32,
        receiver: &ReceiverInfo,
    ) -> Result<PlacedOrder> {
        let url = format!("{}/v2/orders", self.api_url);
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&json!({
                "goods_code": sku,
                "quantity": quantity,
                "receiver_name": receiver.name,
                "receiver_phone": receiver.phone,
                "receiver_address": receiver.address,
                "receiver_zip": receiver.zip,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Zentrade order placement failed: {} {}", status, body);
            anyhow::bail!("Zentrade order placement failed with status {}: {}", status, body);
        }
        let data: OrderResponse = response.json().await?;
        Ok(PlacedOrder {
            supplier_order_no: data.order_no,
        })
    }

    pub async fn fetch_tracking(&self, supplier_order_no: &str) -> Result<TrackingInfo> {
        let data: TrackingResponse = self
            .get_json(
                &format!("/v2/orders/{}/tracking", urlencoding::encode(supplier_order_no)),
                &[],
            )
            .await?;

        let status = match data.order_status.as_str() {
            "DELIVERING" => SupplierOrderStatus::Shipped,
            "DELIVERED" => SupplierOrderStatus::Delivered,
            "CANCELLED" => SupplierOrderStatus::Cancelled,
            _ => SupplierOrderStatus::Accepted,
        };
        Ok(TrackingInfo {
            status,
            carrier: data.delivery_company,
            tracking_no: data.invoice_no,
        })
    }
}
