use super::{CollectedItem, PlacedOrder, ReceiverInfo, SupplierOrderStatus, TrackingInfo};
use anyhow::Result;
use contracts::domain::a001_supplier::aggregate::Supplier;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_API_URL: &str = "https://domeggook.com/ssl/api";
const PAGE_SIZE: i32 = 100;

/// REST client for the Domeggook open API (key passed as a query parameter)
pub struct DomeggookClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    items: ListItems,
}

#[derive(Debug, Deserialize)]
struct ListItems {
    item: Vec<DomeggookItem>,
    #[serde(rename = "numberOfItems")]
    number_of_items: i32,
}

#[derive(Debug, Deserialize)]
struct DomeggookItem {
    no: String,
    title: String,
    price: f64,
    #[serde(rename = "consumerPrice")]
    consumer_price: Option<f64>,
    #[serde(rename = "qty")]
    quantity: i32,
    #[serde(rename = "deliveryFee")]
    delivery_fee: Option<f64>,
    category: Option<String>,
    #[serde(rename = "detailHtml")]
    detail_html: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailResponse {
    item: DomeggookItem,
}

#[derive(Debug, Deserialize)]
struct OrderCreateResponse {
    #[serde(rename = "orderNo")]
    order_no: String,
}

#[derive(Debug, Deserialize)]
struct DeliveryResponse {
    status: String,
    #[serde(rename = "deliveryCompany")]
    delivery_company: Option<String>,
    #[serde(rename = "trackingNo")]
    tracking_no: Option<String>,
}

impl DomeggookClient {
    pub fn new(supplier: &Supplier) -> Result<Self> {
        let api_key = supplier
            .api_key
            .clone()
            .ok_or_else(|| anyhow::anyhow!("Domeggook supplier has no API key"))?;

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

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        mut query: Vec<(&str, String)>,
    ) -> Result<T> {
        query.push(("aid", self.api_key.clone()));
        query.push(("om", "json".to_string()));

        let response = self
            .client
            .get(&self.api_url)
            .query(&query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Domeggook API request failed: {} {}", status, body);
            anyhow::bail!("Domeggook API request failed with status {}: {}", status, body);
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
                ("ver", "4.1".to_string()),
                ("mode", "getItemList".to_string()),
                ("pg", page.to_string()),
                ("sz", PAGE_SIZE.to_string()),
            ];
            if let Some(cat) = category {
                query.push(("ca", cat.to_string()));
            }

            let data: ListResponse = self.get_json(query).await?;
            let total = data.items.number_of_items;
            let page_len = data.items.item.len();

            for it in data.items.item {
                items.push(item_to_collected(it));
                if let Some(max) = max_items {
                    if items.len() as i32 >= max {
                        return Ok(items);
                    }
                }
            }

            if page_len < PAGE_SIZE as usize || items.len() as i32 >= total {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    pub async fn fetch_stock(&self, sku: &str) -> Result<i32> {
        let data: DetailResponse = self
            .get_json(vec![
                ("ver", "4.1".to_string()),
                ("mode", "getItemView".to_string()),
                ("no", sku.to_string()),
            ])
            .await?;
        Ok(data.item.quantity)
    }

    pub async fn place_order(
        &self,
        sku: &str,
        quantity: i32,
        receiver: &ReceiverInfo,
    ) -> Result<PlacedOrder> {
        let response = self
            .client
            .post(&self.api_url)
            .query(&[
                ("ver", "4.1"),
                ("mode", "createOrder"),
                ("aid", self.api_key.as_str()),
                ("om", "json"),
            ])
            .json(&json!({
                "itemNo": sku,
                "qty": quantity,
                "receiver": {
                    "name": receiver.name,
                    "phone": receiver.phone,
                    "address": receiver.address,
                    "zip": receiver.zip,
                }
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Domeggook order placement failed: {} {}", status, body);
            anyhow::bail!("Domeggook order placement failed with status {}: {}", status, body);
        }
        let data: OrderCreateResponse = response.json().await?;
        Ok(PlacedOrder {
            supplier_order_no: data.order_no,
        })
    }

    pub async fn fetch_tracking(&self, supplier_order_no: &str) -> Result<TrackingInfo> {
        let data: DeliveryResponse = self
            .get_json(vec![
                ("ver", "4.1".to_string()),
                ("mode", "getOrderDelivery".to_string()),
                ("orderNo", supplier_order_no.to_string()),
            ])
            .await?;

        let status = match data.status.as_str() {
            "shipping" => SupplierOrderStatus::Shipped,
            "delivered" => SupplierOrderStatus::Delivered,
            "cancelled" => SupplierOrderStatus::Cancelled,
            _ => SupplierOrderStatus::Accepted,
        };
        Ok(TrackingInfo {
            status,
            carrier: data.delivery_company,
            tracking_no: data.tracking_no,
        })
    }
}

fn item_to_collected(it: DomeggookItem) -> CollectedItem {
    CollectedItem {
        sku: it.no,
        name: it.title,
        cost_price: it.price,
        list_price: it.consumer_price,
        stock: it.quantity,
        shipping_fee: it.delivery_fee,
        category: it.category,
        brand: None,
        detail_html: it.detail_html,
    }
}
