use super::{CollectedItem, PlacedOrder, ReceiverInfo, SupplierOrderStatus, TrackingInfo};
use anyhow::Result;
use contracts::domain::a001_supplier::aggregate::Supplier;
use serde::{Deserialize, Serialize};
use serde_json::json;

const DEFAULT_API_URL: &str = "https://api.ownerclan.com/v1/graphql";
const DEFAULT_AUTH_URL: &str = "https://auth.ownerclan.com/auth";
const PAGE_SIZE: i32 = 100;

/// GraphQL client for the OwnerClan wholesale API.
/// Authenticates with username/password, then sends a JWT on every query.
pub struct OwnerClanClient {
    client: reqwest::Client,
    api_url: String,
    auth_url: String,
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct AllItemsData {
    #[serde(rename = "allItems")]
    all_items: ItemConnection,
}

#[derive(Debug, Deserialize)]
struct ItemConnection {
    edges: Vec<ItemEdge>,
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct ItemEdge {
    node: ItemNode,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ItemNode {
    key: String,
    name: String,
    price: f64,
    #[serde(rename = "fixedPrice")]
    fixed_price: Option<f64>,
    stock: i32,
    #[serde(rename = "shippingFee")]
    shipping_fee: Option<f64>,
    category: Option<CategoryNode>,
    brand: Option<String>,
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoryNode {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ItemData {
    item: Option<ItemNode>,
}

#[derive(Debug, Deserialize)]
struct CreateOrderData {
    #[serde(rename = "createOrder")]
    create_order: CreatedOrderNode,
}

#[derive(Debug, Deserialize)]
struct CreatedOrderNode {
    key: String,
}

#[derive(Debug, Deserialize)]
struct OrderData {
    order: Option<OrderNode>,
}

#[derive(Debug, Deserialize)]
struct OrderNode {
    status: String,
    #[serde(rename = "trackingCompany")]
    tracking_company: Option<String>,
    #[serde(rename = "trackingNumber")]
    tracking_number: Option<String>,
}

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    service: &'a str,
    #[serde(rename = "userType")]
    user_type: &'a str,
    username: &'a str,
    password: &'a str,
}

impl OwnerClanClient {
    pub fn new(supplier: &Supplier) -> Result<Self> {
        let username = supplier
            .username
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OwnerClan supplier has no username"))?;
        let password = supplier
            .password
            .clone()
            .ok_or_else(|| anyhow::anyhow!("OwnerClan supplier has no password"))?;

        let api_url = if supplier.api_url.trim().is_empty() {
            DEFAULT_API_URL.to_string()
        } else {
            supplier.api_url.clone()
        };

        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            api_url,
            auth_url: DEFAULT_AUTH_URL.to_string(),
            username,
            password,
        })
    }

    /// Obtain a short-lived JWT for the GraphQL endpoint
    async fn authenticate(&self) -> Result<String> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(&AuthRequest {
                service: "ownerclan",
                user_type: "seller",
                username: &self.username,
                password: &self.password,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            tracing::error!("OwnerClan auth failed: {}", body);
            anyhow::bail!("OwnerClan auth failed with status {}: {}", status, body);
        }
        // The auth endpoint returns the raw token body
        Ok(body.trim().trim_matches('"').to_string())
    }

    async fn query<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(token)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OwnerClan API request failed: {}", body);
            anyhow::bail!("OwnerClan API request failed with status {}: {}", status, body);
        }

        let parsed: GraphQlResponse<T> = response.json().await?;
        if let Some(errors) = parsed.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            anyhow::bail!("OwnerClan GraphQL errors: {}", messages.join("; "));
        }
        parsed
            .data
            .ok_or_else(|| anyhow::anyhow!("OwnerClan GraphQL response has no data"))
    }

    /// Walk the allItems connection cursor until exhausted or max_items
    pub async fn collect_items(
        &self,
        category: Option<&str>,
        max_items: Option<i32>,
    ) -> Result<Vec<CollectedItem>> {
        const QUERY: &str = r#"
            query AllItems($first: Int!, $after: String, $category: String) {
                allItems(first: $first, after: $after, category: $category) {
                    edges {
                        node {
                            key name price fixedPrice stock shippingFee brand content
                            category { name }
                        }
                    }
                    pageInfo { hasNextPage endCursor }
                }
            }
        "#;

        let token = self.authenticate().await?;
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let data: AllItemsData = self
                .query(
                    &token,
                    QUERY,
                    json!({ "first": PAGE_SIZE, "after": cursor, "category": category }),
                )
                .await?;

            for edge in data.all_items.edges {
                items.push(node_to_item(edge.node));
                if let Some(max) = max_items {
                    if items.len() as i32 >= max {
                        return Ok(items);
                    }
                }
            }

            if !data.all_items.page_info.has_next_page {
                break;
            }
            cursor = data.all_items.page_info.end_cursor;
            if cursor.is_none() {
                break;
            }
        }

        Ok(items)
    }

    pub async fn fetch_stock(&self, sku: &str) -> Result<i32> {
        const QUERY: &str = r#"
            query Item($key: ID!) {
                item(key: $key) { key name price fixedPrice stock shippingFee brand content category { name } }
            }
        "#;
        let token = self.authenticate().await?;
        let data: ItemData = self.query(&token, QUERY, json!({ "key": sku })).await?;
        let item = data
            .item
            .ok_or_else(|| anyhow::anyhow!("OwnerClan item {} not found", sku))?;
        Ok(item.stock)
    }

    pub async fn place_order(
        &self,
        sku: &str,
        quantity: i32,
        receiver: &ReceiverInfo,
    ) -> Result<PlacedOrder> {
        const MUTATION: &str = r#"
            mutation CreateOrder($input: OrderInput!) {
                createOrder(input: $input) { key }
            }
        "#;
        let token = self.authenticate().await?;
        let data: CreateOrderData = self
            .query(
                &token,
                MUTATION,
                json!({
                    "input": {
                        "products": [{ "itemKey": sku, "quantity": quantity }],
                        "recipient": {
                            "name": receiver.name,
                            "phoneNumber": receiver.phone,
                            "destinationAddress": receiver.address,
                            "zipCode": receiver.zip,
                        }
                    }
                }),
            )
            .await?;
        Ok(PlacedOrder {
            supplier_order_no: data.create_order.key,
        })
    }

    pub async fn fetch_tracking(&self, supplier_order_no: &str) -> Result<TrackingInfo> {
        const QUERY: &str = r#"
            query Order($key: ID!) {
                order(key: $key) { status trackingCompany trackingNumber }
            }
        "#;
        let token = self.authenticate().await?;
        let data: OrderData = self
            .query(&token, QUERY, json!({ "key": supplier_order_no }))
            .await?;
        let order = data
            .order
            .ok_or_else(|| anyhow::anyhow!("OwnerClan order {} not found", supplier_order_no))?;

        let status = match order.status.as_str() {
            "shipping" | "shipped" => SupplierOrderStatus::Shipped,
            "delivered" | "completed" => SupplierOrderStatus::Delivered,
            "cancelled" => SupplierOrderStatus::Cancelled,
            _ => SupplierOrderStatus::Accepted,
        };
        Ok(TrackingInfo {
            status,
            carrier: order.tracking_company,
            tracking_no: order.tracking_number,
        })
    }
}

fn node_to_item(node: ItemNode) -> CollectedItem {
    CollectedItem {
        sku: node.key,
        name: node.name,
        cost_price: node.price,
        list_price: node.fixed_price,
        stock: node.stock,
        shipping_fee: node.shipping_fee,
        category: node.category.map(|c| c.name),
        brand: node.brand,
        detail_html: node.content,
    }
}
