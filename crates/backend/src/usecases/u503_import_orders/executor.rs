use crate::domain::{a003_marketplace, a004_connection_mp, a005_listing, a006_sales_order};
use crate::shared::marketplaces::{self, FetchedOrder};
use crate::usecases::common::ProgressTracker;
use anyhow::Result;
use chrono::{Duration, Utc};
use contracts::domain::a004_connection_mp::aggregate::ConnectionMP;
use contracts::domain::a006_sales_order::aggregate::SalesOrder;
use contracts::domain::common::AggregateId;
use contracts::usecases::common::progress::SessionStatus;
use contracts::usecases::common::response::{SessionStartResponse, SessionStartStatus};
use contracts::usecases::u503_import_orders::ImportOrdersRequest;
use std::sync::Arc;
use uuid::Uuid;

/// Executor for marketplace order collection
#[derive(Clone)]
pub struct ImportOrdersExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl ImportOrdersExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    pub async fn start_import(&self, request: ImportOrdersRequest) -> Result<SessionStartResponse> {
        let connections = match &request.connection_id {
            Some(id) => {
                let uuid =
                    Uuid::parse_str(id).map_err(|_| anyhow::anyhow!("Invalid connection_id"))?;
                let connection = a004_connection_mp::service::get_by_id(uuid)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;
                vec![connection]
            }
            None => a004_connection_mp::service::list_used().await?,
        };
        if connections.is_empty() {
            anyhow::bail!("No marketplace connections to poll");
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        for connection in &connections {
            self.progress_tracker.add_stage(
                &session_id,
                connection.base.id.as_string(),
                connection.base.description.clone(),
            );
        }

        let executor = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            executor
                .run_import(&session_id_clone, connections, request)
                .await;
        });

        Ok(SessionStartResponse {
            session_id,
            status: SessionStartStatus::Started,
            message: "Order import started".into(),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::common::progress::SessionProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Run an import inline under an externally supplied session id
    /// (the scheduled-task path)
    pub async fn execute_import(
        &self,
        session_id: &str,
        request: ImportOrdersRequest,
    ) -> Result<()> {
        let connections = match &request.connection_id {
            Some(id) => {
                let uuid =
                    Uuid::parse_str(id).map_err(|_| anyhow::anyhow!("Invalid connection_id"))?;
                let connection = a004_connection_mp::service::get_by_id(uuid)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;
                vec![connection]
            }
            None => a004_connection_mp::service::list_used().await?,
        };

        self.progress_tracker.create_session(session_id.to_string());
        for connection in &connections {
            self.progress_tracker.add_stage(
                session_id,
                connection.base.id.as_string(),
                connection.base.description.clone(),
            );
        }

        self.run_import(session_id, connections, request).await;
        Ok(())
    }

    /// One connection failing must not stop the others
    async fn run_import(
        &self,
        session_id: &str,
        connections: Vec<ConnectionMP>,
        request: ImportOrdersRequest,
    ) {
        let date_to = request.date_to.unwrap_or_else(Utc::now);
        let date_from = request.date_from.unwrap_or(date_to - Duration::hours(24));
        let mut had_errors = false;

        for connection in connections {
            let stage_key = connection.base.id.as_string();
            match self
                .import_connection(session_id, &stage_key, &connection, date_from, date_to)
                .await
            {
                Ok(_) => self.progress_tracker.complete_stage(session_id, &stage_key),
                Err(e) => {
                    had_errors = true;
                    tracing::error!(
                        "Order import for connection {} failed: {}",
                        connection.base.code,
                        e
                    );
                    self.progress_tracker.fail_stage(
                        session_id,
                        &stage_key,
                        format!("Order import failed: {}", e),
                    );
                }
            }
        }

        self.progress_tracker.complete_session(
            session_id,
            if had_errors {
                SessionStatus::CompletedWithErrors
            } else {
                SessionStatus::Completed
            },
        );
    }

    async fn import_connection(
        &self,
        session_id: &str,
        stage_key: &str,
        connection: &ConnectionMP,
        date_from: chrono::DateTime<Utc>,
        date_to: chrono::DateTime<Utc>,
    ) -> Result<()> {
        let marketplace_id = Uuid::parse_str(&connection.marketplace_ref)
            .map_err(|_| anyhow::anyhow!("Invalid marketplace reference"))?;
        let marketplace = a003_marketplace::service::get_by_id(marketplace_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Marketplace not found"))?;

        let fetched = marketplaces::fetch_new_orders(
            marketplace.marketplace_type,
            connection,
            date_from,
            date_to,
        )
        .await?;
        let total = fetched.len() as i32;
        tracing::info!(
            "Fetched {} orders from {} ({} .. {})",
            total,
            marketplace.base.code,
            date_from,
            date_to
        );

        let mut processed = 0;
        let mut inserted = 0;
        for order in fetched {
            self.progress_tracker.set_current_item(
                session_id,
                stage_key,
                Some(order.order_no.clone()),
            );

            // Dedupe on the (marketplace, order no) natural key
            let existing = a006_sales_order::repository::get_by_order_no(
                &connection.marketplace_ref,
                &order.order_no,
            )
            .await?;
            if existing.is_none() {
                self.insert_order(connection, &order).await?;
                inserted += 1;
            }

            processed += 1;
            self.progress_tracker.update_stage(
                session_id,
                stage_key,
                processed,
                Some(total),
                inserted,
                0,
            );
        }
        Ok(())
    }

    async fn insert_order(&self, connection: &ConnectionMP, fetched: &FetchedOrder) -> Result<()> {
        let mut order = SalesOrder::new_for_insert(
            format!("ORD-{}", fetched.order_no),
            format!("{} x{}", fetched.order_no, fetched.quantity),
            fetched.order_no.clone(),
            connection.marketplace_ref.clone(),
            connection.base.id.as_string(),
            fetched.ordered_at,
            fetched.quantity,
            fetched.unit_price,
            fetched.total_price,
            fetched.buyer_name.clone(),
            fetched.receiver_name.clone(),
            fetched.receiver_phone.clone(),
            fetched.receiver_address.clone(),
            fetched.receiver_zip.clone(),
        );

        // Map back to the listing that produced the sale, when we know it
        if let Some(listing) = a005_listing::service::get_by_marketplace_product_id(
            &order.connection_mp_ref,
            &fetched.marketplace_product_id,
        )
        .await?
        {
            order.listing_ref = Some(listing.to_string_id());
        }

        order
            .validate()
            .map_err(|e| anyhow::anyhow!("Order rejected: {}", e))?;
        order.before_write();
        a006_sales_order::repository::insert(&order).await?;
        Ok(())
    }
}
