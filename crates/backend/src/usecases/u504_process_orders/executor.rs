use super::validator::{self, ValidationOutcome};
use crate::domain::{
    a001_supplier, a002_supplier_product, a003_marketplace, a004_connection_mp, a005_listing,
    a006_sales_order, a007_purchase_order, a009_margin_rule, a010_notification,
};
use crate::shared::margin::{self, MarginVerdict};
use crate::shared::marketplaces::{self, ShipNotice};
use crate::shared::suppliers::{self, ReceiverInfo, SupplierOrderStatus};
use crate::usecases::common::ProgressTracker;
use anyhow::Result;
use contracts::domain::a002_supplier_product::aggregate::SupplierProduct;
use contracts::domain::a005_listing::aggregate::Listing;
use contracts::domain::a006_sales_order::aggregate::{OrderStatus, SalesOrder};
use contracts::domain::a007_purchase_order::aggregate::{PurchaseOrder, PurchaseOrderStatus};
use contracts::domain::a009_margin_rule::aggregate::MarginAction;
use contracts::domain::a010_notification::aggregate::{NotificationLevel, NotificationTopic};
use contracts::domain::common::AggregateId;
use contracts::usecases::common::progress::SessionStatus;
use contracts::usecases::common::response::{SessionStartResponse, SessionStartStatus};
use contracts::usecases::u504_process_orders::ProcessOrdersRequest;
use std::sync::Arc;
use uuid::Uuid;

const STAGE_PIPELINE: &str = "pipeline";
const STAGE_TRACKING: &str = "tracking";
const MAX_PLACEMENT_ATTEMPTS: u32 = 3;

/// Executor for the order automation pipeline: walks every actionable order
/// through validation, the margin gate, supplier purchase and tracking.
#[derive(Clone)]
pub struct ProcessOrdersExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl ProcessOrdersExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    pub async fn start_process(&self, request: ProcessOrdersRequest) -> Result<SessionStartResponse> {
        if let Some(order_id) = &request.order_id {
            Uuid::parse_str(order_id).map_err(|_| anyhow::anyhow!("Invalid order_id"))?;
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        self.progress_tracker.add_stage(
            &session_id,
            STAGE_PIPELINE.to_string(),
            "Order pipeline".to_string(),
        );
        if request.sync_tracking {
            self.progress_tracker.add_stage(
                &session_id,
                STAGE_TRACKING.to_string(),
                "Tracking sync".to_string(),
            );
        }

        let executor = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = executor.run(&session_id_clone, &request).await {
                tracing::error!("Order processing failed: {}", e);
                executor.progress_tracker.add_error(
                    &session_id_clone,
                    None,
                    format!("Order processing failed: {}", e),
                    None,
                );
                executor
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(SessionStartResponse {
            session_id,
            status: SessionStartStatus::Started,
            message: "Order processing started".into(),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::common::progress::SessionProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Run the pipeline inline under an externally supplied session id
    /// (the scheduled-task path)
    pub async fn execute_process(
        &self,
        session_id: &str,
        request: &ProcessOrdersRequest,
    ) -> Result<()> {
        self.progress_tracker.create_session(session_id.to_string());
        self.progress_tracker.add_stage(
            session_id,
            STAGE_PIPELINE.to_string(),
            "Order pipeline".to_string(),
        );
        if request.sync_tracking {
            self.progress_tracker.add_stage(
                session_id,
                STAGE_TRACKING.to_string(),
                "Tracking sync".to_string(),
            );
        }

        let result = self.run(session_id, request).await;
        if let Err(e) = &result {
            self.progress_tracker.add_error(
                session_id,
                None,
                format!("Order processing failed: {}", e),
                None,
            );
            self.progress_tracker
                .complete_session(session_id, SessionStatus::Failed);
        }
        result
    }

    async fn run(&self, session_id: &str, request: &ProcessOrdersRequest) -> Result<()> {
        let orders = match &request.order_id {
            Some(order_id) => {
                let id = Uuid::parse_str(order_id)?;
                a006_sales_order::service::get_by_id(id)
                    .await?
                    .into_iter()
                    .collect()
            }
            None => {
                a006_sales_order::repository::list_by_statuses(&[
                    OrderStatus::Received,
                    OrderStatus::Validated,
                    OrderStatus::Confirmed,
                ])
                .await?
            }
        };

        let total = orders.len() as i32;
        let mut processed = 0;
        let mut had_errors = false;

        for mut order in orders {
            self.progress_tracker.set_current_item(
                session_id,
                STAGE_PIPELINE,
                Some(order.marketplace_order_no.clone()),
            );

            if let Err(e) = self.advance_order(&mut order).await {
                had_errors = true;
                tracing::error!(
                    "Order {} stopped at {}: {}",
                    order.marketplace_order_no,
                    order.status,
                    e
                );
                self.progress_tracker.add_error(
                    session_id,
                    Some(STAGE_PIPELINE.to_string()),
                    format!("Order {}: {}", order.marketplace_order_no, e),
                    None,
                );
            }

            processed += 1;
            self.progress_tracker
                .update_stage(session_id, STAGE_PIPELINE, processed, Some(total), 0, 0);
        }
        self.progress_tracker.complete_stage(session_id, STAGE_PIPELINE);

        if request.sync_tracking {
            if let Err(e) = self.sync_tracking(session_id).await {
                had_errors = true;
                self.progress_tracker.fail_stage(
                    session_id,
                    STAGE_TRACKING,
                    format!("Tracking sync failed: {}", e),
                );
            } else {
                self.progress_tracker.complete_stage(session_id, STAGE_TRACKING);
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
        Ok(())
    }

    /// Drive one order as far as it can go in this run
    async fn advance_order(&self, order: &mut SalesOrder) -> Result<()> {
        if order.status == OrderStatus::Received {
            self.validate(order).await?;
        }
        if order.status == OrderStatus::Validated {
            self.margin_gate(order).await?;
        }
        if order.status == OrderStatus::Confirmed {
            self.purchase(order).await?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 1: validation
    // ------------------------------------------------------------------

    async fn validate(&self, order: &mut SalesOrder) -> Result<()> {
        match validator::validate_order(order).await? {
            ValidationOutcome::Ok => {
                order
                    .transition_to(OrderStatus::Validated, None)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                a006_sales_order::service::save(order).await
            }
            ValidationOutcome::Rejected(reasons) => {
                let reason = reasons.join("; ");
                order.record_failure(reason.clone());
                order
                    .transition_to(OrderStatus::Failed, Some(reason.clone()))
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                a006_sales_order::service::save(order).await?;
                let _ = a010_notification::service::notify(
                    NotificationLevel::Error,
                    NotificationTopic::OrderFailed,
                    format!(
                        "Order {} failed validation: {}",
                        order.marketplace_order_no, reason
                    ),
                    Some(order.to_string_id()),
                )
                .await;
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Step 2: margin protection gate
    // ------------------------------------------------------------------

    async fn margin_gate(&self, order: &mut SalesOrder) -> Result<()> {
        let (_, product) = self.resolve_listing_product(order).await?;

        let connection_id = Uuid::parse_str(&order.connection_mp_ref)
            .map_err(|_| anyhow::anyhow!("Invalid connection reference"))?;
        let connection = a004_connection_mp::service::get_by_id(connection_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;
        let fee_rate = a004_connection_mp::service::effective_fee_rate(&connection).await?;

        let quantity = order.quantity as f64;
        let snapshot = margin::breakdown(
            order.total_price,
            fee_rate,
            product.cost_price * quantity,
            product.shipping_fee,
        );
        order.margin_snapshot = Some(snapshot.clone());

        let rules = a009_margin_rule::service::list_enabled().await?;
        let verdict = match margin::effective_rule(&rules, &order.marketplace_ref) {
            Some(rule) => margin::evaluate(&snapshot, rule),
            None => MarginVerdict::Pass,
        };

        match verdict {
            MarginVerdict::Pass => {
                order
                    .transition_to(OrderStatus::Confirmed, None)
                    .map_err(|e| anyhow::anyhow!("{}", e))?;
                a006_sales_order::service::save(order).await
            }
            MarginVerdict::Violation { action, reason } => {
                match action {
                    MarginAction::Hold => {
                        order
                            .transition_to(OrderStatus::MarginHold, Some(reason.clone()))
                            .map_err(|e| anyhow::anyhow!("{}", e))?;
                        a006_sales_order::service::save(order).await?;
                        let _ = a010_notification::service::notify(
                            NotificationLevel::Warning,
                            NotificationTopic::MarginViolation,
                            format!("Order {} held: {}", order.marketplace_order_no, reason),
                            Some(order.to_string_id()),
                        )
                        .await;
                    }
                    MarginAction::Reject => {
                        order
                            .transition_to(OrderStatus::Cancelled, Some(reason.clone()))
                            .map_err(|e| anyhow::anyhow!("{}", e))?;
                        a006_sales_order::service::save(order).await?;
                        let _ = a010_notification::service::notify(
                            NotificationLevel::Warning,
                            NotificationTopic::MarginViolation,
                            format!("Order {} rejected: {}", order.marketplace_order_no, reason),
                            Some(order.to_string_id()),
                        )
                        .await;
                    }
                    MarginAction::WarnOnly => {
                        tracing::warn!(
                            "Order {} below margin threshold: {}",
                            order.marketplace_order_no,
                            reason
                        );
                        order
                            .transition_to(OrderStatus::Confirmed, Some(reason))
                            .map_err(|e| anyhow::anyhow!("{}", e))?;
                        a006_sales_order::service::save(order).await?;
                    }
                }
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Step 3: supplier purchase with retry
    // ------------------------------------------------------------------

    async fn purchase(&self, order: &mut SalesOrder) -> Result<()> {
        let (_, product) = self.resolve_listing_product(order).await?;
        let supplier_id = Uuid::parse_str(&product.supplier_ref)
            .map_err(|_| anyhow::anyhow!("Invalid supplier reference"))?;
        let supplier = a001_supplier::service::get_by_id(supplier_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Supplier not found"))?;

        // Stockout branch: cancel and notify, the buyer must be refunded
        let stock = suppliers::check_stock(&supplier, &product.supplier_sku).await?;
        if stock < order.quantity {
            let reason = format!(
                "supplier stock {} below ordered quantity {}",
                stock, order.quantity
            );
            order
                .transition_to(OrderStatus::Cancelled, Some(reason.clone()))
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            a006_sales_order::service::save(order).await?;
            let _ = a010_notification::service::notify(
                NotificationLevel::Error,
                NotificationTopic::Stockout,
                format!("Order {} cancelled: {}", order.marketplace_order_no, reason),
                Some(order.to_string_id()),
            )
            .await;
            return Ok(());
        }

        order
            .transition_to(OrderStatus::Purchasing, None)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        a006_sales_order::service::save(order).await?;

        let mut purchase = match a007_purchase_order::service::get_by_sales_order(
            &order.to_string_id(),
        )
        .await?
        {
            Some(existing) => existing,
            None => {
                let purchase = PurchaseOrder::new_for_insert(
                    format!("PO-{}", order.marketplace_order_no),
                    format!("Purchase for {}", order.marketplace_order_no),
                    order.to_string_id(),
                    supplier.base.id.as_string(),
                    product.to_string_id(),
                    order.quantity,
                    product.cost_price * order.quantity as f64,
                    product.shipping_fee,
                );
                let id = a007_purchase_order::service::create(purchase).await?;
                a007_purchase_order::service::get_by_id(id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Purchase order vanished after insert"))?
            }
        };

        let receiver = ReceiverInfo {
            name: order.receiver_name.clone(),
            phone: order.receiver_phone.clone(),
            address: order.receiver_address.clone(),
            zip: order.receiver_zip.clone(),
        };

        // Exponential backoff: 1s, 2s, 4s between attempts
        let mut last_error = None;
        for attempt in 0..MAX_PLACEMENT_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(std::time::Duration::from_secs(1 << attempt)).await;
            }
            purchase.attempt_count += 1;

            match suppliers::place_order(&supplier, &product.supplier_sku, order.quantity, &receiver)
                .await
            {
                Ok(placed) => {
                    purchase.mark_placed(placed.supplier_order_no);
                    a007_purchase_order::service::save(&mut purchase).await?;
                    order
                        .transition_to(OrderStatus::Purchased, None)
                        .map_err(|e| anyhow::anyhow!("{}", e))?;
                    return a006_sales_order::service::save(order).await;
                }
                Err(e) => {
                    tracing::warn!(
                        "Placement attempt {}/{} for order {} failed: {}",
                        attempt + 1,
                        MAX_PLACEMENT_ATTEMPTS,
                        order.marketplace_order_no,
                        e
                    );
                    last_error = Some(e.to_string());
                }
            }
        }

        // Retries exhausted
        let reason = last_error.unwrap_or_else(|| "placement failed".into());
        purchase.status = PurchaseOrderStatus::Failed;
        purchase.failure_reason = Some(reason.clone());
        a007_purchase_order::service::save(&mut purchase).await?;

        order.record_failure(reason.clone());
        order
            .transition_to(OrderStatus::Failed, Some(reason.clone()))
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        a006_sales_order::service::save(order).await?;
        let _ = a010_notification::service::notify(
            NotificationLevel::Error,
            NotificationTopic::OrderFailed,
            format!(
                "Order {} failed after {} placement attempts: {}",
                order.marketplace_order_no, MAX_PLACEMENT_ATTEMPTS, reason
            ),
            Some(order.to_string_id()),
        )
        .await;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Step 4: tracking sync
    // ------------------------------------------------------------------

    /// Poll suppliers for every purchase order still in transit, push ship
    /// notices to the marketplace and move delivered orders forward
    async fn sync_tracking(&self, session_id: &str) -> Result<()> {
        let in_transit = a007_purchase_order::service::list_in_transit().await?;
        let total = in_transit.len() as i32;
        let mut processed = 0;

        for mut purchase in in_transit {
            processed += 1;
            self.progress_tracker
                .update_stage(session_id, STAGE_TRACKING, processed, Some(total), 0, 0);

            let Some(supplier_order_no) = purchase.supplier_order_no.clone() else {
                continue;
            };
            let supplier_id = match Uuid::parse_str(&purchase.supplier_ref) {
                Ok(id) => id,
                Err(_) => continue,
            };
            let Some(supplier) = a001_supplier::service::get_by_id(supplier_id).await? else {
                continue;
            };

            let tracking = match suppliers::fetch_tracking(&supplier, &supplier_order_no).await {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(
                        "Tracking poll for purchase {} failed: {}",
                        purchase.base.code,
                        e
                    );
                    continue;
                }
            };

            match tracking.status {
                SupplierOrderStatus::Shipped => {
                    if purchase.status == PurchaseOrderStatus::Placed {
                        if let Some(tracking_no) = tracking.tracking_no.clone() {
                            purchase.mark_shipped(tracking.carrier.clone(), tracking_no);
                            a007_purchase_order::service::save(&mut purchase).await?;
                            self.mark_order_shipped(&purchase).await?;
                        }
                    }
                }
                SupplierOrderStatus::Delivered => {
                    // A delivery seen without a prior shipped poll still
                    // needs the ship notice first
                    if purchase.status == PurchaseOrderStatus::Placed {
                        if let Some(tracking_no) = tracking.tracking_no.clone() {
                            purchase.mark_shipped(tracking.carrier.clone(), tracking_no);
                            self.mark_order_shipped(&purchase).await?;
                        }
                    }
                    purchase.status = PurchaseOrderStatus::Delivered;
                    a007_purchase_order::service::save(&mut purchase).await?;
                    self.mark_order_delivered(&purchase).await?;
                }
                SupplierOrderStatus::Cancelled => {
                    purchase.status = PurchaseOrderStatus::Cancelled;
                    a007_purchase_order::service::save(&mut purchase).await?;
                    let _ = a010_notification::service::notify(
                        NotificationLevel::Error,
                        NotificationTopic::OrderFailed,
                        format!("Supplier cancelled purchase {}", purchase.base.code),
                        Some(purchase.to_string_id()),
                    )
                    .await;
                }
                SupplierOrderStatus::Accepted => {}
            }
        }
        Ok(())
    }

    async fn mark_order_shipped(&self, purchase: &PurchaseOrder) -> Result<()> {
        let order_id = Uuid::parse_str(&purchase.sales_order_ref)?;
        let Some(mut order) = a006_sales_order::service::get_by_id(order_id).await? else {
            return Ok(());
        };
        if order.status != OrderStatus::Purchased {
            return Ok(());
        }

        // Push the tracking number to the sales channel before flipping state
        let connection_id = Uuid::parse_str(&order.connection_mp_ref)?;
        if let Some(connection) = a004_connection_mp::service::get_by_id(connection_id).await? {
            let marketplace_id = Uuid::parse_str(&connection.marketplace_ref)?;
            if let Some(marketplace) =
                a003_marketplace::service::get_by_id(marketplace_id).await?
            {
                if let Some(tracking_no) = purchase.tracking_no.clone() {
                    let notice = ShipNotice {
                        order_no: order.marketplace_order_no.clone(),
                        carrier: purchase.tracking_carrier.clone(),
                        tracking_no,
                    };
                    if let Err(e) = marketplaces::send_ship_notice(
                        marketplace.marketplace_type,
                        &connection,
                        &notice,
                    )
                    .await
                    {
                        tracing::warn!(
                            "Ship notice for order {} failed: {}",
                            order.marketplace_order_no,
                            e
                        );
                    }
                }
            }
        }

        order
            .transition_to(OrderStatus::Shipped, None)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        a006_sales_order::service::save(&mut order).await
    }

    async fn mark_order_delivered(&self, purchase: &PurchaseOrder) -> Result<()> {
        let order_id = Uuid::parse_str(&purchase.sales_order_ref)?;
        let Some(mut order) = a006_sales_order::service::get_by_id(order_id).await? else {
            return Ok(());
        };
        if order.status != OrderStatus::Shipped {
            return Ok(());
        }
        order
            .transition_to(OrderStatus::Delivered, None)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        a006_sales_order::service::save(&mut order).await
    }

    async fn resolve_listing_product(
        &self,
        order: &SalesOrder,
    ) -> Result<(Listing, SupplierProduct)> {
        let listing_ref = order
            .listing_ref
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("Order is not mapped to a listing"))?;
        let listing_id = Uuid::parse_str(listing_ref)
            .map_err(|_| anyhow::anyhow!("Invalid listing reference"))?;
        let listing = a005_listing::service::get_by_id(listing_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Listing not found"))?;
        let product_id = Uuid::parse_str(&listing.supplier_product_ref)
            .map_err(|_| anyhow::anyhow!("Invalid supplier product reference"))?;
        let product = a002_supplier_product::service::get_by_id(product_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Supplier product not found"))?;
        Ok((listing, product))
    }
}
