use super::pricing;
use crate::domain::{
    a002_supplier_product, a004_connection_mp, a005_listing, a009_margin_rule, a010_notification,
};
use crate::shared::llm::content::ContentGenerator;
use crate::shared::margin::{self, MarginVerdict};
use crate::shared::marketplaces::{self, RegisterProductRequest};
use crate::usecases::common::ProgressTracker;
use anyhow::Result;
use contracts::domain::a004_connection_mp::aggregate::ConnectionMP;
use contracts::domain::a005_listing::aggregate::{Listing, ListingStatus};
use contracts::domain::a009_margin_rule::aggregate::MarginAction;
use contracts::domain::a010_notification::aggregate::{NotificationLevel, NotificationTopic};
use contracts::domain::common::AggregateId;
use contracts::enums::marketplace_type::MarketplaceType;
use contracts::usecases::common::progress::SessionStatus;
use contracts::usecases::common::response::{SessionStartResponse, SessionStartStatus};
use contracts::usecases::u502_register_listings::RegisterRequest;
use std::sync::Arc;
use uuid::Uuid;

const STAGE_KEY: &str = "a005_listing";
const MAX_ATTEMPTS: u32 = 3;
const DEFAULT_TARGET_MARGIN: f64 = 0.15;

/// Executor for the listing registration batch
#[derive(Clone)]
pub struct RegisterExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl RegisterExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    pub async fn start_register(&self, request: RegisterRequest) -> Result<SessionStartResponse> {
        let connection_id = Uuid::parse_str(&request.connection_id)
            .map_err(|_| anyhow::anyhow!("Invalid connection_id"))?;
        let connection = a004_connection_mp::service::get_by_id(connection_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;
        if request.batch_size <= 0 {
            anyhow::bail!("Batch size must be positive");
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        self.progress_tracker.add_stage(
            &session_id,
            STAGE_KEY.to_string(),
            format!("Registration batch for {}", connection.base.description),
        );

        let executor = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = executor
                .run_register(&session_id_clone, &connection, &request)
                .await
            {
                tracing::error!("Registration batch failed: {}", e);
                executor.progress_tracker.fail_stage(
                    &session_id_clone,
                    STAGE_KEY,
                    format!("Registration batch failed: {}", e),
                );
                executor
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(SessionStartResponse {
            session_id,
            status: SessionStartStatus::Started,
            message: "Registration batch started".into(),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::common::progress::SessionProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Run a batch inline under an externally supplied session id
    /// (the registration scheduler path)
    pub async fn execute_register(
        &self,
        session_id: &str,
        request: &RegisterRequest,
    ) -> Result<()> {
        let connection_id = Uuid::parse_str(&request.connection_id)
            .map_err(|_| anyhow::anyhow!("Invalid connection_id"))?;
        let connection = a004_connection_mp::service::get_by_id(connection_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Connection not found"))?;

        self.progress_tracker.create_session(session_id.to_string());
        self.progress_tracker.add_stage(
            session_id,
            STAGE_KEY.to_string(),
            format!("Registration batch for {}", connection.base.description),
        );

        let result = self.run_register(session_id, &connection, request).await;
        if let Err(e) = &result {
            self.progress_tracker.fail_stage(
                session_id,
                STAGE_KEY,
                format!("Registration batch failed: {}", e),
            );
            self.progress_tracker
                .complete_session(session_id, SessionStatus::Failed);
        }
        result
    }

    async fn run_register(
        &self,
        session_id: &str,
        connection: &ConnectionMP,
        request: &RegisterRequest,
    ) -> Result<()> {
        let connection_ref = connection.base.id.as_string();
        let marketplace_type = marketplace_type_of(connection).await?;
        let fee_rate = a004_connection_mp::service::effective_fee_rate(connection).await?;
        let rules = a009_margin_rule::service::list_enabled().await?;
        let target_margin = request.target_margin_rate.unwrap_or(DEFAULT_TARGET_MARGIN);
        let generator = if request.generate_titles {
            ContentGenerator::from_config()
        } else {
            None
        };

        let batch =
            a005_listing::service::list_pending_for_connection(&connection_ref, request.batch_size as u64)
                .await?;
        let total = batch.len() as i32;
        tracing::info!(
            "Registration batch for connection {}: {} listings",
            connection.base.code,
            total
        );

        let mut processed = 0;
        let mut registered = 0;
        let mut failed = 0;

        for mut listing in batch {
            self.progress_tracker.set_current_item(
                session_id,
                STAGE_KEY,
                Some(listing.base.description.clone()),
            );

            match self
                .register_one(
                    &mut listing,
                    connection,
                    marketplace_type,
                    fee_rate,
                    target_margin,
                    &rules,
                    generator.as_ref(),
                )
                .await
            {
                Ok(true) => registered += 1,
                Ok(false) => failed += 1,
                Err(e) => {
                    failed += 1;
                    listing.retry_count += 1;
                    listing.mark_failed(e.to_string());
                    let _ = a005_listing::service::save(&mut listing).await;
                    self.progress_tracker.add_error(
                        session_id,
                        Some(STAGE_KEY.to_string()),
                        format!("Listing {} failed: {}", listing.base.code, e),
                        None,
                    );
                    let _ = a010_notification::service::notify(
                        NotificationLevel::Error,
                        NotificationTopic::RegistrationFailed,
                        format!("Registration of {} failed: {}", listing.base.description, e),
                        Some(listing.to_string_id()),
                    )
                    .await;
                }
            }

            processed += 1;
            self.progress_tracker.update_stage(
                session_id,
                STAGE_KEY,
                processed,
                Some(total),
                registered,
                0,
            );
        }

        self.progress_tracker.complete_stage(session_id, STAGE_KEY);
        self.progress_tracker.complete_session(
            session_id,
            if failed > 0 {
                SessionStatus::CompletedWithErrors
            } else {
                SessionStatus::Completed
            },
        );
        tracing::info!(
            "Registration batch finished: {} registered, {} failed",
            registered,
            failed
        );
        Ok(())
    }

    /// Price, gate and register one listing. Ok(false) = skipped by the
    /// margin gate; the listing keeps its pending state for later review.
    #[allow(clippy::too_many_arguments)]
    async fn register_one(
        &self,
        listing: &mut Listing,
        connection: &ConnectionMP,
        marketplace_type: MarketplaceType,
        fee_rate: f64,
        target_margin: f64,
        rules: &[contracts::domain::a009_margin_rule::aggregate::MarginRule],
        generator: Option<&ContentGenerator>,
    ) -> Result<bool> {
        let product_id = Uuid::parse_str(&listing.supplier_product_ref)
            .map_err(|_| anyhow::anyhow!("Invalid supplier product reference"))?;
        let product = a002_supplier_product::service::get_by_id(product_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Supplier product not found"))?;

        if product.stock <= 0 {
            listing.status = ListingStatus::Suspended;
            listing.failure_reason = Some("Supplier item is sold out".into());
            a005_listing::service::save(listing).await?;
            return Ok(false);
        }

        // Price unpriced listings from the target margin
        if listing.sale_price <= 0.0 {
            listing.sale_price = pricing::sale_price_for_margin(
                product.cost_price,
                product.shipping_fee,
                fee_rate,
                target_margin,
            )?;
        }

        let snapshot = margin::breakdown(
            listing.sale_price,
            fee_rate,
            product.cost_price,
            product.shipping_fee,
        );
        if let Some(rule) = margin::effective_rule(rules, &listing.marketplace_ref) {
            if let MarginVerdict::Violation { action, reason } = margin::evaluate(&snapshot, rule) {
                if action != MarginAction::WarnOnly {
                    listing.margin_snapshot = Some(snapshot);
                    listing.failure_reason = Some(reason.clone());
                    a005_listing::service::save(listing).await?;
                    let _ = a010_notification::service::notify(
                        NotificationLevel::Warning,
                        NotificationTopic::MarginViolation,
                        format!("Listing {} skipped: {}", listing.base.description, reason),
                        Some(listing.to_string_id()),
                    )
                    .await;
                    return Ok(false);
                }
                tracing::warn!("Listing {} registered despite: {}", listing.base.code, reason);
            }
        }
        listing.margin_snapshot = Some(snapshot);

        // Optional LLM title; registration survives a generation failure
        if listing.sale_title.is_none() {
            if let Some(generator) = generator {
                match generator
                    .generate_sale_title(&product.base.description, product.category.as_deref())
                    .await
                {
                    Ok(title) => listing.sale_title = Some(title),
                    Err(e) => tracing::warn!("Title generation failed: {}", e),
                }
            }
        }

        let register_request = RegisterProductRequest {
            title: listing
                .sale_title
                .clone()
                .unwrap_or_else(|| product.base.description.clone()),
            sale_price: listing.sale_price,
            stock: product.stock,
            detail_html: product.detail_html.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            seller_sku: listing.base.code.clone(),
        };

        // Per-item retry with exponential backoff
        let mut last_error = None;
        for attempt in 0..MAX_ATTEMPTS {
            if attempt > 0 {
                tokio::time::sleep(std::time::Duration::from_secs(1 << attempt)).await;
            }
            match marketplaces::register_product(marketplace_type, connection, &register_request)
                .await
            {
                Ok(registered) => {
                    listing.mark_registered(registered.marketplace_product_id);
                    a005_listing::service::save(listing).await?;
                    return Ok(true);
                }
                Err(e) => {
                    tracing::warn!(
                        "Registration attempt {}/{} for {} failed: {}",
                        attempt + 1,
                        MAX_ATTEMPTS,
                        listing.base.code,
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("registration failed")))
    }
}

async fn marketplace_type_of(connection: &ConnectionMP) -> Result<MarketplaceType> {
    let marketplace_id = Uuid::parse_str(&connection.marketplace_ref)
        .map_err(|_| anyhow::anyhow!("Invalid marketplace reference"))?;
    let marketplace = crate::domain::a003_marketplace::service::get_by_id(marketplace_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Marketplace not found"))?;
    Ok(marketplace.marketplace_type)
}
