use crate::domain::{a001_supplier, a002_supplier_product};
use crate::shared::suppliers;
use crate::usecases::common::ProgressTracker;
use anyhow::Result;
use contracts::domain::common::AggregateId;
use contracts::usecases::common::progress::SessionStatus;
use contracts::usecases::common::response::{SessionStartResponse, SessionStartStatus};
use contracts::usecases::u501_collect_from_supplier::CollectRequest;
use std::sync::Arc;
use uuid::Uuid;

const STAGE_KEY: &str = "a002_supplier_product";

/// Executor for supplier catalog collection
#[derive(Clone)]
pub struct CollectExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl CollectExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    /// Validate the request, start the collection in the background and
    /// return the session id for progress polling
    pub async fn start_collect(&self, request: CollectRequest) -> Result<SessionStartResponse> {
        let supplier_id = Uuid::parse_str(&request.supplier_id)
            .map_err(|_| anyhow::anyhow!("Invalid supplier_id"))?;

        let supplier = a001_supplier::service::get_by_id(supplier_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Supplier not found"))?;
        if !supplier.is_active {
            anyhow::bail!("Supplier {} is not active", supplier.base.code);
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        self.progress_tracker.add_stage(
            &session_id,
            STAGE_KEY.to_string(),
            format!("Catalog of {}", supplier.base.description),
        );

        let executor = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = executor
                .run_collect(&session_id_clone, &supplier, &request)
                .await
            {
                tracing::error!("Catalog collection failed: {}", e);
                executor.progress_tracker.fail_stage(
                    &session_id_clone,
                    STAGE_KEY,
                    format!("Collection failed: {}", e),
                );
                executor
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(SessionStartResponse {
            session_id,
            status: SessionStartStatus::Started,
            message: "Catalog collection started".into(),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::common::progress::SessionProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Run a collection inline under an externally supplied session id
    /// (the scheduled-task path)
    pub async fn execute_collect(&self, session_id: &str, request: &CollectRequest) -> Result<()> {
        let supplier_id = Uuid::parse_str(&request.supplier_id)
            .map_err(|_| anyhow::anyhow!("Invalid supplier_id"))?;
        let supplier = a001_supplier::service::get_by_id(supplier_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Supplier not found"))?;

        self.progress_tracker.create_session(session_id.to_string());
        self.progress_tracker.add_stage(
            session_id,
            STAGE_KEY.to_string(),
            format!("Catalog of {}", supplier.base.description),
        );

        let result = self.run_collect(session_id, &supplier, request).await;
        if let Err(e) = &result {
            self.progress_tracker
                .fail_stage(session_id, STAGE_KEY, format!("Collection failed: {}", e));
            self.progress_tracker
                .complete_session(session_id, SessionStatus::Failed);
        }
        result
    }

    async fn run_collect(
        &self,
        session_id: &str,
        supplier: &contracts::domain::a001_supplier::aggregate::Supplier,
        request: &CollectRequest,
    ) -> Result<()> {
        tracing::info!(
            "Starting catalog collection for supplier {} (session {})",
            supplier.base.code,
            session_id
        );
        let started_at = chrono::Utc::now();
        let supplier_ref = supplier.base.id.as_string();

        let items = suppliers::collect_catalog(
            supplier,
            request.category.as_deref(),
            request.max_items,
        )
        .await?;
        let total = items.len() as i32;

        let mut processed = 0;
        let mut inserted = 0;
        let mut updated = 0;
        let mut had_errors = false;

        for item in &items {
            self.progress_tracker
                .set_current_item(session_id, STAGE_KEY, Some(item.name.clone()));

            match a002_supplier_product::service::upsert_collected(
                &supplier_ref,
                supplier.default_shipping_fee,
                item,
            )
            .await
            {
                Ok(a002_supplier_product::service::UpsertOutcome::Inserted) => inserted += 1,
                Ok(a002_supplier_product::service::UpsertOutcome::Updated) => updated += 1,
                Err(e) => {
                    had_errors = true;
                    self.progress_tracker.add_error(
                        session_id,
                        Some(STAGE_KEY.to_string()),
                        format!("Item {} rejected: {}", item.sku, e),
                        None,
                    );
                }
            }

            processed += 1;
            if processed % 50 == 0 || processed == total {
                self.progress_tracker.update_stage(
                    session_id,
                    STAGE_KEY,
                    processed,
                    Some(total),
                    inserted,
                    updated,
                );
            }
        }

        // Items the supplier no longer lists are gone from this run
        if request.mark_missing_soldout && request.category.is_none() && request.max_items.is_none()
        {
            let stale = a002_supplier_product::service::mark_stale_soldout(&supplier_ref, started_at)
                .await?;
            if stale > 0 {
                tracing::info!(
                    "Marked {} items of supplier {} as soldout",
                    stale,
                    supplier.base.code
                );
            }
        }

        self.progress_tracker.complete_stage(session_id, STAGE_KEY);
        self.progress_tracker.complete_session(
            session_id,
            if had_errors {
                SessionStatus::CompletedWithErrors
            } else {
                SessionStatus::Completed
            },
        );
        tracing::info!(
            "Catalog collection finished for supplier {}: {} processed, {} inserted, {} updated",
            supplier.base.code,
            processed,
            inserted,
            updated
        );
        Ok(())
    }
}
