use crate::domain::{a003_marketplace, a006_sales_order, a008_settlement, a010_notification};
use crate::projections::p900_profit_register;
use crate::usecases::common::ProgressTracker;
use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use contracts::domain::a006_sales_order::aggregate::OrderStatus;
use contracts::domain::a008_settlement::aggregate::{Settlement, SettlementStatus};
use contracts::domain::a010_notification::aggregate::{NotificationLevel, NotificationTopic};
use contracts::domain::common::AggregateId;
use contracts::projections::p900_profit_register::dto::ProfitRegisterRow;
use contracts::usecases::common::progress::SessionStatus;
use contracts::usecases::common::response::{SessionStartResponse, SessionStartStatus};
use contracts::usecases::u505_run_settlement::SettlementRequest;
use std::sync::Arc;
use uuid::Uuid;

const STAGE_KEY: &str = "a008_settlement";

/// Executor for periodic settlement
#[derive(Clone)]
pub struct SettlementExecutor {
    progress_tracker: Arc<ProgressTracker>,
}

impl SettlementExecutor {
    pub fn new(progress_tracker: Arc<ProgressTracker>) -> Self {
        Self { progress_tracker }
    }

    pub async fn start_settlement(&self, request: SettlementRequest) -> Result<SessionStartResponse> {
        let marketplace_id = Uuid::parse_str(&request.marketplace_id)
            .map_err(|_| anyhow::anyhow!("Invalid marketplace_id"))?;
        let marketplace = a003_marketplace::service::get_by_id(marketplace_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Marketplace not found"))?;
        if request.period_from > request.period_to {
            anyhow::bail!("Settlement period start must not be after its end");
        }

        // Confirmed settlements are frozen
        let marketplace_ref = marketplace.base.id.as_string();
        if let Some(existing) = a008_settlement::service::get_by_period(
            &marketplace_ref,
            request.period_from,
            request.period_to,
        )
        .await?
        {
            if existing.status == SettlementStatus::Confirmed {
                anyhow::bail!(
                    "Settlement {} is confirmed and cannot be recomputed",
                    existing.base.code
                );
            }
        }

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker.create_session(session_id.clone());
        self.progress_tracker.add_stage(
            &session_id,
            STAGE_KEY.to_string(),
            format!(
                "Settlement {} {} .. {}",
                marketplace.base.description, request.period_from, request.period_to
            ),
        );

        let executor = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = executor
                .run_settlement(&session_id_clone, &marketplace_ref, &request)
                .await
            {
                tracing::error!("Settlement failed: {}", e);
                executor.progress_tracker.fail_stage(
                    &session_id_clone,
                    STAGE_KEY,
                    format!("Settlement failed: {}", e),
                );
                executor
                    .progress_tracker
                    .complete_session(&session_id_clone, SessionStatus::Failed);
            }
        });

        Ok(SessionStartResponse {
            session_id,
            status: SessionStartStatus::Started,
            message: "Settlement started".into(),
        })
    }

    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::common::progress::SessionProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Run a settlement inline under an externally supplied session id
    /// (the scheduled-task path)
    pub async fn execute_settlement(
        &self,
        session_id: &str,
        request: &SettlementRequest,
    ) -> Result<()> {
        let marketplace_id = Uuid::parse_str(&request.marketplace_id)
            .map_err(|_| anyhow::anyhow!("Invalid marketplace_id"))?;
        let marketplace = a003_marketplace::service::get_by_id(marketplace_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Marketplace not found"))?;
        let marketplace_ref = marketplace.base.id.as_string();

        self.progress_tracker.create_session(session_id.to_string());
        self.progress_tracker.add_stage(
            session_id,
            STAGE_KEY.to_string(),
            format!(
                "Settlement {} {} .. {}",
                marketplace.base.description, request.period_from, request.period_to
            ),
        );

        let result = self
            .run_settlement(session_id, &marketplace_ref, request)
            .await;
        if let Err(e) = &result {
            self.progress_tracker
                .fail_stage(session_id, STAGE_KEY, format!("Settlement failed: {}", e));
            self.progress_tracker
                .complete_session(session_id, SessionStatus::Failed);
        }
        result
    }

    async fn run_settlement(
        &self,
        session_id: &str,
        marketplace_ref: &str,
        request: &SettlementRequest,
    ) -> Result<()> {
        // Get or create the draft document for this period
        let mut settlement = match a008_settlement::service::get_by_period(
            marketplace_ref,
            request.period_from,
            request.period_to,
        )
        .await?
        {
            Some(existing) if existing.status == SettlementStatus::Confirmed => {
                anyhow::bail!(
                    "Settlement {} is confirmed and cannot be recomputed",
                    existing.base.code
                );
            }
            Some(existing) => existing,
            None => {
                let doc = Settlement::new_for_insert(
                    format!(
                        "STL-{}-{}",
                        request.period_from.format("%Y%m%d"),
                        request.period_to.format("%Y%m%d")
                    ),
                    format!(
                        "Settlement {} .. {}",
                        request.period_from, request.period_to
                    ),
                    marketplace_ref.to_string(),
                    request.period_from,
                    request.period_to,
                );
                let id = a008_settlement::service::create(doc).await?;
                a008_settlement::service::get_by_id(id)
                    .await?
                    .ok_or_else(|| anyhow::anyhow!("Settlement vanished after insert"))?
            }
        };
        let settlement_ref = settlement.to_string_id();

        // Draft recompute starts from a clean register slice
        p900_profit_register::service::clear_settlement(&settlement_ref).await?;

        let from = day_start(request.period_from)?;
        let to = day_start(next_day(request.period_to)?)?;
        let mut orders = a006_sales_order::repository::list_delivered_in_period(
            marketplace_ref,
            from,
            to,
        )
        .await?;

        let total = orders.len() as i32;
        let mut processed = 0;
        let mut order_count = 0;
        let mut gross_revenue = 0.0;
        let mut platform_fees = 0.0;
        let mut product_cost = 0.0;
        let mut shipping_cost = 0.0;

        for order in orders.iter_mut() {
            self.progress_tracker.set_current_item(
                session_id,
                STAGE_KEY,
                Some(order.marketplace_order_no.clone()),
            );

            let snapshot = order
                .margin_snapshot
                .clone()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "order {} has no margin snapshot",
                        order.marketplace_order_no
                    )
                })?;

            order_count += 1;
            gross_revenue += snapshot.revenue;
            platform_fees += snapshot.platform_fee;
            product_cost += snapshot.cost;
            shipping_cost += snapshot.shipping_cost;

            p900_profit_register::service::post_row(&ProfitRegisterRow {
                marketplace_ref: marketplace_ref.to_string(),
                marketplace_order_no: order.marketplace_order_no.clone(),
                registrar_ref: order.to_string_id(),
                settlement_ref: settlement_ref.clone(),
                sale_date: order.ordered_at.date_naive(),
                quantity: order.quantity,
                revenue: snapshot.revenue,
                platform_fee: snapshot.platform_fee,
                product_cost: snapshot.cost,
                shipping_cost: snapshot.shipping_cost,
                profit: snapshot.margin_amount,
                margin_rate: snapshot.margin_rate,
                posted_at: Utc::now(),
            })
            .await?;

            order
                .transition_to(OrderStatus::Settled, Some(settlement.base.code.clone()))
                .map_err(|e| anyhow::anyhow!("{}", e))?;
            a006_sales_order::service::save(order).await?;

            processed += 1;
            self.progress_tracker
                .update_stage(session_id, STAGE_KEY, processed, Some(total), processed, 0);
        }

        settlement.apply_totals(
            order_count,
            gross_revenue,
            platform_fees,
            product_cost,
            shipping_cost,
        );
        a008_settlement::service::save(&mut settlement).await?;

        let _ = a010_notification::service::notify(
            NotificationLevel::Info,
            NotificationTopic::SettlementReady,
            format!(
                "Settlement {} ready: {} orders, profit {:.0} KRW",
                settlement.base.code, order_count, settlement.net_profit
            ),
            Some(settlement_ref),
        )
        .await;

        self.progress_tracker.complete_stage(session_id, STAGE_KEY);
        self.progress_tracker
            .complete_session(session_id, SessionStatus::Completed);
        Ok(())
    }
}

fn day_start(date: NaiveDate) -> Result<chrono::DateTime<Utc>> {
    let naive = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn next_day(date: NaiveDate) -> Result<NaiveDate> {
    date.succ_opt()
        .ok_or_else(|| anyhow::anyhow!("date out of range"))
}
