use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use contracts::system::tasks::aggregate::ScheduledTask;
use contracts::usecases::u501_collect_from_supplier::CollectRequest;
use contracts::usecases::u502_register_listings::RegisterRequest;
use contracts::usecases::u503_import_orders::ImportOrdersRequest;
use contracts::usecases::u504_process_orders::ProcessOrdersRequest;
use contracts::usecases::u505_run_settlement::SettlementRequest;
use serde::Deserialize;
use std::sync::Arc;

use super::logger::TaskLogger;
use super::manager::TaskManager;
use crate::usecases::u501_collect_from_supplier::CollectExecutor;
use crate::usecases::u502_register_listings::RegisterExecutor;
use crate::usecases::u503_import_orders::ImportOrdersExecutor;
use crate::usecases::u504_process_orders::ProcessOrdersExecutor;
use crate::usecases::u505_run_settlement::SettlementExecutor;

// ============================================================================
// u501: supplier catalog sync
// ============================================================================

pub struct CollectCatalogManager {
    executor: Arc<CollectExecutor>,
}

impl CollectCatalogManager {
    pub fn new(executor: Arc<CollectExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl TaskManager for CollectCatalogManager {
    fn task_type(&self) -> &'static str {
        "u501_collect_catalog"
    }

    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<TaskLogger>,
    ) -> Result<()> {
        logger.log(session_id, "Starting supplier catalog sync...");
        let config: CollectRequest = serde_json::from_str(&task.config_json)?;
        self.executor.execute_collect(session_id, &config).await?;
        logger.log(session_id, "Supplier catalog sync completed.");
        Ok(())
    }
}

// ============================================================================
// u502: registration scheduler
// ============================================================================

pub struct RegisterListingsManager {
    executor: Arc<RegisterExecutor>,
}

impl RegisterListingsManager {
    pub fn new(executor: Arc<RegisterExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl TaskManager for RegisterListingsManager {
    fn task_type(&self) -> &'static str {
        "u502_register_listings"
    }

    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<TaskLogger>,
    ) -> Result<()> {
        logger.log(session_id, "Starting registration batch...");
        let config: RegisterRequest = serde_json::from_str(&task.config_json)?;
        self.executor.execute_register(session_id, &config).await?;
        logger.log(session_id, "Registration batch completed.");
        Ok(())
    }
}

// ============================================================================
// u503: order import
// ============================================================================

pub struct ImportOrdersManager {
    executor: Arc<ImportOrdersExecutor>,
}

impl ImportOrdersManager {
    pub fn new(executor: Arc<ImportOrdersExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl TaskManager for ImportOrdersManager {
    fn task_type(&self) -> &'static str {
        "u503_import_orders"
    }

    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<TaskLogger>,
    ) -> Result<()> {
        logger.log(session_id, "Starting order import...");
        let config: ImportOrdersRequest = if task.config_json.trim().is_empty() {
            ImportOrdersRequest {
                connection_id: None,
                date_from: None,
                date_to: None,
            }
        } else {
            serde_json::from_str(&task.config_json)?
        };
        self.executor.execute_import(session_id, config).await?;
        logger.log(session_id, "Order import completed.");
        Ok(())
    }
}

// ============================================================================
// u504: order pipeline
// ============================================================================

pub struct ProcessOrdersManager {
    executor: Arc<ProcessOrdersExecutor>,
}

impl ProcessOrdersManager {
    pub fn new(executor: Arc<ProcessOrdersExecutor>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl TaskManager for ProcessOrdersManager {
    fn task_type(&self) -> &'static str {
        "u504_process_orders"
    }

    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<TaskLogger>,
    ) -> Result<()> {
        logger.log(session_id, "Starting order pipeline...");
        let config: ProcessOrdersRequest = if task.config_json.trim().is_empty() {
            ProcessOrdersRequest::default()
        } else {
            serde_json::from_str(&task.config_json)?
        };
        self.executor.execute_process(session_id, &config).await?;
        logger.log(session_id, "Order pipeline completed.");
        Ok(())
    }
}

// ============================================================================
// u505: monthly settlement
// ============================================================================

/// Task config: which marketplace to settle. The period is always the
/// previous calendar month at run time.
#[derive(Debug, Deserialize)]
struct SettlementTaskConfig {
    marketplace_id: String,
}

pub struct RunSettlementManager {
    executor: Arc<SettlementExecutor>,
}

impl RunSettlementManager {
    pub fn new(executor: Arc<SettlementExecutor>) -> Self {
        Self { executor }
    }
}

/// First and last day of the month before `today`
pub fn previous_month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first_of_current = today.with_day(1).unwrap_or(today);
    let last_of_previous = first_of_current.pred_opt().unwrap_or(first_of_current);
    let first_of_previous = last_of_previous.with_day(1).unwrap_or(last_of_previous);
    (first_of_previous, last_of_previous)
}

#[async_trait]
impl TaskManager for RunSettlementManager {
    fn task_type(&self) -> &'static str {
        "u505_run_settlement"
    }

    async fn run(
        &self,
        task: &ScheduledTask,
        session_id: &str,
        logger: Arc<TaskLogger>,
    ) -> Result<()> {
        let config: SettlementTaskConfig = serde_json::from_str(&task.config_json)?;
        let (period_from, period_to) = previous_month_bounds(Utc::now().date_naive());
        logger.log(
            session_id,
            &format!("Starting settlement {} .. {}...", period_from, period_to),
        );

        let request = SettlementRequest {
            marketplace_id: config.marketplace_id,
            period_from,
            period_to,
        };
        self.executor
            .execute_settlement(session_id, &request)
            .await?;
        logger.log(session_id, "Settlement completed.");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn previous_month_of_mid_august() {
        let (from, to) = previous_month_bounds(NaiveDate::from_ymd_opt(2025, 8, 5).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2025, 7, 31).unwrap());
    }

    #[test]
    fn previous_month_across_year_boundary() {
        let (from, to) = previous_month_bounds(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }
}
