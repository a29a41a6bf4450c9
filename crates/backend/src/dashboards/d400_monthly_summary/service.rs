use crate::domain::a003_marketplace;
use crate::projections::p900_profit_register::repository as p900_repository;
use contracts::dashboards::d400_monthly_summary::dto::{MonthlySummaryResponse, MonthlySummaryRow};
use contracts::projections::p900_profit_register::dto::ProfitRegisterRow;
use std::collections::BTreeMap;

/// Monthly revenue/cost/profit rollup over the profit register,
/// one row per (month, marketplace)
pub async fn monthly_summary() -> anyhow::Result<MonthlySummaryResponse> {
    let rows = p900_repository::list_all_rows().await?;
    let marketplaces = a003_marketplace::service::list_all().await?;
    let names: BTreeMap<String, String> = marketplaces
        .into_iter()
        .map(|m| (m.to_string_id(), m.base.description))
        .collect();

    let mut summary = fold_monthly(rows);
    for row in &mut summary {
        row.marketplace_name = names
            .get(&row.marketplace_ref)
            .cloned()
            .unwrap_or_else(|| row.marketplace_ref.clone());
    }

    let total_revenue = summary.iter().map(|r| r.revenue).sum();
    let total_profit = summary.iter().map(|r| r.profit).sum();
    Ok(MonthlySummaryResponse {
        rows: summary,
        total_revenue,
        total_profit,
    })
}

fn fold_monthly(rows: Vec<ProfitRegisterRow>) -> Vec<MonthlySummaryRow> {
    let mut buckets: BTreeMap<(String, String), MonthlySummaryRow> = BTreeMap::new();
    for row in rows {
        let month = row.sale_date.format("%Y-%m").to_string();
        let key = (month.clone(), row.marketplace_ref.clone());
        let entry = buckets.entry(key).or_insert_with(|| MonthlySummaryRow {
            month,
            marketplace_ref: row.marketplace_ref.clone(),
            marketplace_name: String::new(),
            order_count: 0,
            revenue: 0.0,
            platform_fees: 0.0,
            product_cost: 0.0,
            shipping_cost: 0.0,
            profit: 0.0,
            margin_rate: 0.0,
        });
        entry.order_count += 1;
        entry.revenue += row.revenue;
        entry.platform_fees += row.platform_fee;
        entry.product_cost += row.product_cost;
        entry.shipping_cost += row.shipping_cost;
        entry.profit += row.profit;
    }

    let mut result: Vec<MonthlySummaryRow> = buckets.into_values().collect();
    for row in &mut result {
        row.margin_rate = if row.revenue > 0.0 {
            row.profit / row.revenue
        } else {
            0.0
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(mp: &str, date: (i32, u32, u32), revenue: f64, profit: f64) -> ProfitRegisterRow {
        ProfitRegisterRow {
            marketplace_ref: mp.into(),
            marketplace_order_no: format!("{}-{}-{}-{}", mp, date.0, date.1, date.2),
            registrar_ref: "o".into(),
            settlement_ref: "s".into(),
            sale_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity: 1,
            revenue,
            platform_fee: 0.0,
            product_cost: revenue - profit,
            shipping_cost: 0.0,
            profit,
            margin_rate: 0.0,
            posted_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn groups_by_month_and_marketplace() {
        let rows = vec![
            row("mp-a", (2025, 7, 10), 10_000.0, 1_000.0),
            row("mp-a", (2025, 7, 20), 10_000.0, 1_000.0),
            row("mp-a", (2025, 8, 1), 10_000.0, 1_000.0),
            row("mp-b", (2025, 8, 1), 20_000.0, 4_000.0),
        ];
        let summary = fold_monthly(rows);
        assert_eq!(summary.len(), 3);
        let july = summary
            .iter()
            .find(|r| r.month == "2025-07" && r.marketplace_ref == "mp-a")
            .unwrap();
        assert_eq!(july.order_count, 2);
        assert_eq!(july.revenue, 20_000.0);
        assert!((july.margin_rate - 0.1).abs() < 1e-9);
    }
}
