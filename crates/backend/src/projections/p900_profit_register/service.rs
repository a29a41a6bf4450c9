use super::repository;
use contracts::projections::p900_profit_register::dto::{
    ProfitRegisterQuery, ProfitRegisterRow, ProfitStatsRow,
};
use std::collections::BTreeMap;

pub async fn list(query: &ProfitRegisterQuery) -> anyhow::Result<Vec<ProfitRegisterRow>> {
    repository::list(query).await
}

pub async fn post_row(row: &ProfitRegisterRow) -> anyhow::Result<()> {
    repository::upsert(row).await
}

pub async fn clear_settlement(settlement_ref: &str) -> anyhow::Result<u64> {
    repository::delete_by_settlement(settlement_ref).await
}

/// Register totals grouped by sale date
pub async fn stats_by_date(query: &ProfitRegisterQuery) -> anyhow::Result<Vec<ProfitStatsRow>> {
    let rows = repository::list(&ProfitRegisterQuery {
        limit: Some(u64::MAX),
        offset: None,
        ..query.clone()
    })
    .await?;
    Ok(fold_stats(rows, |r| r.sale_date.to_string()))
}

/// Register totals grouped by marketplace
pub async fn stats_by_marketplace(
    query: &ProfitRegisterQuery,
) -> anyhow::Result<Vec<ProfitStatsRow>> {
    let rows = repository::list(&ProfitRegisterQuery {
        limit: Some(u64::MAX),
        offset: None,
        ..query.clone()
    })
    .await?;
    Ok(fold_stats(rows, |r| r.marketplace_ref.clone()))
}

/// Render register rows as CSV for the settlement export endpoint
pub fn rows_to_csv(rows: &[ProfitRegisterRow]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "order_no",
        "sale_date",
        "quantity",
        "revenue",
        "platform_fee",
        "product_cost",
        "shipping_cost",
        "profit",
        "margin_rate",
    ])?;
    for row in rows {
        writer.write_record([
            row.marketplace_order_no.clone(),
            row.sale_date.to_string(),
            row.quantity.to_string(),
            format!("{:.0}", row.revenue),
            format!("{:.0}", row.platform_fee),
            format!("{:.0}", row.product_cost),
            format!("{:.0}", row.shipping_cost),
            format!("{:.0}", row.profit),
            format!("{:.4}", row.margin_rate),
        ])?;
    }
    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

fn fold_stats<F>(rows: Vec<ProfitRegisterRow>, bucket_of: F) -> Vec<ProfitStatsRow>
where
    F: Fn(&ProfitRegisterRow) -> String,
{
    let mut buckets: BTreeMap<String, ProfitStatsRow> = BTreeMap::new();
    for row in rows {
        let key = bucket_of(&row);
        let entry = buckets.entry(key.clone()).or_insert_with(|| ProfitStatsRow {
            bucket: key,
            order_count: 0,
            revenue: 0.0,
            platform_fee: 0.0,
            cost: 0.0,
            profit: 0.0,
        });
        entry.order_count += 1;
        entry.revenue += row.revenue;
        entry.platform_fee += row.platform_fee;
        entry.cost += row.product_cost + row.shipping_cost;
        entry.profit += row.profit;
    }
    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(mp: &str, no: &str, date: (i32, u32, u32), revenue: f64, profit: f64) -> ProfitRegisterRow {
        ProfitRegisterRow {
            marketplace_ref: mp.into(),
            marketplace_order_no: no.into(),
            registrar_ref: "order".into(),
            settlement_ref: "stl".into(),
            sale_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            quantity: 1,
            revenue,
            platform_fee: revenue * 0.1,
            product_cost: revenue - profit - revenue * 0.1,
            shipping_cost: 0.0,
            profit,
            margin_rate: if revenue > 0.0 { profit / revenue } else { 0.0 },
            posted_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn stats_fold_by_marketplace() {
        let rows = vec![
            row("mp-a", "1", (2025, 8, 1), 10_000.0, 2_000.0),
            row("mp-a", "2", (2025, 8, 2), 20_000.0, 3_000.0),
            row("mp-b", "3", (2025, 8, 1), 5_000.0, 500.0),
        ];
        let stats = fold_stats(rows, |r| r.marketplace_ref.clone());
        assert_eq!(stats.len(), 2);
        let a = stats.iter().find(|s| s.bucket == "mp-a").unwrap();
        assert_eq!(a.order_count, 2);
        assert_eq!(a.revenue, 30_000.0);
        assert_eq!(a.profit, 5_000.0);
    }

    #[test]
    fn csv_export_has_header_and_rows() {
        let rows = vec![row("mp-a", "1001", (2025, 8, 1), 10_000.0, 2_000.0)];
        let csv = rows_to_csv(&rows).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("order_no,sale_date"));
        let data = lines.next().unwrap();
        assert!(data.starts_with("1001,2025-08-01,1,10000"));
    }

    #[test]
    fn stats_fold_by_date_sorted() {
        let rows = vec![
            row("mp-a", "1", (2025, 8, 2), 10_000.0, 1_000.0),
            row("mp-a", "2", (2025, 8, 1), 10_000.0, 1_000.0),
        ];
        let stats = fold_stats(rows, |r| r.sale_date.to_string());
        assert_eq!(stats[0].bucket, "2025-08-01");
        assert_eq!(stats[1].bucket, "2025-08-02");
    }
}
