use contracts::domain::a006_sales_order::aggregate::MarginSnapshot;
use contracts::domain::a009_margin_rule::aggregate::{MarginAction, MarginRule};

/// Platform commission for a given revenue
pub fn platform_fee(revenue: f64, fee_rate: f64) -> f64 {
    revenue * fee_rate
}

/// Compute the full margin breakdown for one order line.
///
/// margin_amount = revenue - platform_fee - cost - shipping_cost
/// margin_rate   = margin_amount / revenue (0 when revenue is 0)
pub fn breakdown(revenue: f64, fee_rate: f64, cost: f64, shipping_cost: f64) -> MarginSnapshot {
    let fee = platform_fee(revenue, fee_rate);
    let margin_amount = revenue - fee - cost - shipping_cost;
    let margin_rate = if revenue > 0.0 {
        margin_amount / revenue
    } else {
        0.0
    };
    MarginSnapshot {
        revenue,
        platform_fee: fee,
        cost,
        shipping_cost,
        margin_amount,
        margin_rate,
    }
}

/// Result of checking a margin breakdown against the effective rule
#[derive(Debug, Clone, PartialEq)]
pub enum MarginVerdict {
    Pass,
    Violation {
        action: MarginAction,
        reason: String,
    },
}

/// Check one breakdown against one rule
pub fn evaluate(snapshot: &MarginSnapshot, rule: &MarginRule) -> MarginVerdict {
    if snapshot.margin_rate < rule.min_margin_rate {
        return MarginVerdict::Violation {
            action: rule.action,
            reason: format!(
                "margin rate {:.4} below minimum {:.4} (rule {})",
                snapshot.margin_rate, rule.min_margin_rate, rule.base.code
            ),
        };
    }
    if snapshot.margin_amount < rule.min_profit_amount {
        return MarginVerdict::Violation {
            action: rule.action,
            reason: format!(
                "profit {:.0} KRW below minimum {:.0} KRW (rule {})",
                snapshot.margin_amount, rule.min_profit_amount, rule.base.code
            ),
        };
    }
    MarginVerdict::Pass
}

/// Pick the effective rule for a marketplace: an enabled marketplace-scoped
/// rule beats the global one, then the highest priority wins.
pub fn effective_rule<'a>(
    rules: &'a [MarginRule],
    marketplace_ref: &str,
) -> Option<&'a MarginRule> {
    rules
        .iter()
        .filter(|r| r.is_enabled)
        .filter(|r| match &r.marketplace_ref {
            Some(mp) => mp == marketplace_ref,
            None => true,
        })
        .max_by_key(|r| (r.marketplace_ref.is_some(), r.priority))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(
        code: &str,
        marketplace_ref: Option<&str>,
        min_rate: f64,
        min_profit: f64,
        action: MarginAction,
        priority: i32,
    ) -> MarginRule {
        MarginRule::new_for_insert(
            code.into(),
            code.into(),
            marketplace_ref.map(String::from),
            min_rate,
            min_profit,
            action,
            priority,
            None,
        )
    }

    #[test]
    fn breakdown_matches_formula() {
        // 50,000 KRW sale on a 10.8% channel, 30,000 cost, 3,000 shipping
        let b = breakdown(50_000.0, 0.108, 30_000.0, 3_000.0);
        assert!((b.platform_fee - 5_400.0).abs() < 1e-9);
        assert!((b.margin_amount - 11_600.0).abs() < 1e-9);
        assert!((b.margin_rate - 0.232).abs() < 1e-9);
    }

    #[test]
    fn zero_revenue_has_zero_rate() {
        let b = breakdown(0.0, 0.108, 1_000.0, 0.0);
        assert_eq!(b.margin_rate, 0.0);
        assert!(b.margin_amount < 0.0);
    }

    #[test]
    fn violation_on_low_rate() {
        let b = breakdown(10_000.0, 0.12, 8_500.0, 0.0);
        let r = rule("MR-1", None, 0.1, 0.0, MarginAction::Hold, 0);
        match evaluate(&b, &r) {
            MarginVerdict::Violation { action, .. } => assert_eq!(action, MarginAction::Hold),
            MarginVerdict::Pass => panic!("expected violation"),
        }
    }

    #[test]
    fn violation_on_low_absolute_profit() {
        // 23.2% margin but only 2,320 KRW of profit
        let b = breakdown(10_000.0, 0.108, 6_000.0, 600.0);
        let r = rule("MR-2", None, 0.1, 3_000.0, MarginAction::Reject, 0);
        match evaluate(&b, &r) {
            MarginVerdict::Violation { action, .. } => assert_eq!(action, MarginAction::Reject),
            MarginVerdict::Pass => panic!("expected violation"),
        }
    }

    #[test]
    fn pass_when_both_thresholds_met() {
        let b = breakdown(50_000.0, 0.055, 30_000.0, 2_500.0);
        let r = rule("MR-3", None, 0.1, 3_000.0, MarginAction::Hold, 0);
        assert_eq!(evaluate(&b, &r), MarginVerdict::Pass);
    }

    #[test]
    fn marketplace_rule_beats_global() {
        let rules = vec![
            rule("MR-GLOBAL", None, 0.05, 0.0, MarginAction::WarnOnly, 100),
            rule("MR-CP", Some("mp-1"), 0.15, 5_000.0, MarginAction::Hold, 0),
        ];
        let picked = effective_rule(&rules, "mp-1").unwrap();
        assert_eq!(picked.base.code, "MR-CP");
        // Other marketplaces fall back to the global rule
        let picked = effective_rule(&rules, "mp-2").unwrap();
        assert_eq!(picked.base.code, "MR-GLOBAL");
    }

    #[test]
    fn disabled_rules_are_ignored() {
        let mut r = rule("MR-OFF", None, 0.5, 0.0, MarginAction::Reject, 0);
        r.is_enabled = false;
        assert!(effective_rule(&[r], "mp-1").is_none());
    }

    #[test]
    fn priority_breaks_ties_within_scope() {
        let rules = vec![
            rule("MR-A", Some("mp-1"), 0.1, 0.0, MarginAction::Hold, 1),
            rule("MR-B", Some("mp-1"), 0.2, 0.0, MarginAction::Reject, 5),
        ];
        assert_eq!(effective_rule(&rules, "mp-1").unwrap().base.code, "MR-B");
    }
}
