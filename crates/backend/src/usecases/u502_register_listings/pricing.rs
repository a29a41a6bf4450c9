use anyhow::Result;

/// KRW prices are quoted in 10-won steps on every channel we register to
const PRICE_STEP: f64 = 10.0;

/// Sale price that achieves `target_margin_rate` after the platform takes
/// `fee_rate`, given wholesale cost and shipping.
///
/// Solving revenue*(1 - fee) - cost - shipping >= margin*revenue for revenue:
/// revenue >= (cost + shipping) / (1 - fee - margin), rounded up to the step.
pub fn sale_price_for_margin(
    cost: f64,
    shipping: f64,
    fee_rate: f64,
    target_margin_rate: f64,
) -> Result<f64> {
    let denominator = 1.0 - fee_rate - target_margin_rate;
    if denominator <= 0.0 {
        anyhow::bail!(
            "fee rate {:.3} plus target margin {:.3} leaves no room for a price",
            fee_rate,
            target_margin_rate
        );
    }
    if cost < 0.0 || shipping < 0.0 {
        anyhow::bail!("cost and shipping must not be negative");
    }
    let raw = (cost + shipping) / denominator;
    Ok(round_up_to_step(raw))
}

fn round_up_to_step(price: f64) -> f64 {
    (price / PRICE_STEP).ceil() * PRICE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::margin;

    #[test]
    fn price_reaches_target_margin() {
        // 30,000 cost + 2,500 shipping, 10.8% fee, 15% target
        let price = sale_price_for_margin(30_000.0, 2_500.0, 0.108, 0.15).unwrap();
        let b = margin::breakdown(price, 0.108, 30_000.0, 2_500.0);
        assert!(b.margin_rate >= 0.15);
        // One step lower must miss the target (the price is minimal)
        let b_lower = margin::breakdown(price - 10.0, 0.108, 30_000.0, 2_500.0);
        assert!(b_lower.margin_rate < 0.15);
    }

    #[test]
    fn price_is_rounded_to_ten_won() {
        let price = sale_price_for_margin(12_345.0, 0.0, 0.055, 0.1).unwrap();
        assert_eq!(price % 10.0, 0.0);
    }

    #[test]
    fn impossible_margin_is_rejected() {
        assert!(sale_price_for_margin(10_000.0, 0.0, 0.12, 0.9).is_err());
        assert!(sale_price_for_margin(10_000.0, 0.0, 0.5, 0.5).is_err());
    }

    #[test]
    fn free_item_prices_at_zero() {
        let price = sale_price_for_margin(0.0, 0.0, 0.108, 0.15).unwrap();
        assert_eq!(price, 0.0);
    }
}
