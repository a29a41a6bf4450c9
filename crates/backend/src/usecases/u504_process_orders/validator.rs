use crate::domain::{a002_supplier_product, a005_listing};
use anyhow::Result;
use contracts::domain::a006_sales_order::aggregate::SalesOrder;
use uuid::Uuid;

/// What the validation gate decided for one order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    /// Order data or mapping is unusable; the reasons say why
    Rejected(Vec<String>),
}

/// Field-level checks that need no database access
pub fn check_fields(order: &SalesOrder) -> Vec<String> {
    let mut reasons = Vec::new();

    if order.quantity <= 0 {
        reasons.push("quantity must be positive".into());
    }
    if order.total_price <= 0.0 {
        reasons.push("total price must be positive".into());
    }
    if order.receiver_name.trim().is_empty() {
        reasons.push("receiver name is missing".into());
    }
    if order.receiver_phone.trim().is_empty() {
        reasons.push("receiver phone is missing".into());
    }
    if order.receiver_address.trim().len() < 5 {
        reasons.push("receiver address is missing or too short".into());
    }
    reasons
}

/// Full validation gate: field checks plus listing and supplier mapping.
/// An order we cannot map to a supplier product cannot be dropshipped.
pub async fn validate_order(order: &SalesOrder) -> Result<ValidationOutcome> {
    let mut reasons = check_fields(order);

    match &order.listing_ref {
        None => reasons.push("order is not mapped to a listing".into()),
        Some(listing_ref) => {
            let listing_id = Uuid::parse_str(listing_ref)
                .map_err(|_| anyhow::anyhow!("Invalid listing reference"))?;
            match a005_listing::service::get_by_id(listing_id).await? {
                None => reasons.push("mapped listing no longer exists".into()),
                Some(listing) => {
                    let product_id = Uuid::parse_str(&listing.supplier_product_ref)
                        .map_err(|_| anyhow::anyhow!("Invalid supplier product reference"))?;
                    if a002_supplier_product::service::get_by_id(product_id)
                        .await?
                        .is_none()
                    {
                        reasons.push("supplier product behind the listing is gone".into());
                    }
                }
            }
        }
    }

    if reasons.is_empty() {
        Ok(ValidationOutcome::Ok)
    } else {
        Ok(ValidationOutcome::Rejected(reasons))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> SalesOrder {
        SalesOrder::new_for_insert(
            "ORD-1".into(),
            "test".into(),
            "NO-1".into(),
            "mp".into(),
            "conn".into(),
            chrono::Utc::now(),
            2,
            10_000.0,
            20_000.0,
            "buyer".into(),
            "receiver".into(),
            "010-1234-5678".into(),
            "12 Teheran-ro, Gangnam-gu, Seoul".into(),
            Some("06234".into()),
        )
    }

    #[test]
    fn clean_order_passes_field_checks() {
        assert!(check_fields(&order()).is_empty());
    }

    #[test]
    fn missing_receiver_is_reported() {
        let mut o = order();
        o.receiver_name = "".into();
        o.receiver_phone = " ".into();
        let reasons = check_fields(&o);
        assert_eq!(reasons.len(), 2);
    }

    #[test]
    fn non_positive_quantity_is_reported() {
        let mut o = order();
        o.quantity = 0;
        assert!(check_fields(&o)
            .iter()
            .any(|r| r.contains("quantity")));
    }

    #[test]
    fn short_address_is_reported() {
        let mut o = order();
        o.receiver_address = "x".into();
        assert!(check_fields(&o).iter().any(|r| r.contains("address")));
    }
}
