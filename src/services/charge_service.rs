use std::collections::HashMap;

use crate::models::customer::Customer;
use crate::models::quote::QuoteSnapshot;
use crate::services::payment::interface::{
    ChargeOutcome, ChargeRequest, PaymentError, PaymentOperations,
};

/// Decimal dollars to integer cents, rounded (never truncated).
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

pub fn charge_description(quote: &QuoteSnapshot, customer: &Customer) -> String {
    format!(
        "{} - {} ({:.0} ft)",
        quote.selection.service_type.label(),
        customer.full_name(),
        quote.boat.length_ft
    )
}

pub fn charge_metadata(quote: &QuoteSnapshot) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    metadata.insert("quote_id".to_string(), quote.quote_id.clone());
    metadata.insert(
        "service_type".to_string(),
        quote.selection.service_type.label().to_string(),
    );
    metadata.insert("customer_id".to_string(), quote.customer_id.to_hex());
    if let Some(boat_id) = quote.boat_id {
        metadata.insert("boat_id".to_string(), boat_id.to_hex());
    }
    // Manual adjustments show up on the Stripe dashboard, not just in Mongo.
    if let Some(ovr) = &quote.breakdown.price_override {
        metadata.insert("price_adjustment".to_string(), ovr.describe());
    }
    metadata
}

/// Submit the snapshot's amount to the payment provider. The amount comes
/// straight from `quote.amount_cents`; nothing is recomputed here, so the
/// charged amount always equals the previewed amount.
pub async fn submit_charge<P: PaymentOperations>(
    provider: &P,
    quote: &QuoteSnapshot,
    customer: &Customer,
) -> Result<ChargeOutcome, PaymentError> {
    let stripe_customer_id = match &customer.stripe_customer_id {
        Some(id) => id.clone(),
        None => return Err(PaymentError::NoPaymentMethod),
    };

    let request = ChargeRequest {
        amount_cents: quote.amount_cents,
        description: charge_description(quote, customer),
        customer_id: stripe_customer_id,
        payment_method_id: customer.default_payment_method_id.clone(),
        metadata: charge_metadata(quote),
    };

    provider.create_charge(request).await
}
