use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::doc;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::customer::Customer;
use crate::models::quote::{QuoteSnapshot, QuoteStatus};
use crate::models::service_order::ServiceOrder;
use crate::services::charge_service;
use crate::services::payment::interface::{ChargeOutcome, PaymentError};
use crate::services::stripe::provider::StripeProvider;

#[derive(Debug, Deserialize)]
pub struct ChargeInput {
    pub quote_id: String,
    /// Overrides the customer's default payment method for this charge.
    #[serde(default)]
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChargeResponse {
    pub status: String,
    pub charge_id: String,
    pub amount_cents: i64,
}

fn quotes(client: &Arc<Client>) -> mongodb::Collection<QuoteSnapshot> {
    client.database(BILLING_DB).collection("Quotes")
}

/// Put a quote back into the chargeable state after a failed attempt so the
/// operator can retry without rebuilding the selection.
async fn release_quote(client: &Arc<Client>, quote_id: &str) {
    let update = doc! {
        "$set": {
            "status": QuoteStatus::Previewed.as_str(),
            "updated_at": Utc::now().to_rfc3339()
        }
    };
    if let Err(err) = quotes(client)
        .update_one(doc! { "quote_id": quote_id }, update)
        .await
    {
        eprintln!("Failed to release quote {}: {:?}", quote_id, err);
    }
}

/// Charge the stored snapshot amount for a quote.
///
/// The previewed -> processing transition is a single atomic update keyed on
/// the current status, so a double submit finds no `previewed` document and
/// is rejected instead of charging twice.
pub async fn charge_quote(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    input: web::Json<ChargeInput>,
) -> impl Responder {
    let input = input.into_inner();
    let client = data.into_inner();

    let claim_filter = doc! {
        "quote_id": &input.quote_id,
        "status": QuoteStatus::Previewed.as_str()
    };
    let claim_update = doc! {
        "$set": {
            "status": QuoteStatus::Processing.as_str(),
            "updated_at": Utc::now().to_rfc3339()
        }
    };

    let quote = match quotes(&client)
        .find_one_and_update(claim_filter, claim_update)
        .await
    {
        Ok(Some(quote)) => quote,
        Ok(None) => {
            // Work out why the quote was not claimable.
            return match quotes(&client)
                .find_one(doc! { "quote_id": &input.quote_id })
                .await
            {
                Ok(Some(existing)) => match existing.status {
                    QuoteStatus::Charged => {
                        HttpResponse::Conflict().body("Quote has already been charged")
                    }
                    QuoteStatus::Processing => {
                        HttpResponse::Conflict().body("A charge for this quote is already in flight")
                    }
                    QuoteStatus::Previewed => {
                        HttpResponse::Conflict().body("Quote could not be claimed, please retry")
                    }
                },
                Ok(None) => HttpResponse::NotFound().body("Quote not found"),
                Err(err) => {
                    eprintln!("MongoDB Error: {:?}", err);
                    HttpResponse::InternalServerError().body("Failed to load quote")
                }
            };
        }
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to load quote");
        }
    };

    let customers: mongodb::Collection<Customer> =
        client.database(BILLING_DB).collection("Customers");
    let mut customer = match customers.find_one(doc! { "_id": quote.customer_id }).await {
        Ok(Some(customer)) => customer,
        Ok(None) => {
            release_quote(&client, &quote.quote_id).await;
            return HttpResponse::NotFound().body("Customer not found");
        }
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            release_quote(&client, &quote.quote_id).await;
            return HttpResponse::InternalServerError().body("Failed to load customer");
        }
    };

    if input.payment_method_id.is_some() {
        customer.default_payment_method_id = input.payment_method_id.clone();
    }

    let api_key = match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) => key,
        Err(_) => {
            release_quote(&client, &quote.quote_id).await;
            return HttpResponse::InternalServerError().body("STRIPE_SECRET_KEY not configured");
        }
    };
    let provider = StripeProvider::new(api_key);

    match charge_service::submit_charge(&provider, &quote, &customer).await {
        Ok(ChargeOutcome::Succeeded { charge_id }) => {
            let update = doc! {
                "$set": {
                    "status": QuoteStatus::Charged.as_str(),
                    "charge_id": &charge_id,
                    "updated_at": Utc::now().to_rfc3339()
                }
            };
            if let Err(err) = quotes(&client)
                .update_one(doc! { "quote_id": &quote.quote_id }, update)
                .await
            {
                // The charge went through; the record catches up on the next
                // reconciliation. Do not fail the operator here.
                eprintln!("Failed to mark quote charged: {:?}", err);
            }

            let order = ServiceOrder {
                id: None,
                customer_id: quote.customer_id,
                boat_id: quote.boat_id,
                quote_id: quote.quote_id.clone(),
                service_type: quote.selection.service_type,
                description: charge_service::charge_description(&quote, &customer),
                condition: quote.condition,
                breakdown: quote.breakdown.clone(),
                amount_cents: quote.amount_cents,
                charge_id: charge_id.clone(),
                created_at: Some(Utc::now()),
            };
            let orders: mongodb::Collection<ServiceOrder> =
                client.database(BILLING_DB).collection("ServiceOrders");
            if let Err(err) = orders.insert_one(&order).await {
                eprintln!("Failed to record service order: {:?}", err);
            }

            HttpResponse::Ok().json(ChargeResponse {
                status: "succeeded".to_string(),
                charge_id,
                amount_cents: quote.amount_cents,
            })
        }
        Ok(ChargeOutcome::RequiresAction { message })
        | Ok(ChargeOutcome::Declined { message }) => {
            release_quote(&client, &quote.quote_id).await;
            HttpResponse::PaymentRequired().body(message)
        }
        Err(PaymentError::NoPaymentMethod) => {
            release_quote(&client, &quote.quote_id).await;
            HttpResponse::PaymentRequired().body("No payment method on file for this customer")
        }
        Err(PaymentError::Transport(msg)) => {
            release_quote(&client, &quote.quote_id).await;
            eprintln!("Payment transport failure: {}", msg);
            HttpResponse::BadGateway().body("Payment provider unreachable, please retry")
        }
        Err(err) => {
            release_quote(&client, &quote.quote_id).await;
            eprintln!("Payment failure: {}", err);
            HttpResponse::InternalServerError().body("Failed to submit charge")
        }
    }
}
