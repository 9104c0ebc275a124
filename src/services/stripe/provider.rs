use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use stripe::{
    CustomerId, Expandable, PaymentIntentOffSession, PaymentIntentStatus, PaymentMethod,
    PaymentMethodId,
};

use crate::services::payment::interface::{
    ChargeOutcome, ChargeRequest, CustomerError, PaymentError, PaymentOperations,
};

use super::models::customer::CustomerData;

pub struct StripeProvider {
    pub client: stripe::Client,
}

impl StripeProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: stripe::Client::new(api_key.into()),
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
struct PaymentMethodList {
    data: Vec<PaymentMethod>,
    has_more: bool,
    url: String,
    object: String,
}

/// Build the intent for a stored-card charge: confirmed immediately and
/// flagged off-session, so Stripe applies merchant-initiated exemptions
/// instead of asking for authentication the cardholder is not present to give.
fn payment_intent_for(request: &ChargeRequest) -> Result<stripe::CreatePaymentIntent<'_>, PaymentError> {
    let customer_id =
        CustomerId::from_str(&request.customer_id).map_err(|_| PaymentError::NoPaymentMethod)?;

    let mut create_intent =
        stripe::CreatePaymentIntent::new(request.amount_cents, stripe::Currency::USD);
    create_intent.customer = Some(customer_id);
    create_intent.description = Some(request.description.as_str());
    create_intent.metadata = Some(request.metadata.clone());
    // The admin UI has no second confirmation step and the cardholder is not
    // in the room.
    create_intent.confirm = Some(true);
    create_intent.off_session = Some(PaymentIntentOffSession::Exists(true));

    create_intent.payment_method = match &request.payment_method_id {
        Some(id) => match PaymentMethodId::from_str(id) {
            Ok(pm_id) => Some(pm_id),
            Err(_) => return Err(PaymentError::NoPaymentMethod),
        },
        None => None,
    };

    Ok(create_intent)
}

impl PaymentOperations for StripeProvider {
    async fn create_customer(&self, customer: CustomerData) -> Result<CustomerData, CustomerError> {
        let create_customer: stripe::CreateCustomer<'_> = (&customer).into();

        match stripe::Customer::create(&self.client, create_customer).await {
            Ok(stripe_customer) => Ok(CustomerData::from(stripe_customer)),
            Err(_) => Err(CustomerError::InternalServerError),
        }
    }

    async fn get_customer(&self, customer_id: &str) -> Result<CustomerData, CustomerError> {
        let cust_id = CustomerId::from_str(customer_id).map_err(|_| CustomerError::NotFound)?;
        let expand = &[];
        match stripe::Customer::retrieve(&self.client, &cust_id, expand).await {
            Ok(customer) => Ok(customer.into()),
            Err(_) => Err(CustomerError::NotFound),
        }
    }

    // The payment-method list endpoint is easier to hit directly than through
    // the crate's pagination types.
    async fn get_cust_payment_methods(
        &self,
        customer_id: String,
    ) -> Result<Vec<PaymentMethod>, PaymentError> {
        let api_key = match std::env::var("STRIPE_SECRET_KEY") {
            Ok(key) => key,
            Err(_) => {
                eprintln!("STRIPE_SECRET_KEY is not configured");
                return Err(PaymentError::InternalServerError);
            }
        };

        let client = match reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
        {
            Ok(client) => client,
            Err(_) => return Err(PaymentError::InternalServerError),
        };

        let url = format!(
            "https://api.stripe.com/v1/customers/{}/payment_methods",
            customer_id
        );

        let res = match client
            .get(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .send()
            .await
        {
            Ok(res) => res,
            Err(err) => return Err(PaymentError::Transport(err.to_string())),
        };

        if res.status().is_success() {
            let body = res
                .text()
                .await
                .map_err(|err| PaymentError::Transport(err.to_string()))?;
            let payment_list = serde_json::from_str::<PaymentMethodList>(&body)
                .map_err(|_| PaymentError::InternalServerError)?;

            return Ok(payment_list.data);
        }

        Err(PaymentError::NotFound)
    }

    /// Create and confirm a payment intent for the snapshot amount. A card
    /// decline comes back from Stripe as a request error and is reported as a
    /// retryable `Declined` outcome, not a transport failure.
    async fn create_charge(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError> {
        let create_intent = payment_intent_for(&request)?;

        match stripe::PaymentIntent::create(&self.client, create_intent).await {
            Ok(intent) => match intent.status {
                PaymentIntentStatus::Succeeded => {
                    let charge_id = intent
                        .latest_charge
                        .as_ref()
                        .map(|charge| match charge {
                            Expandable::Id(id) => id.to_string(),
                            Expandable::Object(obj) => obj.id.to_string(),
                        })
                        .unwrap_or_else(|| intent.id.to_string());
                    Ok(ChargeOutcome::Succeeded { charge_id })
                }
                PaymentIntentStatus::RequiresAction
                | PaymentIntentStatus::RequiresConfirmation => {
                    Ok(ChargeOutcome::RequiresAction {
                        message: "Card requires additional authentication".to_string(),
                    })
                }
                PaymentIntentStatus::RequiresPaymentMethod => Ok(ChargeOutcome::Declined {
                    message: "No usable payment method on file".to_string(),
                }),
                status => {
                    println!("Unexpected payment intent status: {:?}", status);
                    Ok(ChargeOutcome::Declined {
                        message: format!("Payment not completed (status {:?})", status),
                    })
                }
            },
            Err(stripe::StripeError::Stripe(request_error)) => Ok(ChargeOutcome::Declined {
                message: request_error
                    .message
                    .unwrap_or_else(|| "Card was declined".to_string()),
            }),
            Err(err) => {
                eprintln!("Stripe transport error: {:?}", err);
                Err(PaymentError::Transport(err.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_request() -> ChargeRequest {
        ChargeRequest {
            amount_cents: 15750,
            description: "Recurring Hull Cleaning - Dana Reyes (35 ft)".to_string(),
            customer_id: "cus_123".to_string(),
            payment_method_id: Some("pm_123".to_string()),
            metadata: HashMap::new(),
        }
    }

    #[test]
    fn test_stored_card_intent_is_off_session_and_confirmed() {
        let request = sample_request();
        let intent = payment_intent_for(&request).unwrap();

        assert_eq!(intent.amount, 15750);
        assert_eq!(intent.currency, stripe::Currency::USD);
        assert_eq!(intent.confirm, Some(true));
        assert_eq!(
            intent.off_session,
            Some(PaymentIntentOffSession::Exists(true))
        );
        assert!(intent.customer.is_some());
        assert!(intent.payment_method.is_some());
    }

    #[test]
    fn test_malformed_ids_read_as_missing_payment_method() {
        let mut request = sample_request();
        request.customer_id = "not-a-customer".to_string();
        assert!(matches!(
            payment_intent_for(&request),
            Err(PaymentError::NoPaymentMethod)
        ));

        let mut request = sample_request();
        request.payment_method_id = Some("not-a-card".to_string());
        assert!(matches!(
            payment_intent_for(&request),
            Err(PaymentError::NoPaymentMethod)
        ));
    }
}
