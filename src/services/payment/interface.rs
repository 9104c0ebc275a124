use std::collections::HashMap;
use std::fmt;

use crate::services::stripe::models::customer::CustomerData;
use stripe::PaymentMethod;

pub enum CustomerError {
    NotFound,
    InternalServerError,
}

#[derive(Debug)]
pub enum PaymentError {
    NotFound,
    NoPaymentMethod,
    Transport(String),
    InternalServerError,
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentError::NotFound => write!(f, "Payment record not found"),
            PaymentError::NoPaymentMethod => write!(f, "No payment method on file"),
            PaymentError::Transport(msg) => write!(f, "Payment provider unreachable: {}", msg),
            PaymentError::InternalServerError => write!(f, "Payment provider error"),
        }
    }
}

/// The exact amount and context handed to the payment provider. Created once
/// per charge action from a stored quote snapshot; never rebuilt mid-flight.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub amount_cents: i64,
    pub description: String,
    pub customer_id: String,
    pub payment_method_id: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Succeeded { charge_id: String },
    RequiresAction { message: String },
    Declined { message: String },
}

pub trait PaymentOperations {
    async fn get_customer(&self, customer_id: &str) -> Result<CustomerData, CustomerError>;
    async fn create_customer(&self, customer: CustomerData) -> Result<CustomerData, CustomerError>;

    async fn get_cust_payment_methods(
        &self,
        customer_id: String,
    ) -> Result<Vec<PaymentMethod>, PaymentError>;

    async fn create_charge(&self, request: ChargeRequest) -> Result<ChargeOutcome, PaymentError>;
}
