use serde::{Deserialize, Serialize};
use stripe::{CreateCustomer, Customer, Metadata};

/// The slice of a Stripe customer this service cares about. Conversions keep
/// the routes free of raw Stripe request structs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerData {
    pub id: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<Metadata>,
}

impl From<Customer> for CustomerData {
    fn from(customer: Customer) -> Self {
        Self {
            id: Some(customer.id.to_string()),
            email: customer.email,
            name: customer.name,
            phone: customer.phone,
            description: customer.description,
            metadata: customer.metadata,
        }
    }
}

impl<'a> From<&'a CustomerData> for CreateCustomer<'a> {
    fn from(data: &'a CustomerData) -> Self {
        let mut customer = CreateCustomer::new();
        customer.email = data.email.as_deref();
        customer.name = data.name.as_deref();
        customer.phone = data.phone.as_deref();
        customer.description = data.description.as_deref();
        customer.metadata = data.metadata.clone();
        customer
    }
}
