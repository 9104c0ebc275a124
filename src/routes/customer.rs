use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use bson::{doc, oid::ObjectId};
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::boat::Boat;
use crate::models::customer::Customer;
use crate::pricing::surcharges::{EngineConfiguration, HullConfiguration, VesselType};
use crate::services::payment::interface::{CustomerError, PaymentOperations};
use crate::services::stripe::{models::customer::CustomerData, provider::StripeProvider};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StripeCustomerResponse {
    customer_id: String,
    created: bool,
}

fn customers(client: &Arc<Client>) -> mongodb::Collection<Customer> {
    client.database(BILLING_DB).collection("Customers")
}

fn boats(client: &Arc<Client>) -> mongodb::Collection<Boat> {
    client.database(BILLING_DB).collection("Boats")
}

/// Substring search across name and email, case-insensitive. No query returns
/// the full (small) customer list for the admin picker.
pub async fn search_customers(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    params: web::Query<SearchParams>,
) -> impl Responder {
    let client = data.into_inner();

    let filter = match params.q.as_deref().filter(|q| !q.is_empty()) {
        Some(q) => doc! {
            "$or": [
                { "first_name": { "$regex": q, "$options": "i" } },
                { "last_name": { "$regex": q, "$options": "i" } },
                { "email": { "$regex": q, "$options": "i" } },
            ]
        },
        None => doc! {},
    };

    match customers(&client).find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Customer>>().await {
            Ok(results) => HttpResponse::Ok().json(results),
            Err(err) => {
                eprintln!("MongoDB Error: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to read customers")
            }
        },
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to search customers")
        }
    }
}

pub async fn get_customer(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };
    let client = data.into_inner();

    match customers(&client).find_one(doc! { "_id": id }).await {
        Ok(Some(customer)) => HttpResponse::Ok().json(customer),
        Ok(None) => HttpResponse::NotFound().body("Customer not found"),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to read customer")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

pub async fn create_customer(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    input: web::Json<CustomerInput>,
) -> impl Responder {
    let input = input.into_inner();
    let now = Utc::now();
    let customer = Customer {
        id: None,
        first_name: input.first_name,
        last_name: input.last_name,
        email: input.email,
        phone: input.phone,
        stripe_customer_id: None,
        default_payment_method_id: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let client = data.into_inner();
    match customers(&client).insert_one(&customer).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create customer")
        }
    }
}

/// Make sure the customer exists on the payment provider's side; create them
/// from the local record the first time a card is being stored.
pub async fn ensure_stripe_customer(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };
    let client = data.into_inner();

    let customer = match customers(&client).find_one(doc! { "_id": id }).await {
        Ok(Some(customer)) => customer,
        Ok(None) => return HttpResponse::NotFound().body("Customer not found"),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to read customer");
        }
    };

    let api_key = match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) => key,
        Err(_) => return HttpResponse::InternalServerError().body("STRIPE_SECRET_KEY not configured"),
    };
    let stripe_op = StripeProvider::new(api_key);

    // An existing id is only reused if Stripe still knows it.
    if let Some(existing) = &customer.stripe_customer_id {
        match stripe_op.get_customer(existing).await {
            Ok(_) => {
                return HttpResponse::Ok().json(StripeCustomerResponse {
                    customer_id: existing.clone(),
                    created: false,
                });
            }
            Err(_) => {
                println!("Stripe customer {} is gone, creating a new one", existing);
            }
        }
    }

    let customer_data = CustomerData {
        id: None,
        email: Some(customer.email.clone()),
        name: Some(customer.full_name()),
        phone: customer.phone.clone(),
        description: None,
        metadata: None,
    };

    let created = match stripe_op.create_customer(customer_data).await {
        Ok(created) => created,
        Err(CustomerError::InternalServerError) | Err(CustomerError::NotFound) => {
            return HttpResponse::InternalServerError()
                .body("Failed to create customer with payment provider");
        }
    };
    let stripe_customer_id = match created.id {
        Some(id) => id,
        None => {
            return HttpResponse::InternalServerError()
                .body("Payment provider returned no customer id");
        }
    };

    let update = doc! { "$set": {
        "stripe_customer_id": &stripe_customer_id,
        "updated_at": Utc::now().to_rfc3339()
    } };
    if let Err(err) = customers(&client).update_one(doc! { "_id": id }, update).await {
        eprintln!("MongoDB Error updating stripe_customer_id: {:?}", err);
        return HttpResponse::InternalServerError().body("Failed to save customer record");
    }

    HttpResponse::Ok().json(StripeCustomerResponse {
        customer_id: stripe_customer_id,
        created: true,
    })
}

pub async fn get_payment_methods(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };
    let client = data.into_inner();

    let customer = match customers(&client).find_one(doc! { "_id": id }).await {
        Ok(Some(customer)) => customer,
        Ok(None) => return HttpResponse::NotFound().body("Customer not found"),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            return HttpResponse::InternalServerError().body("Failed to read customer");
        }
    };

    let stripe_customer_id = match customer.stripe_customer_id {
        Some(id) => id,
        None => return HttpResponse::NotFound().body("Customer has no payment profile"),
    };

    let api_key = match std::env::var("STRIPE_SECRET_KEY") {
        Ok(key) => key,
        Err(_) => return HttpResponse::InternalServerError().body("STRIPE_SECRET_KEY not configured"),
    };
    let stripe_op = StripeProvider::new(api_key);

    match stripe_op.get_cust_payment_methods(stripe_customer_id).await {
        Ok(methods) => HttpResponse::Ok().json(methods),
        Err(err) => {
            eprintln!("Failed to list payment methods: {}", err);
            HttpResponse::InternalServerError().body("Failed to retrieve payment methods")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BoatInput {
    pub name: String,
    pub length_ft: f64,
    pub hull: HullConfiguration,
    pub vessel: VesselType,
    pub engine: EngineConfiguration,
    #[serde(default)]
    pub marina: Option<String>,
    #[serde(default)]
    pub slip: Option<String>,
}

pub async fn get_customer_boats(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };
    let client = data.into_inner();

    match boats(&client).find(doc! { "customer_id": id }).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Boat>>().await {
            Ok(results) => HttpResponse::Ok().json(results),
            Err(err) => {
                eprintln!("MongoDB Error: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to read boats")
            }
        },
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to read boats")
        }
    }
}

pub async fn add_customer_boat(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
    input: web::Json<BoatInput>,
) -> impl Responder {
    let customer_id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };

    let input = input.into_inner();
    if !input.length_ft.is_finite() || input.length_ft <= 0.0 {
        return HttpResponse::BadRequest().body("Boat length must be greater than zero");
    }

    let now = Utc::now();
    let boat = Boat {
        id: None,
        customer_id,
        name: input.name,
        length_ft: input.length_ft,
        hull: input.hull,
        vessel: input.vessel,
        engine: input.engine,
        marina: input.marina,
        slip: input.slip,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let client = data.into_inner();
    match boats(&client).insert_one(&boat).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create boat")
        }
    }
}
