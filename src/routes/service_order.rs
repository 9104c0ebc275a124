use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Client;
use std::str::FromStr;
use std::sync::Arc;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::service_order::ServiceOrder;

/// Service/invoice history for a customer, newest first. Each record carries
/// the full breakdown and the condition log captured at service time.
pub async fn get_customer_orders(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let customer_id = match ObjectId::from_str(&path.into_inner()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid customer id"),
    };

    let client = data.into_inner();
    let orders: mongodb::Collection<ServiceOrder> =
        client.database(BILLING_DB).collection("ServiceOrders");

    match orders
        .find(doc! { "customer_id": customer_id })
        .sort(doc! { "created_at": -1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<ServiceOrder>>().await {
            Ok(results) => HttpResponse::Ok().json(results),
            Err(err) => {
                eprintln!("MongoDB Error: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to read service history")
            }
        },
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to read service history")
        }
    }
}
