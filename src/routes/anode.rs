use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::Client;
use serde::Deserialize;
use std::sync::Arc;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::anode::AnodeCatalogItem;

fn catalog(client: &Arc<Client>) -> mongodb::Collection<AnodeCatalogItem> {
    client.database(BILLING_DB).collection("AnodeCatalog")
}

/// Active anode catalog, sorted by SKU, for the quote form's parts picker.
pub async fn get_catalog(_claims: Claims, data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();

    match catalog(&client)
        .find(doc! { "active": true })
        .sort(doc! { "sku": 1 })
        .await
    {
        Ok(cursor) => match cursor.try_collect::<Vec<AnodeCatalogItem>>().await {
            Ok(items) => HttpResponse::Ok().json(items),
            Err(err) => {
                eprintln!("MongoDB Error: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to read anode catalog")
            }
        },
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to read anode catalog")
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogItemInput {
    pub sku: String,
    pub name: String,
    pub list_price: f64,
    #[serde(default)]
    pub inventory_id: Option<String>,
}

pub async fn add_catalog_item(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    input: web::Json<CatalogItemInput>,
) -> impl Responder {
    let input = input.into_inner();
    if !input.list_price.is_finite() || input.list_price < 0.0 {
        return HttpResponse::BadRequest().body("List price must not be negative");
    }

    let now = Utc::now();
    let item = AnodeCatalogItem {
        id: None,
        sku: input.sku,
        name: input.name,
        list_price: input.list_price,
        inventory_id: input.inventory_id,
        active: true,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let client = data.into_inner();
    match catalog(&client).insert_one(&item).await {
        Ok(result) => HttpResponse::Ok().json(doc! {
            "id": result.inserted_id.as_object_id().map(|id| id.to_hex()).unwrap_or_default()
        }),
        Err(err) => {
            eprintln!("MongoDB Error: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to create catalog item")
        }
    }
}
