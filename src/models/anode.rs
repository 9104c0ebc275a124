use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Catalog entry for a sacrificial anode the shop sells and installs.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnodeCatalogItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub sku: String,
    pub name: String,
    pub list_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
    pub active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
