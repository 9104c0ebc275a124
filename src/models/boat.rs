use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::pricing::surcharges::{EngineConfiguration, HullConfiguration, VesselType};

/// A customer's boat. The pricing attributes stored here auto-fill the quote
/// form; the operator can still override them per quote.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Boat {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    pub name: String,
    pub length_ft: f64,
    pub hull: HullConfiguration,
    pub vessel: VesselType,
    pub engine: EngineConfiguration,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marina: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slip: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
