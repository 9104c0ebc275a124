use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::pricing::{ConditionAssessment, PriceBreakdown, ServiceType};

/// Invoice/history record written once a charge succeeds. Carries the full
/// breakdown and the condition log (paint + growth at service time) for the
/// customer's service history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceOrder {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boat_id: Option<ObjectId>,
    pub quote_id: String,
    pub service_type: ServiceType,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionAssessment>,
    pub breakdown: PriceBreakdown,
    pub amount_cents: i64,
    pub charge_id: String,
    pub created_at: Option<DateTime<Utc>>,
}
