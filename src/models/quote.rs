use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    AnodeSelection, BoatAttributes, ConditionAssessment, PriceBreakdown, ServiceSelection,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Rendered to the operator and eligible to be charged.
    Previewed,
    /// A charge is in flight; a second submit is rejected.
    Processing,
    /// Charged successfully. Terminal.
    Charged,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Previewed => "previewed",
            QuoteStatus::Processing => "processing",
            QuoteStatus::Charged => "charged",
        }
    }
}

/// Persisted pricing snapshot. The charge handler reads `amount_cents` from
/// here and never recomputes, so the amount charged is exactly the amount the
/// operator last saw.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteSnapshot {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub quote_id: String,
    pub customer_id: ObjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boat_id: Option<ObjectId>,
    pub selection: ServiceSelection,
    pub boat: BoatAttributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionAssessment>,
    pub anodes: AnodeSelection,
    pub breakdown: PriceBreakdown,
    pub amount_cents: i64,
    pub status: QuoteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charge_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
