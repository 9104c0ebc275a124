use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use crate::db::mongo::BILLING_DB;
use crate::middleware::auth::Claims;
use crate::models::quote::{QuoteSnapshot, QuoteStatus};
use crate::pricing::{
    compute_price, AnodeSelection, BoatAttributes, ConditionAssessment, PriceBreakdown,
    PriceOverride, PricingError, ServiceSelection,
};
use crate::services::charge_service::to_minor_units;

pub const OVERRIDE_CLEARED_NOTICE: &str = "Discount cleared due to price change";

/// Everything the price depends on, supplied as typed values. The admin UI
/// posts this on every input change; nothing is read back from form state.
#[derive(Debug, Deserialize)]
pub struct QuoteInput {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub boat_id: Option<String>,
    pub selection: ServiceSelection,
    pub boat: BoatAttributes,
    #[serde(default)]
    pub condition: Option<ConditionAssessment>,
    #[serde(default)]
    pub anodes: AnodeSelection,
    #[serde(default)]
    pub price_override: Option<PriceOverride>,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub breakdown: PriceBreakdown,
    pub amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_cleared: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote_id: String,
    pub breakdown: PriceBreakdown,
    pub amount_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_cleared: Option<String>,
}

/// Recompute the breakdown from scratch. An override whose recorded base no
/// longer matches the current pre-override total (to the cent) is dropped and
/// the caller gets a notice to show the operator, instead of a stale discount.
pub fn resolve_breakdown(
    input: &QuoteInput,
) -> Result<(PriceBreakdown, Option<String>), PricingError> {
    let fresh = compute_price(
        &input.selection,
        &input.boat,
        input.condition.as_ref(),
        &input.anodes,
        None,
    )?;

    match &input.price_override {
        Some(ovr) => {
            if (ovr.original_total - fresh.total_before_override).abs() > 0.005 {
                Ok((fresh, Some(OVERRIDE_CLEARED_NOTICE.to_string())))
            } else {
                let with_override = compute_price(
                    &input.selection,
                    &input.boat,
                    input.condition.as_ref(),
                    &input.anodes,
                    Some(ovr),
                )?;
                Ok((with_override, None))
            }
        }
        None => Ok((fresh, None)),
    }
}

/// Live preview: pure computation, nothing persisted. Safe to call on every
/// keystroke.
pub async fn preview(_claims: Claims, input: web::Json<QuoteInput>) -> impl Responder {
    match resolve_breakdown(&input.into_inner()) {
        Ok((breakdown, override_cleared)) => {
            let amount_cents = to_minor_units(breakdown.final_total);
            HttpResponse::Ok().json(PreviewResponse {
                breakdown,
                amount_cents,
                override_cleared,
            })
        }
        Err(err) => HttpResponse::BadRequest().body(err.to_string()),
    }
}

/// Persist a quote snapshot the charge endpoint can work off. The stored
/// `amount_cents` is the only amount that can ever be charged for this quote.
pub async fn create_quote(
    _claims: Claims,
    data: web::Data<Arc<Client>>,
    input: web::Json<QuoteInput>,
) -> impl Responder {
    let input = input.into_inner();

    let customer_id = match input
        .customer_id
        .as_deref()
        .and_then(|id| ObjectId::from_str(id).ok())
    {
        Some(id) => id,
        None => return HttpResponse::BadRequest().body("A valid customer_id is required"),
    };
    let boat_id = match input.boat_id.as_deref() {
        Some(raw) => match ObjectId::from_str(raw) {
            Ok(id) => Some(id),
            Err(_) => return HttpResponse::BadRequest().body("Invalid boat_id"),
        },
        None => None,
    };

    let (breakdown, override_cleared) = match resolve_breakdown(&input) {
        Ok(resolved) => resolved,
        Err(err) => return HttpResponse::BadRequest().body(err.to_string()),
    };

    let amount_cents = to_minor_units(breakdown.final_total);
    let now = Utc::now();
    let quote = QuoteSnapshot {
        id: None,
        quote_id: Uuid::new_v4().to_string(),
        customer_id,
        boat_id,
        selection: input.selection,
        boat: input.boat,
        condition: input.condition,
        anodes: input.anodes,
        breakdown: breakdown.clone(),
        amount_cents,
        status: QuoteStatus::Previewed,
        charge_id: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    let client = data.into_inner();
    let collection: mongodb::Collection<QuoteSnapshot> =
        client.database(BILLING_DB).collection("Quotes");

    match collection.insert_one(&quote).await {
        Ok(_) => HttpResponse::Ok().json(QuoteResponse {
            quote_id: quote.quote_id,
            breakdown,
            amount_cents,
            override_cleared,
        }),
        Err(err) => {
            eprintln!("Failed to store quote: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to store quote")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::surcharges::{EngineConfiguration, HullConfiguration, VesselType};
    use crate::pricing::{OverrideMode, ServiceType};

    fn base_input() -> QuoteInput {
        QuoteInput {
            customer_id: None,
            boat_id: None,
            selection: ServiceSelection::new(ServiceType::RecurringCleaning),
            boat: BoatAttributes {
                length_ft: 35.0,
                hull: HullConfiguration::Monohull,
                vessel: VesselType::Sailboat,
                engine: EngineConfiguration::Single,
            },
            condition: None,
            anodes: AnodeSelection::new(),
            price_override: None,
        }
    }

    #[test]
    fn test_resolve_without_override() {
        let (breakdown, notice) = resolve_breakdown(&base_input()).unwrap();
        assert_eq!(breakdown.final_total, 157.50);
        assert!(notice.is_none());
    }

    #[test]
    fn test_resolve_applies_matching_override() {
        let mut input = base_input();
        input.price_override = Some(PriceOverride::new(OverrideMode::Percent, 10.0, 157.50));

        let (breakdown, notice) = resolve_breakdown(&input).unwrap();
        assert_eq!(breakdown.final_total, 141.75);
        assert!(notice.is_none());
    }

    #[test]
    fn test_stale_override_is_cleared_with_notice() {
        // Override was recorded against 157.50; the boat has since grown to
        // 40ft, so the base moved and the discount must not survive.
        let mut input = base_input();
        input.boat.length_ft = 40.0;
        input.price_override = Some(PriceOverride::new(OverrideMode::Percent, 10.0, 157.50));

        let (breakdown, notice) = resolve_breakdown(&input).unwrap();
        assert_eq!(breakdown.final_total, 180.0);
        assert!(breakdown.price_override.is_none());
        assert_eq!(notice.as_deref(), Some(OVERRIDE_CLEARED_NOTICE));
    }

    #[test]
    fn test_invalid_input_surfaces_error() {
        let mut input = base_input();
        input.boat.length_ft = 0.0;
        assert!(resolve_breakdown(&input).is_err());
    }
}
