use serde::{Deserialize, Serialize};

use super::anodes::AnodeSelection;
use super::overrides::PriceOverride;
use super::rates::{PricingMode, ServiceSelection, ServiceType, MINIMUM_SERVICE_FEE};
use super::surcharges::{
    growth_surcharge_percent, growth_tier_name, EngineConfiguration, HullConfiguration,
    PaintCondition, VesselType,
};
use super::{round_cents, PricingError};

/// Boat facts the price depends on. Auto-filled from the customer's boat
/// record and overridable by the operator before charging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoatAttributes {
    pub length_ft: f64,
    pub hull: HullConfiguration,
    pub vessel: VesselType,
    pub engine: EngineConfiguration,
}

impl BoatAttributes {
    fn validate(&self, mode: &PricingMode) -> Result<(), PricingError> {
        if !self.length_ft.is_finite() || self.length_ft < 0.0 {
            return Err(PricingError::InvalidBoatLength(self.length_ft));
        }
        if matches!(mode, PricingMode::PerFoot { .. }) && self.length_ft <= 0.0 {
            return Err(PricingError::InvalidBoatLength(self.length_ft));
        }
        Ok(())
    }
}

/// Diver-assessed condition, recorded for cleaning services. Growth is what
/// gets priced; paint condition goes to the condition log and only carries a
/// surcharge on the non-cleaning display path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionAssessment {
    pub paint: PaintCondition,
    pub growth_level: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurchargeLine {
    pub label: String,
    pub percent: f64,
    pub amount: f64,
}

/// Fully itemized result of a price computation. Recomputed from scratch on
/// every input change; never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub service_type: ServiceType,
    pub base_amount: f64,
    pub surcharges: Vec<SurchargeLine>,
    pub parts_subtotal: f64,
    pub labor_subtotal: f64,
    pub anode_unit_count: u32,
    pub pre_minimum_total: f64,
    pub minimum_applied: bool,
    pub total_before_override: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_override: Option<PriceOverride>,
    pub final_total: f64,
}

fn apply_surcharge(
    lines: &mut Vec<SurchargeLine>,
    running: &mut f64,
    label: String,
    percent: f64,
) {
    if percent <= 0.0 {
        return;
    }
    let amount = *running * percent / 100.0;
    lines.push(SurchargeLine {
        label,
        percent,
        amount: round_cents(amount),
    });
    *running += amount;
}

/// Compute the itemized price for a service selection.
///
/// Surcharges compose multiplicatively in sequence against the running
/// subtotal, in a fixed order: hull, growth, vessel type, engine. Parts and
/// labor are added after the percentage chain and are never surcharged.
/// The minimum fee floors the combined total; a manual override, if present,
/// applies last against the total it was recorded for.
pub fn compute_price(
    selection: &ServiceSelection,
    boat: &BoatAttributes,
    condition: Option<&ConditionAssessment>,
    anodes: &AnodeSelection,
    price_override: Option<&PriceOverride>,
) -> Result<PriceBreakdown, PricingError> {
    boat.validate(&selection.mode)?;
    if let Some(ovr) = price_override {
        ovr.validate()?;
    }

    let base = match selection.service_type {
        // Propeller work bypasses both the surcharge chain and the floor:
        // full rate per prop per selected operation, zero if none selected.
        ServiceType::PropellerService => selection
            .propeller
            .map(|job| job.total())
            .unwrap_or(0.0),
        _ => match selection.mode {
            PricingMode::PerFoot { rate } => rate * boat.length_ft,
            PricingMode::Flat { rate } => rate,
        },
    };

    let mut surcharges = Vec::new();
    let mut running = base;

    if selection.service_type.is_cleaning() {
        apply_surcharge(
            &mut surcharges,
            &mut running,
            format!("{} hull", boat.hull.label()),
            boat.hull.surcharge_percent(),
        );
        if let Some(assessment) = condition {
            apply_surcharge(
                &mut surcharges,
                &mut running,
                format!("Growth ({})", growth_tier_name(assessment.growth_level)),
                growth_surcharge_percent(assessment.growth_level),
            );
        }
        apply_surcharge(
            &mut surcharges,
            &mut running,
            "Powerboat".to_string(),
            boat.vessel.surcharge_percent(),
        );
        apply_surcharge(
            &mut surcharges,
            &mut running,
            "Twin engine".to_string(),
            boat.engine.surcharge_percent(),
        );
    }

    let anode_totals = anodes.totals();
    let pre_minimum = running + anode_totals.parts_subtotal + anode_totals.labor_subtotal;

    let (floored, minimum_applied) = if selection.service_type.subject_to_minimum()
        && pre_minimum < MINIMUM_SERVICE_FEE
    {
        (MINIMUM_SERVICE_FEE, true)
    } else {
        (pre_minimum, false)
    };
    let total_before_override = round_cents(floored);

    let final_total = match price_override {
        Some(ovr) => ovr.apply()?,
        None => total_before_override,
    };

    Ok(PriceBreakdown {
        service_type: selection.service_type,
        base_amount: round_cents(base),
        surcharges,
        parts_subtotal: anode_totals.parts_subtotal,
        labor_subtotal: anode_totals.labor_subtotal,
        anode_unit_count: anode_totals.unit_count,
        pre_minimum_total: round_cents(pre_minimum),
        minimum_applied,
        total_before_override,
        price_override: price_override.cloned(),
        final_total,
    })
}
