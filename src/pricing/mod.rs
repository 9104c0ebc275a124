use std::fmt;

pub mod anodes;
pub mod calculator;
pub mod overrides;
pub mod rates;
pub mod surcharges;

pub use anodes::{AnodeSelection, AnodeTotals};
pub use calculator::{compute_price, BoatAttributes, ConditionAssessment, PriceBreakdown};
pub use overrides::{OverrideMode, PriceOverride};
pub use rates::{PricingMode, PropellerJob, ServiceSelection, ServiceType};

/// Validation failures raised while computing a price. These never leave the
/// process as anything but an operator-visible message.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    InvalidBoatLength(f64),
    InvalidOverridePercent(f64),
    InvalidOverrideAmount(f64),
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidBoatLength(len) => {
                write!(f, "Boat length must be greater than zero (got {})", len)
            }
            PricingError::InvalidOverridePercent(pct) => {
                write!(f, "Discount percentage must be between 0 and 100 (got {})", pct)
            }
            PricingError::InvalidOverrideAmount(amt) => {
                write!(f, "Adjustment amount must not be negative (got {})", amt)
            }
        }
    }
}

/// Round a dollar amount to whole cents. All totals leaving the calculator go
/// through this so the preview, the stored quote and the charged amount agree.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
