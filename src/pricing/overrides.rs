use serde::{Deserialize, Serialize};

use super::{round_cents, PricingError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideMode {
    /// Percentage discount off the computed total, 0-100.
    Percent,
    /// Fixed dollar discount, clamped so the result never goes negative.
    Dollar,
    /// Replace the computed total outright.
    Custom,
}

/// A manual post-computation price adjustment. `original_total` is the
/// computed final total the override was created against and is never
/// recalculated while the override is active; the quote layer clears the
/// override when the underlying price moves away from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceOverride {
    pub mode: OverrideMode,
    pub value: f64,
    pub original_total: f64,
}

impl PriceOverride {
    pub fn new(mode: OverrideMode, value: f64, original_total: f64) -> Self {
        Self {
            mode,
            value,
            original_total,
        }
    }

    pub fn validate(&self) -> Result<(), PricingError> {
        match self.mode {
            OverrideMode::Percent => {
                if !(0.0..=100.0).contains(&self.value) || !self.value.is_finite() {
                    return Err(PricingError::InvalidOverridePercent(self.value));
                }
            }
            OverrideMode::Dollar | OverrideMode::Custom => {
                if self.value < 0.0 || !self.value.is_finite() {
                    return Err(PricingError::InvalidOverrideAmount(self.value));
                }
            }
        }
        Ok(())
    }

    /// Final total after the adjustment. Works off the recorded
    /// `original_total`, not a recompute.
    pub fn apply(&self) -> Result<f64, PricingError> {
        self.validate()?;
        let adjusted = match self.mode {
            OverrideMode::Percent => self.original_total * (1.0 - self.value / 100.0),
            OverrideMode::Dollar => (self.original_total - self.value).max(0.0),
            OverrideMode::Custom => self.value,
        };
        Ok(round_cents(adjusted))
    }

    /// Human-readable descriptor for the invoice and the quote response.
    pub fn describe(&self) -> String {
        match self.mode {
            OverrideMode::Percent => format!("{}% discount", self.value),
            OverrideMode::Dollar => format!("${:.2} discount", self.value),
            OverrideMode::Custom => format!("custom total ${:.2}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_discount() {
        let ovr = PriceOverride::new(OverrideMode::Percent, 10.0, 300.0);
        assert_eq!(ovr.apply().unwrap(), 270.0);
    }

    #[test]
    fn test_dollar_discount() {
        let ovr = PriceOverride::new(OverrideMode::Dollar, 50.0, 120.0);
        assert_eq!(ovr.apply().unwrap(), 70.0);
    }

    #[test]
    fn test_dollar_discount_clamps_at_zero() {
        let ovr = PriceOverride::new(OverrideMode::Dollar, 200.0, 120.0);
        assert_eq!(ovr.apply().unwrap(), 0.0);
    }

    #[test]
    fn test_custom_total_is_verbatim() {
        let ovr = PriceOverride::new(OverrideMode::Custom, 199.99, 442.97);
        assert_eq!(ovr.apply().unwrap(), 199.99);
    }

    #[test]
    fn test_zero_equivalent_overrides_are_identity() {
        let original = 442.97;
        for ovr in [
            PriceOverride::new(OverrideMode::Percent, 0.0, original),
            PriceOverride::new(OverrideMode::Dollar, 0.0, original),
            PriceOverride::new(OverrideMode::Custom, original, original),
        ] {
            assert_eq!(ovr.apply().unwrap(), original);
        }
    }

    #[test]
    fn test_percent_out_of_range_rejected() {
        let too_high = PriceOverride::new(OverrideMode::Percent, 120.0, 300.0);
        assert_eq!(
            too_high.apply(),
            Err(PricingError::InvalidOverridePercent(120.0))
        );

        let negative = PriceOverride::new(OverrideMode::Percent, -5.0, 300.0);
        assert!(negative.apply().is_err());
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let ovr = PriceOverride::new(OverrideMode::Dollar, -10.0, 300.0);
        assert_eq!(ovr.apply(), Err(PricingError::InvalidOverrideAmount(-10.0)));

        let custom = PriceOverride::new(OverrideMode::Custom, -1.0, 300.0);
        assert!(custom.apply().is_err());
    }

    #[test]
    fn test_apply_does_not_touch_original_total() {
        let ovr = PriceOverride::new(OverrideMode::Percent, 25.0, 400.0);
        let _ = ovr.apply().unwrap();
        assert_eq!(ovr.original_total, 400.0);
    }
}
