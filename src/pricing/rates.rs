use serde::{Deserialize, Serialize};

/// Price floor applied to the combined total (service + parts + labor).
pub const MINIMUM_SERVICE_FEE: f64 = 150.0;

/// Installation labor charged per anode unit, on top of the part's list price.
pub const ANODE_LABOR_RATE: f64 = 15.0;

/// Per-propeller rate, charged once per selected operation (removal, install).
pub const PROPELLER_RATE: f64 = 349.0;

pub const RECURRING_CLEANING_RATE: f64 = 4.50;
pub const ONE_TIME_CLEANING_RATE: f64 = 6.00;
pub const ITEM_RECOVERY_RATE: f64 = 199.0;
pub const UNDERWATER_INSPECTION_RATE: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    RecurringCleaning,
    OneTimeCleaning,
    ItemRecovery,
    UnderwaterInspection,
    PropellerService,
    AnodesOnly,
}

impl ServiceType {
    /// Cleaning services run the full surcharge chain (hull, growth, vessel,
    /// engine). Everything else is flat or per-unit priced.
    pub fn is_cleaning(&self) -> bool {
        matches!(
            self,
            ServiceType::RecurringCleaning | ServiceType::OneTimeCleaning
        )
    }

    /// Propeller work may legitimately total zero when neither removal nor
    /// install is selected, so it is exempt from the minimum fee.
    pub fn subject_to_minimum(&self) -> bool {
        !matches!(self, ServiceType::PropellerService)
    }

    pub fn default_mode(&self) -> PricingMode {
        match self {
            ServiceType::RecurringCleaning => PricingMode::PerFoot {
                rate: RECURRING_CLEANING_RATE,
            },
            ServiceType::OneTimeCleaning => PricingMode::PerFoot {
                rate: ONE_TIME_CLEANING_RATE,
            },
            ServiceType::ItemRecovery => PricingMode::Flat {
                rate: ITEM_RECOVERY_RATE,
            },
            ServiceType::UnderwaterInspection => PricingMode::Flat {
                rate: UNDERWATER_INSPECTION_RATE,
            },
            // Propeller pricing is derived from the job options, not the mode.
            ServiceType::PropellerService => PricingMode::Flat { rate: 0.0 },
            ServiceType::AnodesOnly => PricingMode::Flat { rate: 0.0 },
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceType::RecurringCleaning => "Recurring Hull Cleaning",
            ServiceType::OneTimeCleaning => "One-Time Hull Cleaning",
            ServiceType::ItemRecovery => "Item Recovery",
            ServiceType::UnderwaterInspection => "Underwater Inspection",
            ServiceType::PropellerService => "Propeller Removal/Install",
            ServiceType::AnodesOnly => "Anode Installation Only",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PricingMode {
    PerFoot { rate: f64 },
    Flat { rate: f64 },
}

/// Options for a propeller service: how many props, and which operations the
/// customer asked for. Each operation bills the full per-prop rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropellerJob {
    pub count: u32,
    pub removal: bool,
    pub install: bool,
}

impl PropellerJob {
    pub fn total(&self) -> f64 {
        let operations = self.removal as u32 + self.install as u32;
        PROPELLER_RATE * self.count as f64 * operations as f64
    }
}

/// The operator's chosen service and its pricing mode. Re-selectable until a
/// charge is submitted; the charge works off a stored quote snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSelection {
    pub service_type: ServiceType,
    pub mode: PricingMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propeller: Option<PropellerJob>,
}

impl ServiceSelection {
    pub fn new(service_type: ServiceType) -> Self {
        Self {
            service_type,
            mode: service_type.default_mode(),
            propeller: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rates() {
        match ServiceType::RecurringCleaning.default_mode() {
            PricingMode::PerFoot { rate } => assert_eq!(rate, 4.50),
            _ => panic!("recurring cleaning should be per-foot"),
        }
        match ServiceType::ItemRecovery.default_mode() {
            PricingMode::Flat { rate } => assert_eq!(rate, 199.0),
            _ => panic!("item recovery should be flat"),
        }
    }

    #[test]
    fn test_propeller_job_totals() {
        let neither = PropellerJob {
            count: 2,
            removal: false,
            install: false,
        };
        assert_eq!(neither.total(), 0.0);

        let removal_only = PropellerJob {
            count: 1,
            removal: true,
            install: false,
        };
        assert_eq!(removal_only.total(), 349.0);

        let both = PropellerJob {
            count: 2,
            removal: true,
            install: true,
        };
        assert_eq!(both.total(), 349.0 * 2.0 * 2.0);
    }

    #[test]
    fn test_minimum_fee_exemption() {
        assert!(ServiceType::RecurringCleaning.subject_to_minimum());
        assert!(ServiceType::AnodesOnly.subject_to_minimum());
        assert!(!ServiceType::PropellerService.subject_to_minimum());
    }

    #[test]
    fn test_service_type_serde_tags() {
        let json = serde_json::to_string(&ServiceType::OneTimeCleaning).unwrap();
        assert_eq!(json, "\"one-time-cleaning\"");
        let back: ServiceType = serde_json::from_str("\"anodes-only\"").unwrap();
        assert_eq!(back, ServiceType::AnodesOnly);
    }
}
