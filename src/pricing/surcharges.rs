use serde::{Deserialize, Serialize};

/// Surcharge lookup tables for boat attributes. All values are percentages
/// applied multiplicatively in sequence by the calculator; the tables here
/// only answer "what percent does this attribute carry".

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HullConfiguration {
    Monohull,
    Catamaran,
    Trimaran,
}

impl HullConfiguration {
    pub fn extra_hulls(&self) -> u32 {
        match self {
            HullConfiguration::Monohull => 0,
            HullConfiguration::Catamaran => 1,
            HullConfiguration::Trimaran => 2,
        }
    }

    pub fn surcharge_percent(&self) -> f64 {
        match self {
            HullConfiguration::Monohull => 0.0,
            HullConfiguration::Catamaran => 25.0,
            HullConfiguration::Trimaran => 50.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HullConfiguration::Monohull => "Monohull",
            HullConfiguration::Catamaran => "Catamaran",
            HullConfiguration::Trimaran => "Trimaran",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VesselType {
    Sailboat,
    Powerboat,
}

impl VesselType {
    pub fn surcharge_percent(&self) -> f64 {
        match self {
            VesselType::Sailboat => 0.0,
            VesselType::Powerboat => 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineConfiguration {
    Single,
    Twin,
}

impl EngineConfiguration {
    pub fn surcharge_percent(&self) -> f64 {
        match self {
            EngineConfiguration::Single => 0.0,
            EngineConfiguration::Twin => 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaintCondition {
    Excellent,
    Good,
    Fair,
    Poor,
    Missing,
}

impl PaintCondition {
    /// Flat lookup, no interpolation. Fair intentionally carries no
    /// surcharge; that is the shop's policy, not an oversight.
    pub fn surcharge_percent(&self) -> f64 {
        match self {
            PaintCondition::Excellent | PaintCondition::Good | PaintCondition::Fair => 0.0,
            PaintCondition::Poor => 10.0,
            PaintCondition::Missing => 15.0,
        }
    }
}

/// Growth tier table: (upper bound of slider span, percent at span start,
/// percent at span end). Spans start where the previous one ends, so the
/// curve is continuous. Slider values are diver-assessed 0-100.
const GROWTH_TIERS: [(f64, f64, f64, &str); 4] = [
    (20.0, 0.0, 0.0, "minimal"),
    (35.0, 0.0, 25.0, "light"),
    (60.0, 25.0, 50.0, "moderate"),
    (100.0, 50.0, 200.0, "heavy"),
];

/// Surcharge percent for a biofouling growth level, interpolated linearly
/// within its tier. Out-of-range input is clamped to [0, 100].
pub fn growth_surcharge_percent(level: f64) -> f64 {
    let level = level.clamp(0.0, 100.0);
    let mut lower = 0.0;
    for (upper, start_pct, end_pct, _) in GROWTH_TIERS {
        if level <= upper {
            let span = upper - lower;
            let fraction = if span > 0.0 { (level - lower) / span } else { 0.0 };
            return start_pct + (end_pct - start_pct) * fraction;
        }
        lower = upper;
    }
    200.0
}

/// Tier name for the condition log and the invoice line label.
pub fn growth_tier_name(level: f64) -> &'static str {
    let level = level.clamp(0.0, 100.0);
    for (upper, _, _, name) in GROWTH_TIERS {
        if level <= upper {
            return name;
        }
    }
    "heavy"
}
