use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::rates::ANODE_LABOR_RATE;
use super::round_cents;

/// One line in the anode cart: a catalog part plus how many the diver will
/// install. `inventory_id` links back to the stock record when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnodeLine {
    pub quantity: u32,
    pub unit_price: f64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_id: Option<String>,
}

/// Quantity-keyed anode selection. Keys are catalog SKUs; a quantity that
/// drops to zero removes the entry so the cart never carries dead lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnodeSelection {
    pub items: BTreeMap<String, AnodeLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnodeTotals {
    pub unit_count: u32,
    pub parts_subtotal: f64,
    pub labor_subtotal: f64,
    pub items: Vec<(String, AnodeLine)>,
}

impl AnodeSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adjust the quantity for a catalog item by `delta` (positive or
    /// negative). Quantities clamp at zero and never go negative; a zero
    /// delta leaves the selection untouched.
    pub fn add_unit(
        &mut self,
        key: &str,
        delta: i32,
        unit_price: f64,
        name: &str,
        inventory_id: Option<String>,
    ) {
        let current = self.items.get(key).map(|line| line.quantity).unwrap_or(0);
        let updated = if delta.is_negative() {
            current.saturating_sub(delta.unsigned_abs())
        } else {
            current + delta as u32
        };

        if updated == 0 {
            self.items.remove(key);
        } else {
            self.items.insert(
                key.to_string(),
                AnodeLine {
                    quantity: updated,
                    unit_price,
                    name: name.to_string(),
                    inventory_id,
                },
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Parts cost and the fixed per-unit installation labor, tracked
    /// separately so the invoice can itemize them.
    pub fn totals(&self) -> AnodeTotals {
        let unit_count: u32 = self.items.values().map(|line| line.quantity).sum();
        let parts_subtotal: f64 = self
            .items
            .values()
            .map(|line| line.quantity as f64 * line.unit_price)
            .sum();
        let labor_subtotal = unit_count as f64 * ANODE_LABOR_RATE;

        AnodeTotals {
            unit_count,
            parts_subtotal: round_cents(parts_subtotal),
            labor_subtotal: round_cents(labor_subtotal),
            items: self
                .items
                .iter()
                .map(|(key, line)| (key.clone(), line.clone()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_with_labor() {
        let mut selection = AnodeSelection::new();
        selection.add_unit("ZN-30MM", 2, 45.0, "30mm Shaft Zinc", None);
        selection.add_unit("ZN-PROP", 1, 32.50, "Prop Nut Zinc", Some("inv-17".to_string()));

        let totals = selection.totals();
        assert_eq!(totals.unit_count, 3);
        assert_eq!(totals.parts_subtotal, 122.50);
        assert_eq!(totals.labor_subtotal, 45.0);
        assert_eq!(totals.items.len(), 2);
    }

    #[test]
    fn test_quantity_clamps_at_zero() {
        let mut selection = AnodeSelection::new();
        selection.add_unit("ZN-30MM", -3, 45.0, "30mm Shaft Zinc", None);
        assert!(selection.is_empty());

        selection.add_unit("ZN-30MM", 2, 45.0, "30mm Shaft Zinc", None);
        selection.add_unit("ZN-30MM", -5, 45.0, "30mm Shaft Zinc", None);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_reaching_zero_removes_entry() {
        let mut selection = AnodeSelection::new();
        selection.add_unit("ZN-30MM", 2, 45.0, "30mm Shaft Zinc", None);
        selection.add_unit("ZN-30MM", -2, 45.0, "30mm Shaft Zinc", None);
        assert!(!selection.items.contains_key("ZN-30MM"));
        assert_eq!(selection.totals().unit_count, 0);
    }

    #[test]
    fn test_zero_delta_is_idempotent() {
        let mut selection = AnodeSelection::new();
        selection.add_unit("ZN-30MM", 2, 45.0, "30mm Shaft Zinc", None);
        let before = selection.clone();

        selection.add_unit("ZN-30MM", 0, 45.0, "30mm Shaft Zinc", None);
        selection.add_unit("ZN-30MM", 0, 45.0, "30mm Shaft Zinc", None);
        assert_eq!(selection, before);
    }

    #[test]
    fn test_add_then_remove_round_trips() {
        let mut selection = AnodeSelection::new();
        selection.add_unit("ZN-PROP", 1, 32.50, "Prop Nut Zinc", None);
        let before = selection.clone();

        selection.add_unit("ZN-30MM", 4, 45.0, "30mm Shaft Zinc", None);
        selection.add_unit("ZN-30MM", -4, 45.0, "30mm Shaft Zinc", None);
        assert_eq!(selection, before);
    }
}
