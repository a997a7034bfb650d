//! Filament accounting engine.
//!
//! [`compute`] turns a [`CalculationInput`] into a fresh [`CalculationResult`].
//! It is pure and total: no I/O, no shared state, no error path. Calling it
//! twice with the same input yields the same output.
//!
//! # Steps
//! 1. Net available on the measured spool (percentage of capacity, or
//!    gross − empty floored at zero).
//! 2. Total inventory = net + (quantity − 1) × capacity.
//! 3. Project weight: sum of plates (advanced) or the print weight.
//! 4. Waste multiplier `1 + 0.05 × (colors − 1)` when enabled.
//! 5. Spools needed = ⌈project / capacity⌉, at least 1.
//! 6. Remaining = inventory − required; negative means insufficient.
//! 7. Per-spool breakdown ([`distribution`]).
//! 8. Length of the inventory ([`physical`]).
//! 9. Cost = project kg × cost per kg.

pub mod distribution;
pub mod physical;

use crate::models::{CalculationInput, CalculationResult, MAX_SPOOLS};

/// Extra material per additional color, as a fraction of the job weight.
/// A flat purge heuristic, not a physical model.
pub const WASTE_RATE_PER_EXTRA_COLOR: f64 = 0.05;

// Only reached by inputs built without the form layer, which substitutes
// the configured defaults first.
const FALLBACK_DENSITY_G_CM3: f64 = 1.24;
const FALLBACK_DIAMETER_MM: f64 = 1.75;

/// Filament on the measured spool.
pub fn net_available_g(input: &CalculationInput) -> f64 {
    if input.is_percentage_mode {
        input.input_percentage_pct.clamp(0.0, 100.0) / 100.0 * input.spool_capacity_g
    } else {
        (input.gross_weight_g - input.empty_spool_weight_g).max(0.0)
    }
}

/// Job weight before waste: the plate sum in advanced mode, otherwise the
/// single print weight. Advanced mode with no plates uses the print weight.
pub fn base_project_weight_g(input: &CalculationInput) -> f64 {
    if input.is_advanced_mode && !input.plates.is_empty() {
        input.plates.iter().map(|p| p.mass_g.max(0.0)).sum()
    } else {
        input.print_weight_g.max(0.0)
    }
}

/// Multiplier applied to the job weight for multi-color purge waste.
pub fn waste_factor(input: &CalculationInput) -> f64 {
    if input.is_waste_calc_enabled && input.number_of_colors > 1 {
        1.0 + WASTE_RATE_PER_EXTRA_COLOR * f64::from(input.number_of_colors - 1)
    } else {
        1.0
    }
}

/// ⌈`weight_g` / `capacity_g`⌉, at least 1. A non-positive capacity counts as
/// one spool.
pub fn spools_needed(weight_g: f64, capacity_g: f64) -> u32 {
    if capacity_g <= 0.0 {
        return 1;
    }
    ((weight_g / capacity_g).ceil() as u32).max(1)
}

/// Derive every output field from `input`.
pub fn compute(input: &CalculationInput) -> CalculationResult {
    let capacity_g = input.spool_capacity_g;
    let spool_count = input.spool_quantity.clamp(1, MAX_SPOOLS);

    let net_available_g = net_available_g(input);
    let total_inventory_g = net_available_g + f64::from(spool_count - 1) * capacity_g;

    let factor = waste_factor(input);
    let total_project_weight_g = base_project_weight_g(input) * factor;
    // The requirement is checked against the whole project, not the first plate.
    let required_g = total_project_weight_g;

    let spools_needed_count = spools_needed(total_project_weight_g, capacity_g);

    let remaining_after_print_g = total_inventory_g - required_g;
    let is_insufficient = remaining_after_print_g < 0.0;
    let remaining_percentage = if capacity_g > 0.0 {
        remaining_after_print_g / capacity_g * 100.0
    } else {
        0.0
    };

    let per_spool_state = distribution::distribute(
        remaining_after_print_g.max(0.0),
        capacity_g,
        spool_count as usize,
        is_insufficient,
    );

    let density = if input.material_density > 0.0 {
        input.material_density
    } else {
        FALLBACK_DENSITY_G_CM3
    };
    let diameter = if input.filament_diameter_mm > 0.0 {
        input.filament_diameter_mm
    } else {
        FALLBACK_DIAMETER_MM
    };
    let estimated_length_m = physical::length_m(total_inventory_g, density, diameter);

    let print_cost = total_project_weight_g / 1000.0 * input.cost_per_kg;

    CalculationResult {
        net_available_g,
        total_inventory_g,
        required_g,
        total_project_weight_g,
        spools_needed_count,
        remaining_after_print_g,
        remaining_percentage,
        is_insufficient,
        per_spool_state,
        estimated_length_m,
        print_cost,
    }
}
