//! Calculator inputs.
//!
//! [`FormInput`] mirrors the form exactly as the user typed it: numeric
//! fields are free text and may be empty or half-typed. [`CalculationInput`]
//! is the parsed, typed snapshot the accounting engine consumes. Parsing
//! never fails; unreadable text degrades to zero or a configured default.

use serde::{Deserialize, Serialize};

use super::material::MaterialKind;
use super::plate::{Plate, PlateEntry};
use crate::config::EngineConfig;
use crate::metadata::numbers::parse_leading_f64;

/// Most spools the stock can hold.
pub const MAX_SPOOLS: u32 = 4;

/// Typed snapshot of everything the accounting engine needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// g/cm³.
    pub material_density: f64,
    pub filament_diameter_mm: f64,
    pub gross_weight_g: f64,
    pub empty_spool_weight_g: f64,
    /// Derive net available from `input_percentage_pct` of capacity instead of weighing.
    pub is_percentage_mode: bool,
    /// 0–100.
    pub input_percentage_pct: f64,
    pub spool_capacity_g: f64,
    /// 1..=[`MAX_SPOOLS`]. Spool 0 is the measured one; the rest are full.
    pub spool_quantity: u32,
    pub is_advanced_mode: bool,
    /// Job weight in simple mode.
    pub print_weight_g: f64,
    /// Job plates in advanced mode.
    pub plates: Vec<Plate>,
    pub cost_per_kg: f64,
    pub is_waste_calc_enabled: bool,
    pub number_of_colors: u32,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            material_density: MaterialKind::Pla.default_density(),
            filament_diameter_mm: 1.75,
            gross_weight_g: 0.0,
            empty_spool_weight_g: 0.0,
            is_percentage_mode: false,
            input_percentage_pct: 100.0,
            spool_capacity_g: 1000.0,
            spool_quantity: 1,
            is_advanced_mode: false,
            print_weight_g: 0.0,
            plates: Vec::new(),
            cost_per_kg: 0.0,
            is_waste_calc_enabled: false,
            number_of_colors: 1,
        }
    }
}

/// The calculator form as typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    pub material: MaterialKind,
    /// Only read when `material` is [`MaterialKind::Custom`].
    #[serde(default)]
    pub custom_density: String,
    pub filament_diameter: String,
    pub gross_weight: String,
    pub spool_weight: String,
    pub print_weight: String,
    pub is_advanced: bool,
    pub plates: Vec<PlateEntry>,
    pub cost_per_kg: String,
    /// When unset, `spool_capacity` is ignored and the configured default is used.
    pub is_custom_capacity: bool,
    pub spool_capacity: String,
    pub is_percentage_mode: bool,
    pub input_percentage: String,
    pub spool_quantity: u32,
    pub is_waste_calc_enabled: bool,
    pub number_of_colors: u32,
}

/// Format a default for pre-filling a text field (`1250.0` → `"1250"`).
fn prefill(value: f64) -> String {
    format!("{value}")
}

/// A finite number from free text, or `None`.
fn read_number(text: &str) -> Option<f64> {
    parse_leading_f64(text).filter(|v| v.is_finite())
}

/// Weights, costs: unreadable → 0, never negative.
fn read_non_negative(text: &str) -> f64 {
    read_number(text).unwrap_or(0.0).max(0.0)
}

/// Diameter, density: unreadable or non-positive → `default`.
fn read_positive_or(text: &str, default: f64) -> f64 {
    read_number(text).filter(|v| *v > 0.0).unwrap_or(default)
}

impl FormInput {
    /// A fresh form pre-filled from `config`: one blank plate, one spool,
    /// weighing mode.
    pub fn with_defaults(config: &EngineConfig) -> Self {
        let d = &config.defaults;
        Self {
            material: MaterialKind::Pla,
            custom_density: prefill(d.density_g_cm3),
            filament_diameter: prefill(d.filament_diameter_mm),
            gross_weight: prefill(d.gross_weight_g),
            spool_weight: prefill(d.empty_spool_g),
            print_weight: String::new(),
            is_advanced: false,
            plates: vec![PlateEntry::blank()],
            cost_per_kg: if d.cost_per_kg > 0.0 {
                prefill(d.cost_per_kg)
            } else {
                String::new()
            },
            is_custom_capacity: false,
            spool_capacity: prefill(d.spool_capacity_g),
            is_percentage_mode: false,
            input_percentage: "100".to_string(),
            spool_quantity: 1,
            is_waste_calc_enabled: false,
            number_of_colors: 1,
        }
    }

    /// Parse the form into a [`CalculationInput`].
    ///
    /// - weights, cost: unreadable → 0, negatives → 0
    /// - percentage: unreadable → 0, clamped to 0–100
    /// - diameter, density: unreadable or non-positive → configured default
    /// - capacity: configured default unless `is_custom_capacity`; an explicit
    ///   `0` is kept (the engine reports one spool needed)
    /// - spool quantity clamped to 1..=[`MAX_SPOOLS`], colors to at least 1
    pub fn to_calculation_input(&self, config: &EngineConfig) -> CalculationInput {
        let d = &config.defaults;
        let catalog = config.catalog();

        let material_density = match self.material {
            MaterialKind::Custom => read_positive_or(&self.custom_density, d.density_g_cm3),
            kind => catalog.density_of(kind),
        };

        let spool_capacity_g = if self.is_custom_capacity {
            read_number(&self.spool_capacity)
                .map(|v| v.max(0.0))
                .unwrap_or(d.spool_capacity_g)
        } else {
            d.spool_capacity_g
        };

        let plates = self
            .plates
            .iter()
            .map(|p| Plate {
                id: p.id,
                mass_g: read_non_negative(&p.mass),
            })
            .collect();

        CalculationInput {
            material_density,
            filament_diameter_mm: read_positive_or(&self.filament_diameter, d.filament_diameter_mm),
            gross_weight_g: read_non_negative(&self.gross_weight),
            empty_spool_weight_g: read_non_negative(&self.spool_weight),
            is_percentage_mode: self.is_percentage_mode,
            input_percentage_pct: read_number(&self.input_percentage)
                .unwrap_or(0.0)
                .clamp(0.0, 100.0),
            spool_capacity_g,
            spool_quantity: self.spool_quantity.clamp(1, MAX_SPOOLS),
            is_advanced_mode: self.is_advanced,
            print_weight_g: read_non_negative(&self.print_weight),
            plates,
            cost_per_kg: read_non_negative(&self.cost_per_kg),
            is_waste_calc_enabled: self.is_waste_calc_enabled,
            number_of_colors: self.number_of_colors.max(1),
        }
    }
}
