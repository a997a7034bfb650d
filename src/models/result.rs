//! Derived calculator output.
//!
//! [`CalculationResult`] is recomputed from scratch on every input change.
//! Intermediate values keep their true sign (a negative
//! `remaining_after_print_g` is how shortfall is reported); clamping for
//! display happens through the helpers here, not inside the engine.

use serde::{Deserialize, Serialize};

/// Fill state of one physical spool after the job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoolStatus {
    Full,
    Partial,
    Empty,
    /// Only ever set on spool 0, when the whole stock cannot cover the job.
    Insufficient,
}

/// At or above this percentage a spool counts as full.
pub const FULL_THRESHOLD_PCT: f64 = 99.9;

impl SpoolStatus {
    /// Status for a fill percentage, ignoring insufficiency.
    pub fn from_percentage(pct: f64) -> Self {
        if pct >= FULL_THRESHOLD_PCT {
            SpoolStatus::Full
        } else if pct > 0.0 {
            SpoolStatus::Partial
        } else {
            SpoolStatus::Empty
        }
    }
}

/// One entry of the per-spool breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpoolState {
    pub index: usize,
    /// 0–100.
    pub percentage_full: f64,
    pub status: SpoolStatus,
}

/// Everything the calculator derives from one [`super::CalculationInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Filament on the measured spool.
    pub net_available_g: f64,
    /// Measured spool plus every additional (full) spool.
    pub total_inventory_g: f64,
    /// Filament the job needs, waste included.
    pub required_g: f64,
    /// Whole-project weight, waste included.
    pub total_project_weight_g: f64,
    /// At least 1.
    pub spools_needed_count: u32,
    /// Inventory minus requirement; negative on shortfall.
    pub remaining_after_print_g: f64,
    /// Remaining as a percentage of one spool's capacity. Unclamped.
    pub remaining_percentage: f64,
    pub is_insufficient: bool,
    pub per_spool_state: Vec<SpoolState>,
    pub estimated_length_m: f64,
    pub print_cost: f64,
}

impl CalculationResult {
    /// Remaining filament as shown to the user: never below zero.
    pub fn display_remaining_g(&self) -> f64 {
        self.remaining_after_print_g.max(0.0)
    }

    /// Remaining percentage as fed to a gauge: clamped to 0–100.
    pub fn display_remaining_percentage(&self) -> f64 {
        clamp_percentage(self.remaining_percentage)
    }
}

/// Clamp `pct` to 0–100 for display. NaN reads as 0.
pub fn clamp_percentage(pct: f64) -> f64 {
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}
