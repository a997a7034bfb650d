//! Build-plate data model for multi-plate projects.
//!
//! A project in advanced mode is an ordered list of plates, each one physical
//! bed load. Order only matters for display; the engine sums the masses.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A plate with a parsed mass, as consumed by the accounting engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plate {
    /// Unique within the owning project.
    pub id: Uuid,
    /// Filament mass for this plate in grams, never negative.
    pub mass_g: f64,
}

/// A plate row as typed in the form. `mass` is free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlateEntry {
    pub id: Uuid,
    #[serde(default)]
    pub mass: String,
}

impl PlateEntry {
    /// A new row with a fresh ID and no mass entered.
    pub fn blank() -> Self {
        Self {
            id: Uuid::new_v4(),
            mass: String::new(),
        }
    }

    /// `true` when nothing (or only whitespace) has been typed.
    pub fn is_blank(&self) -> bool {
        self.mass.trim().is_empty()
    }
}
