//! Filament material catalog.
//!
//! [`MaterialKind`] names the materials a user can pick; each has a default
//! density in g/cm³. [`MaterialCatalog`] is the resolved list after applying
//! density overrides from the engine config.

use serde::{Deserialize, Serialize};

/// A selectable filament material.
///
/// Serialized as a snake_case string (e.g. `"pla"`, `"petg"`). `Custom` lets
/// the user type an arbitrary density.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialKind {
    #[default]
    Pla,
    Abs,
    Petg,
    Tpu,
    Asa,
    Pc,
    Nylon,
    Custom,
}

impl MaterialKind {
    /// Every material in display order.
    pub const ALL: [MaterialKind; 8] = [
        MaterialKind::Pla,
        MaterialKind::Abs,
        MaterialKind::Petg,
        MaterialKind::Tpu,
        MaterialKind::Asa,
        MaterialKind::Pc,
        MaterialKind::Nylon,
        MaterialKind::Custom,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            MaterialKind::Pla => "PLA",
            MaterialKind::Abs => "ABS",
            MaterialKind::Petg => "PETG",
            MaterialKind::Tpu => "TPU",
            MaterialKind::Asa => "ASA",
            MaterialKind::Pc => "PC",
            MaterialKind::Nylon => "Nylon",
            MaterialKind::Custom => "Custom",
        }
    }

    /// Density in g/cm³ before any config override.
    pub fn default_density(self) -> f64 {
        match self {
            MaterialKind::Pla => 1.24,
            MaterialKind::Abs => 1.04,
            MaterialKind::Petg => 1.27,
            MaterialKind::Tpu => 1.21,
            MaterialKind::Asa => 1.07,
            MaterialKind::Pc => 1.20,
            MaterialKind::Nylon => 1.15,
            MaterialKind::Custom => 1.24,
        }
    }
}

/// One catalog entry as sent to the frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub kind: MaterialKind,
    pub name: String,
    /// Density in g/cm³.
    pub density: f64,
}

/// The material list with config overrides applied, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialCatalog {
    entries: Vec<Material>,
}

impl MaterialCatalog {
    /// Build the catalog, replacing default densities with `overrides`.
    /// A later override for the same kind wins.
    pub fn with_overrides(overrides: &[(MaterialKind, f64)]) -> Self {
        let entries = MaterialKind::ALL
            .iter()
            .map(|&kind| {
                let density = overrides
                    .iter()
                    .rev()
                    .find(|(k, _)| *k == kind)
                    .map(|(_, d)| *d)
                    .unwrap_or_else(|| kind.default_density());
                Material {
                    kind,
                    name: kind.display_name().to_string(),
                    density,
                }
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[Material] {
        &self.entries
    }

    /// Density of `kind` in g/cm³.
    pub fn density_of(&self, kind: MaterialKind) -> f64 {
        self.entries
            .iter()
            .find(|m| m.kind == kind)
            .map(|m| m.density)
            .unwrap_or_else(|| kind.default_density())
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::with_overrides(&[])
    }
}
