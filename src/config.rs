//! Engine configuration loaded from TOML.
//!
//! Every section has a compiled-in default, so a config file only needs the
//! keys it changes. `config/engine.toml` ships the full default set.

use std::path::Path;

use crate::models::{MaterialCatalog, MaterialKind};

/// Errors raised while loading or validating an [`EngineConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(String),
    #[error("cannot parse config: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct EngineConfig {
    pub defaults: DefaultsConfig,
    /// Density overrides for the material catalog.
    pub materials: Vec<MaterialDensityConfig>,
    pub resolver: ResolverConfig,
}

/// `[defaults]` — values used when a form field is empty or unparsable.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DefaultsConfig {
    pub filament_diameter_mm: f64,
    pub spool_capacity_g: f64,
    /// Density of [`MaterialKind::Custom`]: pre-fills its text box, stands in
    /// when that box is unreadable, and is its catalog entry unless a
    /// `[[materials]]` override names `custom`.
    pub density_g_cm3: f64,
    /// Pre-filled empty-reel weight for a new form.
    pub empty_spool_g: f64,
    /// Pre-filled gross weight for a new form.
    pub gross_weight_g: f64,
    /// Pre-filled cost per kilogram; `0` leaves the field empty.
    pub cost_per_kg: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            filament_diameter_mm: 1.75,
            spool_capacity_g: 1000.0,
            density_g_cm3: 1.24,
            empty_spool_g: 250.0,
            gross_weight_g: 1250.0,
            cost_per_kg: 0.0,
        }
    }
}

/// `[[materials]]` — one density override.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MaterialDensityConfig {
    pub kind: MaterialKind,
    pub density: f64,
}

/// `[resolver]` — which files the project resolver accepts and scans.
///
/// Extensions are written without the leading dot and matched
/// case-insensitively.
#[derive(Debug, Clone, PartialEq, serde::Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ResolverConfig {
    /// Single-file text uploads.
    pub gcode_extensions: Vec<String>,
    /// Packaged project archives.
    pub archive_extensions: Vec<String>,
    /// Name fragments of consolidated slice summaries; scanned first.
    pub summary_markers: Vec<String>,
    /// Per-plate G-code inside an archive; scanned second.
    pub layer_extensions: Vec<String>,
    /// Config/metadata entries; scanned last.
    pub metadata_extensions: Vec<String>,
    /// Name fragments of model and relationship entries, never scanned.
    pub excluded_markers: Vec<String>,
    /// Longest error message shown to the user before truncation.
    pub max_message_len: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        fn strings(items: &[&str]) -> Vec<String> {
            items.iter().map(|s| s.to_string()).collect()
        }
        Self {
            gcode_extensions: strings(&["gcode"]),
            archive_extensions: strings(&["3mf"]),
            summary_markers: strings(&["slice_info.xml", "slice_info.config"]),
            layer_extensions: strings(&["gcode"]),
            metadata_extensions: strings(&["config", "xml", "json"]),
            excluded_markers: strings(&[".model", ".rels"]),
            max_message_len: 80,
        }
    }
}

/// The default config file shipped with the crate.
const BUILTIN_TOML: &str = include_str!("../config/engine.toml");

impl EngineConfig {
    /// The embedded `config/engine.toml`.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::parse(BUILTIN_TOML)
    }

    /// Parse a TOML string into an [`EngineConfig`], running validation.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let cfg: EngineConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text)
    }

    /// The material catalog: `defaults.density_g_cm3` for `Custom`, then the
    /// `[[materials]]` overrides.
    pub fn catalog(&self) -> MaterialCatalog {
        let overrides: Vec<(MaterialKind, f64)> =
            std::iter::once((MaterialKind::Custom, self.defaults.density_g_cm3))
                .chain(self.materials.iter().map(|m| (m.kind, m.density)))
                .collect();
        MaterialCatalog::with_overrides(&overrides)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.defaults;
        for (name, value) in [
            ("defaults.filament_diameter_mm", d.filament_diameter_mm),
            ("defaults.spool_capacity_g", d.spool_capacity_g),
            ("defaults.density_g_cm3", d.density_g_cm3),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        for (name, value) in [
            ("defaults.empty_spool_g", d.empty_spool_g),
            ("defaults.gross_weight_g", d.gross_weight_g),
            ("defaults.cost_per_kg", d.cost_per_kg),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must not be negative")));
            }
        }

        for m in &self.materials {
            if !(m.density.is_finite() && m.density > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "density for {} must be positive",
                    m.kind.display_name()
                )));
            }
        }

        let r = &self.resolver;
        if r.gcode_extensions.is_empty() && r.archive_extensions.is_empty() {
            return Err(ConfigError::Invalid(
                "resolver must accept at least one file extension".to_string(),
            ));
        }
        if !r.archive_extensions.is_empty()
            && r.summary_markers.is_empty()
            && r.layer_extensions.is_empty()
            && r.metadata_extensions.is_empty()
        {
            return Err(ConfigError::Invalid(
                "resolver.archive_extensions requires at least one candidate rule".to_string(),
            ));
        }
        if r.max_message_len < 4 {
            return Err(ConfigError::Invalid(
                "resolver.max_message_len must be at least 4".to_string(),
            ));
        }

        Ok(())
    }
}
