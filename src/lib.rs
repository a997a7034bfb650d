//! Spoolwise — 3D-printer filament calculator.
//!
//! - [`accounting`] — stock, requirement and per-spool breakdown
//! - [`metadata`]   — filament mass from slicer G-code and config text
//! - [`resolver`]   — `.gcode` / `.3mf` uploads to a mass in grams
//! - [`commands`]   — stateful form handlers over [`state::AppState`]
//!
//! Front ends call [`logging::init_tracing`] once at startup, load an
//! [`config::EngineConfig`] and build an [`state::AppState`] from it.

pub mod accounting;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod models;
pub mod resolver;
pub mod state;

pub use accounting::compute;
pub use metadata::extract_mass_grams;
pub use resolver::{resolve_project_file, resolve_project_weight};
