//! Project file import command handlers.
//!
//! An import resolves a sliced file to a filament mass and writes it into the
//! form. Resolution runs without holding the calculator lock; the lock is only
//! taken for the short write-back at the end.
//!
//! # Error contract
//! Every fallible path returns `Result<_, AppError>`, with the message
//! shortened to `resolver.max_message_len` for display. No `unwrap()` or
//! `expect()` calls are present outside of `#[cfg(test)]`.

use std::path::Path;
use std::sync::RwLock;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::models::PlateEntry;
use crate::resolver::ResolveError;
use crate::state::{AppState, CalculatorState};

use super::calculator::CalculatorSnapshot;
use super::write_calculator;

/// Outcome of a successful import.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Mass read from the file.
    pub grams: f64,
    /// The form after the mass was written back.
    pub snapshot: CalculatorSnapshot,
}

/// Format grams for a text field: two decimals, trailing zeros stripped
/// (`23.50` → `"23.5"`, `18.00` → `"18"`).
pub fn format_grams(grams: f64) -> String {
    let s = format!("{grams:.2}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Write `grams` into the form.
///
/// Simple mode replaces the print weight. Advanced mode fills the first blank
/// plate, or appends a new plate when every plate already has a mass.
pub fn apply_imported_weight(calc: &mut CalculatorState, grams: f64, config: &EngineConfig) {
    let text = format_grams(grams);
    if calc.form.is_advanced {
        match calc.form.plates.iter_mut().find(|p| p.is_blank()) {
            Some(plate) => plate.mass = text,
            None => calc.form.plates.push(PlateEntry {
                mass: text,
                ..PlateEntry::blank()
            }),
        }
    } else {
        calc.form.print_weight = text;
    }
    calc.recompute(config);
}

fn write_back(
    grams: f64,
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<ImportOutcome, AppError> {
    let mut calc = write_calculator(lock)?;
    apply_imported_weight(&mut calc, grams, config);
    Ok(ImportOutcome {
        grams,
        snapshot: CalculatorSnapshot::from(&*calc),
    })
}

fn display_error(e: ResolveError, config: &EngineConfig) -> AppError {
    AppError::from(e).truncated(config.resolver.max_message_len)
}

// ── import_project_file ───────────────────────────────────────────────────────

/// Resolve the file at `path` and write its mass into the form.
///
/// 1. Rejects unsupported extensions before touching the disk.
/// 2. Reads and scans the file off the async runtime.
/// 3. Writes the mass back and recomputes.
pub async fn import_project_file(path: &Path, state: &AppState) -> Result<ImportOutcome, AppError> {
    let grams = state
        .resolver
        .resolve_file(path)
        .await
        .map_err(|e| display_error(e, &state.config))?;
    write_back(grams, &state.calculator, &state.config)
}

// ── import_project_bytes ──────────────────────────────────────────────────────

/// Like [`import_project_file`], for an upload already in memory.
pub async fn import_project_bytes(
    file_name: &str,
    bytes: Vec<u8>,
    state: &AppState,
) -> Result<ImportOutcome, AppError> {
    let grams = state
        .resolver
        .resolve(file_name, bytes)
        .await
        .map_err(|e| display_error(e, &state.config))?;
    write_back(grams, &state.calculator, &state.config)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::calculator::{add_plate, get_snapshot, update_form, update_plate};
    use crate::config::ResolverConfig;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn advanced(state: &AppState) {
        let mut form = get_snapshot(state).expect("snapshot").form;
        form.is_advanced = true;
        update_form(form, state).expect("update");
    }

    #[test]
    fn format_grams_strips_trailing_zeros() {
        assert_eq!(format_grams(23.5), "23.5");
        assert_eq!(format_grams(18.0), "18");
        assert_eq!(format_grams(20.8), "20.8");
        assert_eq!(format_grams(1.234), "1.23");
        assert_eq!(format_grams(0.0), "0");
    }

    #[tokio::test]
    async fn simple_mode_import_sets_print_weight() {
        let state = AppState::default();
        let outcome = import_project_bytes(
            "part.gcode",
            b"; filament used [g] = 12.50, 8.30\n".to_vec(),
            &state,
        )
        .await
        .expect("import");
        assert!(approx(outcome.grams, 20.8));
        assert_eq!(outcome.snapshot.form.print_weight, "20.8");
        assert!(approx(outcome.snapshot.result.required_g, 20.8));
    }

    #[tokio::test]
    async fn advanced_mode_import_fills_first_blank_plate() {
        let state = AppState::default();
        advanced(&state);
        let first = get_snapshot(&state).expect("snapshot").form.plates[0].id;
        update_plate(&first.to_string(), "10".to_string(), &state).expect("fill first");
        let blank = add_plate(&state).expect("add");

        let outcome = import_project_bytes("p.gcode", b"; filament used [g] = 5".to_vec(), &state)
            .await
            .expect("import");
        let plates = &outcome.snapshot.form.plates;
        assert_eq!(plates.len(), 2);
        assert_eq!(plates[1].id, blank.id);
        assert_eq!(plates[1].mass, "5");
        assert!(approx(outcome.snapshot.result.required_g, 15.0));
    }

    #[tokio::test]
    async fn advanced_mode_import_appends_when_no_blank_plate() {
        let state = AppState::default();
        advanced(&state);
        let first = get_snapshot(&state).expect("snapshot").form.plates[0].id;
        update_plate(&first.to_string(), "10".to_string(), &state).expect("fill first");

        let outcome = import_project_bytes("p.gcode", b"; filament used [g] = 7.25".to_vec(), &state)
            .await
            .expect("import");
        let plates = &outcome.snapshot.form.plates;
        assert_eq!(plates.len(), 2);
        assert_eq!(plates[1].mass, "7.25");
        assert_ne!(plates[1].id, first);
    }

    #[tokio::test]
    async fn failed_import_leaves_form_untouched() {
        let state = AppState::default();
        let before = get_snapshot(&state).expect("snapshot").form;
        let err = import_project_bytes("p.gcode", b"G28\n".to_vec(), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MetadataNotFound(_)));
        assert_eq!(get_snapshot(&state).expect("snapshot").form, before);
    }

    #[tokio::test]
    async fn error_messages_are_truncated_for_display() {
        let mut config = EngineConfig::default();
        config.resolver = ResolverConfig {
            max_message_len: 20,
            ..ResolverConfig::default()
        };
        let state = AppState::new(config);
        let err = import_project_bytes("model.stl", Vec::new(), &state)
            .await
            .unwrap_err();
        match err {
            AppError::UnsupportedFormat(m) => {
                assert_eq!(m.chars().count(), 20);
                assert!(m.ends_with("..."));
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn import_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("Cube.GCODE");
        std::fs::write(&path, "; total filament used [g] : 33.10\n").expect("write");

        let state = AppState::default();
        let outcome = import_project_file(&path, &state).await.expect("import");
        assert_eq!(outcome.snapshot.form.print_weight, "33.1");
    }

    #[tokio::test]
    async fn import_missing_file_is_io_error() {
        let state = AppState::default();
        let err = import_project_file(Path::new("/nonexistent/spoolwise/a.3mf"), &state)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Io(_)));
    }
}
