//! Calculator command handlers: form edits, the plate list, and queries.
//!
//! Every mutating handler recomputes the result before releasing the write
//! lock, so a snapshot never pairs a form with a stale result.

use std::sync::RwLock;

use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::AppError;
use crate::models::{CalculationResult, FormInput, Material, PlateEntry};
use crate::state::{AppState, CalculatorState};

use super::{parse_entity_id, read_calculator, write_calculator};

/// The form and its derived result, as sent to the frontend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorSnapshot {
    pub form: FormInput,
    pub result: CalculationResult,
}

impl From<&CalculatorState> for CalculatorSnapshot {
    fn from(c: &CalculatorState) -> Self {
        Self {
            form: c.form.clone(),
            result: c.result.clone(),
        }
    }
}

// ── get_snapshot ──────────────────────────────────────────────────────────────

pub(crate) fn get_snapshot_inner(
    lock: &RwLock<CalculatorState>,
) -> Result<CalculatorSnapshot, AppError> {
    let calc = read_calculator(lock)?;
    Ok(CalculatorSnapshot::from(&*calc))
}

// ── update_form ───────────────────────────────────────────────────────────────

/// Replace the whole form. An empty plate list is topped up with one blank
/// plate; the form always has at least one.
pub(crate) fn update_form_inner(
    mut form: FormInput,
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<CalculatorSnapshot, AppError> {
    if form.plates.is_empty() {
        form.plates.push(PlateEntry::blank());
    }
    let mut calc = write_calculator(lock)?;
    calc.form = form;
    calc.recompute(config);
    Ok(CalculatorSnapshot::from(&*calc))
}

// ── add_plate ─────────────────────────────────────────────────────────────────

/// Append a blank plate and return it.
pub(crate) fn add_plate_inner(
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<PlateEntry, AppError> {
    let plate = PlateEntry::blank();
    let mut calc = write_calculator(lock)?;
    calc.form.plates.push(plate.clone());
    calc.recompute(config);
    tracing::debug!(plate = %plate.id, count = calc.form.plates.len(), "plate added");
    Ok(plate)
}

// ── remove_plate ──────────────────────────────────────────────────────────────

/// Remove the plate with `id`.
///
/// Returns [`AppError::NotFound`] for an unknown ID and
/// [`AppError::InvalidInput`] when it is the only plate left.
pub(crate) fn remove_plate_inner(
    id: &str,
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<CalculatorSnapshot, AppError> {
    let uuid = parse_entity_id(id, "plate")?;
    let mut calc = write_calculator(lock)?;

    let pos = calc
        .form
        .plates
        .iter()
        .position(|p| p.id == uuid)
        .ok_or_else(|| AppError::NotFound(format!("plate {id} not found")))?;
    if calc.form.plates.len() == 1 {
        return Err(AppError::InvalidInput(
            "cannot remove the last plate".to_string(),
        ));
    }

    calc.form.plates.remove(pos);
    calc.recompute(config);
    Ok(CalculatorSnapshot::from(&*calc))
}

// ── update_plate ──────────────────────────────────────────────────────────────

/// Set the mass text of the plate with `id`.
pub(crate) fn update_plate_inner(
    id: &str,
    mass: String,
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<CalculatorSnapshot, AppError> {
    let uuid = parse_entity_id(id, "plate")?;
    let mut calc = write_calculator(lock)?;

    let entry = calc
        .form
        .plates
        .iter_mut()
        .find(|p| p.id == uuid)
        .ok_or_else(|| AppError::NotFound(format!("plate {id} not found")))?;
    entry.mass = mass;

    calc.recompute(config);
    Ok(CalculatorSnapshot::from(&*calc))
}

// ── reset_calculator ──────────────────────────────────────────────────────────

pub(crate) fn reset_calculator_inner(
    lock: &RwLock<CalculatorState>,
    config: &EngineConfig,
) -> Result<CalculatorSnapshot, AppError> {
    let mut calc = write_calculator(lock)?;
    *calc = CalculatorState::new(config);
    Ok(CalculatorSnapshot::from(&*calc))
}

// ── Public handlers ───────────────────────────────────────────────────────────

/// Current form and result. Takes a read lock only.
pub fn get_snapshot(state: &AppState) -> Result<CalculatorSnapshot, AppError> {
    get_snapshot_inner(&state.calculator)
}

pub fn update_form(form: FormInput, state: &AppState) -> Result<CalculatorSnapshot, AppError> {
    update_form_inner(form, &state.calculator, &state.config)
}

/// Append a blank plate. Returns the new plate so the frontend can focus it.
pub fn add_plate(state: &AppState) -> Result<PlateEntry, AppError> {
    add_plate_inner(&state.calculator, &state.config)
}

pub fn remove_plate(id: &str, state: &AppState) -> Result<CalculatorSnapshot, AppError> {
    remove_plate_inner(id, &state.calculator, &state.config)
}

pub fn update_plate(
    id: &str,
    mass: String,
    state: &AppState,
) -> Result<CalculatorSnapshot, AppError> {
    update_plate_inner(id, mass, &state.calculator, &state.config)
}

/// Discard all edits and return to the configured defaults.
pub fn reset_calculator(state: &AppState) -> Result<CalculatorSnapshot, AppError> {
    reset_calculator_inner(&state.calculator, &state.config)
}

/// The material catalog with densities, in display order.
pub fn list_materials(state: &AppState) -> Vec<Material> {
    state.config.catalog().entries().to_vec()
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MaterialDensityConfig;
    use crate::models::{MaterialKind, SpoolStatus};
    use uuid::Uuid;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn default_snapshot_has_one_blank_plate() {
        let state = AppState::default();
        let snap = get_snapshot(&state).expect("snapshot");
        assert_eq!(snap.form.plates.len(), 1);
        assert!(approx(snap.result.net_available_g, 1000.0));
    }

    #[test]
    fn update_form_recomputes() {
        let state = AppState::default();
        let mut form = get_snapshot(&state).expect("snapshot").form;
        form.print_weight = "250".to_string();
        let snap = update_form(form, &state).expect("update");
        assert!(approx(snap.result.required_g, 250.0));
        assert!(approx(snap.result.remaining_after_print_g, 750.0));
    }

    #[test]
    fn update_form_with_no_plates_keeps_one() {
        let state = AppState::default();
        let mut form = get_snapshot(&state).expect("snapshot").form;
        form.plates.clear();
        let snap = update_form(form, &state).expect("update");
        assert_eq!(snap.form.plates.len(), 1);
        assert!(snap.form.plates[0].is_blank());
    }

    #[test]
    fn update_form_percentage_mode_with_two_spools() {
        let state = AppState::default();
        let mut form = get_snapshot(&state).expect("snapshot").form;
        form.is_percentage_mode = true;
        form.input_percentage = "50".to_string();
        form.spool_quantity = 2;
        form.print_weight = "700".to_string();
        let snap = update_form(form, &state).expect("update");
        assert!(approx(snap.result.total_inventory_g, 1500.0));
        assert!(approx(snap.result.remaining_after_print_g, 800.0));
        let states: Vec<SpoolStatus> = snap.result.per_spool_state.iter().map(|s| s.status).collect();
        assert_eq!(states, [SpoolStatus::Empty, SpoolStatus::Partial]);
    }

    #[test]
    fn add_plate_appends_blank_plate() {
        let state = AppState::default();
        let plate = add_plate(&state).expect("add");
        assert!(plate.is_blank());
        let snap = get_snapshot(&state).expect("snapshot");
        assert_eq!(snap.form.plates.len(), 2);
        assert_eq!(snap.form.plates[1].id, plate.id);
    }

    #[test]
    fn plates_sum_in_advanced_mode() {
        let state = AppState::default();
        let mut form = get_snapshot(&state).expect("snapshot").form;
        form.is_advanced = true;
        update_form(form, &state).expect("update");

        let first = get_snapshot(&state).expect("snapshot").form.plates[0].id;
        let second = add_plate(&state).expect("add").id;
        update_plate(&first.to_string(), "120".to_string(), &state).expect("update first");
        let snap =
            update_plate(&second.to_string(), "80.5".to_string(), &state).expect("update second");
        assert!(approx(snap.result.required_g, 200.5));
    }

    #[test]
    fn remove_plate_drops_it() {
        let state = AppState::default();
        let added = add_plate(&state).expect("add");
        let snap = remove_plate(&added.id.to_string(), &state).expect("remove");
        assert_eq!(snap.form.plates.len(), 1);
        assert!(snap.form.plates.iter().all(|p| p.id != added.id));
    }

    #[test]
    fn remove_last_plate_is_refused() {
        let state = AppState::default();
        let only = get_snapshot(&state).expect("snapshot").form.plates[0].id;
        let err = remove_plate(&only.to_string(), &state).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert_eq!(get_snapshot(&state).expect("snapshot").form.plates.len(), 1);
    }

    #[test]
    fn remove_unknown_plate_is_not_found() {
        let state = AppState::default();
        let err = remove_plate(&Uuid::new_v4().to_string(), &state).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn update_plate_with_bad_id_is_not_found() {
        let state = AppState::default();
        let err = update_plate("bogus", "10".to_string(), &state).unwrap_err();
        assert_eq!(err, AppError::NotFound("plate bogus not found".to_string()));
    }

    #[test]
    fn reset_restores_defaults() {
        let state = AppState::default();
        add_plate(&state).expect("add");
        let mut form = get_snapshot(&state).expect("snapshot").form;
        form.gross_weight = "5000".to_string();
        update_form(form, &state).expect("update");

        let snap = reset_calculator(&state).expect("reset");
        assert_eq!(snap.form.plates.len(), 1);
        assert_eq!(snap.form.gross_weight, "1250");
        assert!(approx(snap.result.net_available_g, 1000.0));
    }

    #[test]
    fn list_materials_applies_config_overrides() {
        let mut config = EngineConfig::default();
        config.materials.push(MaterialDensityConfig {
            kind: MaterialKind::Petg,
            density: 1.30,
        });
        let state = AppState::new(config);
        let materials = list_materials(&state);
        assert_eq!(materials.len(), MaterialKind::ALL.len());
        assert_eq!(materials[0].kind, MaterialKind::Pla);
        let petg = materials
            .iter()
            .find(|m| m.kind == MaterialKind::Petg)
            .expect("PETG listed");
        assert!(approx(petg.density, 1.30));
    }

    #[test]
    fn snapshot_serializes_camel_case() {
        let state = AppState::default();
        let snap = get_snapshot(&state).expect("snapshot");
        let value = serde_json::to_value(&snap).expect("serialize");
        assert!(value["form"]["grossWeight"].is_string());
        assert!(value["result"]["netAvailableG"].is_number());
    }
}
