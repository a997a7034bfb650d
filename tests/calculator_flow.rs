use spoolwise_lib::commands::{calculator, file};
use spoolwise_lib::config::EngineConfig;
use spoolwise_lib::error::AppError;
use spoolwise_lib::models::{MaterialKind, SpoolStatus};
use spoolwise_lib::state::AppState;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn shipped_config() -> EngineConfig {
    EngineConfig::load(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/engine.toml"))
        .expect("shipped config loads")
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[tokio::test]
async fn import_then_plan_a_multi_spool_job() {
    let state = AppState::new(shipped_config());

    let mut form = calculator::get_snapshot(&state).expect("snapshot").form;
    form.material = MaterialKind::Petg;
    form.gross_weight = "450".to_string();
    form.spool_weight = "250".to_string();
    form.spool_quantity = 2;
    form.cost_per_kg = "25".to_string();
    calculator::update_form(form, &state).expect("update");

    let outcome = file::import_project_file(&fixture_path("orca_single.gcode"), &state)
        .await
        .expect("import");
    let result = &outcome.snapshot.result;

    // 200 g left on the open spool plus one sealed 1 kg spool.
    assert!(approx(result.total_inventory_g, 1200.0));
    assert!(approx(result.required_g, 41.07));
    assert!(approx(result.remaining_after_print_g, 1158.93));
    assert!(!result.is_insufficient);
    assert_eq!(result.spools_needed_count, 1);
    assert_eq!(result.per_spool_state[1].status, SpoolStatus::Full);
    assert_eq!(result.per_spool_state[0].status, SpoolStatus::Partial);
    assert!(approx(result.print_cost, 41.07 / 1000.0 * 25.0));
}

#[tokio::test]
async fn advanced_mode_with_waste_runs_short() {
    let state = AppState::default();

    let mut form = calculator::get_snapshot(&state).expect("snapshot").form;
    form.is_advanced = true;
    form.is_waste_calc_enabled = true;
    form.number_of_colors = 3;
    calculator::update_form(form, &state).expect("update");

    let first = calculator::get_snapshot(&state).expect("snapshot").form.plates[0].id;
    calculator::update_plate(&first.to_string(), "500".to_string(), &state).expect("plate 1");
    let second = calculator::add_plate(&state).expect("add").id;
    let snap =
        calculator::update_plate(&second.to_string(), "450".to_string(), &state).expect("plate 2");

    // (500 + 450) × 1.10 against 1000 g on hand.
    assert!(approx(snap.result.total_project_weight_g, 1045.0));
    assert!(snap.result.is_insufficient);
    assert!(approx(snap.result.display_remaining_g(), 0.0));
    assert_eq!(snap.result.spools_needed_count, 2);
    assert_eq!(snap.result.per_spool_state[0].status, SpoolStatus::Insufficient);
}

#[tokio::test]
async fn rejected_upload_reports_kind_and_keeps_state() {
    let state = AppState::default();
    let before = calculator::get_snapshot(&state).expect("snapshot").form;

    let err = file::import_project_bytes("part.stl", b"solid cube".to_vec(), &state)
        .await
        .unwrap_err();
    let value = serde_json::to_value(&err).expect("serialize");
    assert_eq!(value["kind"], "UnsupportedFormat");
    assert!(matches!(err, AppError::UnsupportedFormat(_)));

    assert_eq!(calculator::get_snapshot(&state).expect("snapshot").form, before);
}

#[test]
fn configured_cost_per_kg_prices_the_job() {
    let config = EngineConfig::parse("[defaults]\ncost_per_kg = 25.0\n").expect("parse");
    let state = AppState::new(config);

    let mut form = calculator::get_snapshot(&state).expect("snapshot").form;
    assert_eq!(form.cost_per_kg, "25");
    form.print_weight = "200".to_string();
    let snap = calculator::update_form(form, &state).expect("update");

    assert!(approx(snap.result.print_cost, 5.0));
}
