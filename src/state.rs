//! Application state shared by the command handlers.
//!
//! [`AppState`] is built once at startup and passed by reference to every
//! handler. The calculator form lives behind a [`RwLock`] so concurrent
//! read-only queries do not block each other.

use std::sync::RwLock;

use crate::accounting;
use crate::config::EngineConfig;
use crate::models::{CalculationResult, FormInput};
use crate::resolver::ProjectResolver;

/// The form as typed plus the result derived from it.
///
/// `result` is always the output of [`accounting::compute`] on the current
/// form; every mutation goes through [`recompute`](Self::recompute).
#[derive(Debug, Clone)]
pub struct CalculatorState {
    pub form: FormInput,
    pub result: CalculationResult,
}

impl CalculatorState {
    /// A fresh calculator pre-filled from `config`.
    pub fn new(config: &EngineConfig) -> Self {
        let form = FormInput::with_defaults(config);
        let result = accounting::compute(&form.to_calculation_input(config));
        Self { form, result }
    }

    /// Re-derive `result` from `form`.
    pub fn recompute(&mut self, config: &EngineConfig) {
        self.result = accounting::compute(&self.form.to_calculation_input(config));
    }
}

/// Root application state.
pub struct AppState {
    pub config: EngineConfig,
    pub calculator: RwLock<CalculatorState>,
    pub resolver: ProjectResolver,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        let calculator = RwLock::new(CalculatorState::new(&config));
        let resolver = ProjectResolver::new(config.resolver.clone());
        Self {
            config,
            calculator,
            resolver,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
