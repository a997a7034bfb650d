//! Command handlers exposed to a frontend.
//!
//! Sub-modules are grouped by concern:
//! - [`calculator`] — form edits, plate list, result snapshot, material list
//! - [`file`]       — import a sliced project file into the form
//!
//! Handlers follow the `_inner` + wrapper pattern: `_inner` functions take the
//! lock and config they need and hold the logic; the public wrappers take
//! `&AppState` and delegate.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::error::AppError;
use crate::state::CalculatorState;

pub mod calculator;
pub mod file;

/// Acquire a read guard, mapping lock poisoning to [`AppError::Io`].
pub(crate) fn read_calculator(
    lock: &RwLock<CalculatorState>,
) -> Result<RwLockReadGuard<'_, CalculatorState>, AppError> {
    lock.read()
        .map_err(|e| AppError::Io(format!("calculator lock poisoned: {e}")))
}

/// Acquire a write guard, mapping lock poisoning to [`AppError::Io`].
pub(crate) fn write_calculator(
    lock: &RwLock<CalculatorState>,
) -> Result<RwLockWriteGuard<'_, CalculatorState>, AppError> {
    lock.write()
        .map_err(|e| AppError::Io(format!("calculator lock poisoned: {e}")))
}

/// Parse an entity ID sent by the frontend.
///
/// A malformed ID cannot match anything, so it is reported as
/// [`AppError::NotFound`] rather than a parse error.
pub(crate) fn parse_entity_id(id: &str, entity: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::NotFound(format!("{entity} {id} not found")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;

    #[test]
    fn parse_entity_id_accepts_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_entity_id(&id.to_string(), "plate").unwrap(), id);
    }

    #[test]
    fn parse_entity_id_rejects_garbage_as_not_found() {
        let err = parse_entity_id("not-a-uuid", "plate").unwrap_err();
        assert_eq!(err, AppError::NotFound("plate not-a-uuid not found".to_string()));
    }

    #[test]
    fn poisoned_lock_maps_to_io_error() {
        let lock = RwLock::new(CalculatorState::new(&EngineConfig::default()));
        let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = lock.write().unwrap();
            panic!("poison");
        }));
        assert!(matches!(read_calculator(&lock), Err(AppError::Io(_))));
        assert!(matches!(write_calculator(&lock), Err(AppError::Io(_))));
    }
}
