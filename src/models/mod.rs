pub mod input;
pub mod material;
pub mod plate;
pub mod result;

pub use input::{CalculationInput, FormInput, MAX_SPOOLS};
pub use material::{Material, MaterialCatalog, MaterialKind};
pub use plate::{Plate, PlateEntry};
pub use result::{clamp_percentage, CalculationResult, SpoolState, SpoolStatus};
