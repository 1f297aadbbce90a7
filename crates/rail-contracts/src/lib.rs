//! rail-contracts: validación declarativa de payloads.
//!
//! Un `ContractSchema` agrupa `FieldRule`s; cada regla comprueba un campo
//! y puede limitarse a ciertos ámbitos ("create", "update"...). Validar
//! devuelve siempre un `ErrorMap`; sólo la configuración (esquema
//! desconocido, patrón inválido) produce `ContractError`.
pub mod error;
pub mod messages;
pub mod rule;
pub mod schema;
pub mod set;

pub use error::ContractError;
pub use rule::{Check, CustomCheck, FieldRule, Scope};
pub use schema::ContractSchema;
pub use set::ContractSet;
