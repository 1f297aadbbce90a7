//! Definiciones relacionadas a Steps.
//!
//! Un Step es una unidad de trabajo con nombre dentro de una operación,
//! etiquetada con la vía (`Track`) en la que participa. Este módulo define:
//! - `StepDefinition`: interfaz neutral usada por el executor.
//! - `FnStep`: adaptador para definir steps con closures.
//! - `StepOutcome` / `StepFailure`: señales de dominio.
//! - `StepRunResult`: `Result` que además distingue fallos fatales.

pub mod definition;
pub mod fn_step;
mod run_result;

pub use definition::{StepDefinition, Track};
pub use fn_step::FnStep;
pub use run_result::{FailureReason, StepFailure, StepOutcome, StepRunResult};
