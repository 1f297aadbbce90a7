//! Definiciones de eventos y log por ejecución.

mod run_log;
mod types;

pub use run_log::RunEventLog;
pub use types::{RunEvent, RunEventKind};
