//! Tipos de evento de una ejecución y estructura `RunEvent`.
//!
//! Rol en el flujo:
//! - Cada `run` del executor emite eventos a su propio `RunEventLog`.
//! - Los eventos viajan dentro del `OperationResult` y permiten verificar
//!   qué steps corrieron, cuáles se saltaron y dónde cambió la vía.
//! - El enum `RunEventKind` es el contrato observable del motor.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::result::Status;
use crate::step::{FailureReason, Track};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de toda ejecución.
    RunStarted {
        operation: String,
        definition_hash: String,
        step_count: usize,
        engine_version: String,
    },
    StepStarted { step_index: usize, step: String, track: Track },
    StepSucceeded { step_index: usize, step: String },
    /// El step devolvió un fallo de dominio; sus errores ya están fusionados.
    StepFailed {
        step_index: usize,
        step: String,
        reason: FailureReason,
    },
    /// Cambio único success -> failure.
    TrackSwitched { step_index: usize, step: String },
    /// El step no participa de la vía activa.
    StepSkipped { step_index: usize, step: String, track: Track },
    /// Fallo de infraestructura: la ejecución se aborta.
    StepFaulted { step_index: usize, step: String, error: String },
    /// Step de limpieza ejecutado tras un fallo fatal.
    FatalCleanup { step_index: usize, step: String },
    /// Evento de cierre (sólo cuando se produce `OperationResult`).
    RunFinished { status: Status },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>,
}
