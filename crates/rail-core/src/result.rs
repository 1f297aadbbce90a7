//! `OperationResult`: resultado inmutable de una invocación.
//!
//! Invariante: `status == Failure` si y sólo si `errors` no está vacío o
//! algún step señaló un fallo explícito sin mensajes (p. ej. `Halt`). El
//! único constructor es interno al executor, que es quien conoce ambos
//! hechos.
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::event::{RunEvent, RunEventKind};
use crate::model::{ErrorMap, RunContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Failure,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationResult<M> {
    status: Status,
    operation: String,
    run_id: Uuid,
    model: Option<M>,
    errors: ErrorMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    failed_step: Option<String>,
    #[serde(skip)]
    events: Vec<RunEvent>,
}

impl<M> OperationResult<M> {
    pub(crate) fn from_context<A>(ctx: RunContext<M, A>,
                                  explicit_failure: bool,
                                  failed_step: Option<String>,
                                  events: Vec<RunEvent>)
                                  -> Self {
        let (run_id, operation, model, errors) = ctx.into_parts();
        let status = if explicit_failure || !errors.is_empty() { Status::Failure } else { Status::Success };
        Self { status,
               operation,
               run_id,
               model,
               errors,
               failed_step,
               events }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_failure(&self) -> bool {
        self.status == Status::Failure
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    /// Primer step de la vía de éxito que señaló el fallo.
    pub fn failed_step(&self) -> Option<&str> {
        self.failed_step.as_deref()
    }

    pub fn events(&self) -> &[RunEvent] {
        &self.events
    }

    /// Nombres de los steps ejecutados, en orden (incluye los de la vía de
    /// fallo).
    pub fn executed_steps(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                RunEventKind::StepStarted { step, .. } => Some(step.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn skipped_steps(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                RunEventKind::StepSkipped { step, .. } => Some(step.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn into_model(self) -> Option<M> {
        self.model
    }

    pub fn into_parts(self) -> (Status, Option<M>, ErrorMap) {
        (self.status, self.model, self.errors)
    }
}
