use serde::{Deserialize, Serialize};

use crate::errors::StepFault;
use crate::model::ErrorMap;

/// Resultado de ejecutar un step: señal de dominio o fallo fatal.
pub type StepRunResult = Result<StepOutcome, StepFault>;

/// Señal de dominio devuelta por un step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Success,
    Failure(StepFailure),
}

/// Motivo de un fallo de dominio (recuperable).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepFailure {
    /// Reglas de contrato que no se cumplen.
    Invalid(ErrorMap),
    /// Una política denegó la acción. Se reporta como error `base`.
    Denied { policy: String, action: String },
    /// Fallo explícito sin mensajes.
    Halt,
}

/// Clasificación serializable del fallo, usada en eventos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    Invalid,
    Denied,
    Halt,
}

impl StepOutcome {
    /// `Success` si no hay errores, `Failure(Invalid)` en otro caso.
    pub fn from_errors(errors: ErrorMap) -> Self {
        if errors.is_empty() {
            StepOutcome::Success
        } else {
            StepOutcome::Failure(StepFailure::Invalid(errors))
        }
    }

    pub fn invalid(errors: ErrorMap) -> Self {
        StepOutcome::Failure(StepFailure::Invalid(errors))
    }

    pub fn denied(policy: impl Into<String>, action: impl Into<String>) -> Self {
        StepOutcome::Failure(StepFailure::Denied { policy: policy.into(),
                                                   action: action.into() })
    }

    pub fn halt() -> Self {
        StepOutcome::Failure(StepFailure::Halt)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Success)
    }
}

impl StepFailure {
    pub fn reason(&self) -> FailureReason {
        match self {
            StepFailure::Invalid(_) => FailureReason::Invalid,
            StepFailure::Denied { .. } => FailureReason::Denied,
            StepFailure::Halt => FailureReason::Halt,
        }
    }
}
