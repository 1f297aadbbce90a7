//! Errores específicos del core.
//!
//! Hay dos familias:
//! - `StepFault`: fallo de infraestructura dentro de un step (colaborador
//!   caído, modelo ausente...). Nunca se codifica como `OperationResult`.
//! - `CoreEngineError`: lo que ve quien invoca al motor (errores de
//!   definición, operación desconocida o un `StepFault` propagado).

use std::error::Error as StdError;

use thiserror::Error;
use uuid::Uuid;

/// Fallo inesperado de un step. Aborta la ejecución completa.
#[derive(Debug, Error)]
pub enum StepFault {
    #[error("model not initialized before step '{0}'")]
    MissingModel(String),
    #[error("collaborator failure: {0}")]
    Collaborator(#[source] Box<dyn StdError + Send + Sync + 'static>),
    #[error("{0}")]
    Message(String),
}

impl StepFault {
    /// Envuelve el error de un colaborador externo (persistencia, correo...).
    pub fn collaborator<E>(err: E) -> Self
        where E: StdError + Send + Sync + 'static
    {
        Self::Collaborator(Box::new(err))
    }

    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }
}

#[derive(Debug, Error)]
pub enum CoreEngineError {
    #[error("operation name must not be empty")]
    EmptyOperationName,
    #[error("duplicate step name '{step}' in operation '{operation}'")]
    DuplicateStep { operation: String, step: String },
    #[error("operation '{0}' is already registered")]
    DuplicateOperation(String),
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),
    #[error("invalid params: {0}")]
    InvalidParams(String),
    #[error("step '{step}' of operation '{operation}' faulted (run {run_id}): {source}")]
    StepFault {
        operation: String,
        run_id: Uuid,
        step: String,
        #[source]
        source: StepFault,
    },
}

impl CoreEngineError {
    /// `true` cuando el error proviene de un fallo de infraestructura en
    /// tiempo de ejecución (y no de una definición o invocación inválida).
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::StepFault { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Error)]
    #[error("disk on fire")]
    struct DiskError;

    #[test]
    fn collaborator_fault_keeps_source() {
        let fault = StepFault::collaborator(DiskError);
        assert_eq!(fault.to_string(), "collaborator failure: disk on fire");
        assert!(fault.source().is_some());
    }

    #[test]
    fn step_fault_error_formats_context() {
        let run_id = Uuid::nil();
        let err = CoreEngineError::StepFault { operation: "CompanyCreate".into(),
                                               run_id,
                                               step: "persist".into(),
                                               source: StepFault::message("boom") };
        assert!(err.is_fault());
        assert_eq!(err.to_string(),
                   format!("step 'persist' of operation 'CompanyCreate' faulted (run {run_id}): boom"));
        assert!(!CoreEngineError::UnknownOperation("x".into()).is_fault());
    }
}
