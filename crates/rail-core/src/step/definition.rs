use serde::{Deserialize, Serialize};

use super::run_result::StepRunResult;
use crate::model::RunContext;

/// Vía (track) en la que participa un step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Success,
    Failure,
    Both,
}

impl Track {
    pub fn runs_on_success(self) -> bool {
        matches!(self, Track::Success | Track::Both)
    }

    pub fn runs_on_failure(self) -> bool {
        matches!(self, Track::Failure | Track::Both)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Track::Success => "success",
            Track::Failure => "failure",
            Track::Both => "both",
        }
    }
}

/// Trait que define un Step.
///
/// Un step recibe el `RunContext` de la invocación en exclusiva y devuelve
/// éxito, un fallo de dominio (`StepFailure`) o un fallo de infraestructura
/// (`StepFault`). Las implementaciones se comparten entre invocaciones
/// concurrentes, por eso no deben guardar estado mutable propio.
pub trait StepDefinition<M, A>: Send + Sync {
    /// Identificador estable y único dentro de la operación.
    fn name(&self) -> &str;

    /// Vía en la que se ejecuta. Por defecto sólo en la de éxito.
    fn track(&self) -> Track {
        Track::Success
    }

    /// Si el step debe ejecutarse igualmente tras un fallo de
    /// infraestructura (limpieza).
    fn on_fatal(&self) -> bool {
        false
    }

    fn run(&self, ctx: &mut RunContext<M, A>) -> StepRunResult;
}
