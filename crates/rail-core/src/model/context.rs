use std::collections::BTreeMap;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::ErrorMap;
use crate::errors::{CoreEngineError, StepFault};

/// Payload crudo de una invocación: nombre de campo -> valor.
pub type Params = Map<String, Value>;

/// Convierte un `Value` en `Params`. Sólo se aceptan objetos (o `null`,
/// tratado como payload vacío).
pub fn params_from_value(value: Value) -> Result<Params, CoreEngineError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Params::new()),
        other => Err(CoreEngineError::InvalidParams(format!("expected a JSON object, got {other}"))),
    }
}

/// Contexto de ejecución de una invocación.
///
/// Se crea nuevo en cada `run`, lo posee en exclusiva esa invocación y se
/// consume al construir el `OperationResult`. Los steps lo reciben como
/// `&mut` y nunca lo comparten.
///
/// `errors` sólo crece: los steps reportan errores devolviendo un
/// `StepFailure` y es el executor quien los fusiona.
#[derive(Debug)]
pub struct RunContext<M, A> {
    run_id: Uuid,
    operation: String,
    pub params: Params,
    pub actor: Option<A>,
    pub model: Option<M>,
    errors: ErrorMap,
    pub extras: BTreeMap<String, Value>,
}

impl<M, A> RunContext<M, A> {
    pub fn new(operation: impl Into<String>, params: Params, actor: Option<A>) -> Self {
        Self { run_id: Uuid::new_v4(),
               operation: operation.into(),
               params,
               actor,
               model: None,
               errors: ErrorMap::new(),
               extras: BTreeMap::new() }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key).filter(|v| !v.is_null())
    }

    pub fn param_str(&self, key: &str) -> Option<&str> {
        self.param(key).and_then(Value::as_str)
    }

    pub fn actor(&self) -> Option<&A> {
        self.actor.as_ref()
    }

    pub fn model(&self) -> Option<&M> {
        self.model.as_ref()
    }

    pub fn set_model(&mut self, model: M) {
        self.model = Some(model);
    }

    /// Acceso mutable al modelo; su ausencia es un fallo de infraestructura
    /// (un step de construcción debió ejecutarse antes).
    pub fn require_model(&mut self, step: &str) -> Result<&mut M, StepFault> {
        self.model.as_mut().ok_or_else(|| StepFault::MissingModel(step.to_string()))
    }

    pub fn errors(&self) -> &ErrorMap {
        &self.errors
    }

    pub(crate) fn merge_errors(&mut self, errors: ErrorMap) {
        self.errors.merge(errors);
    }

    pub(crate) fn add_base_error(&mut self, message: &str) {
        self.errors.add_base(message);
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn insert_extra(&mut self, key: impl Into<String>, value: Value) {
        self.extras.insert(key.into(), value);
    }

    pub(crate) fn into_parts(self) -> (Uuid, String, Option<M>, ErrorMap) {
        (self.run_id, self.operation, self.model, self.errors)
    }
}
