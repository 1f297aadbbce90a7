//! Definición inmutable de una operación y su builder.
//!
//! Una `OperationDefinition` se construye una vez (tiempo de definición) y
//! se comparte entre todas las invocaciones. El orden de los steps fijado
//! aquí es el orden total de ejecución de cada vía.
//!
//! ```ignore
//! let def = OperationDefinition::<Company, Actor>::builder("CompanyCreate")
//!     .step(BuildCompany::new())
//!     .step_fn("validate", |ctx| ...)
//!     .failure_fn("audit", |ctx| ...)
//!     .build()?;
//! ```

use std::collections::HashSet;
use std::fmt;

use serde_json::json;

use crate::errors::CoreEngineError;
use crate::hashing::hash_value;
use crate::model::RunContext;
use crate::step::{FnStep, StepDefinition, StepRunResult, Track};

pub struct OperationDefinition<M, A> {
    name: String,
    steps: Vec<Box<dyn StepDefinition<M, A>>>,
    definition_hash: String,
}

impl<M, A> OperationDefinition<M, A> {
    pub fn builder(name: impl Into<String>) -> OperationBuilder<M, A> {
        OperationBuilder { name: name.into(),
                           steps: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn steps(&self) -> &[Box<dyn StepDefinition<M, A>>] {
        &self.steps
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name()).collect()
    }

    pub fn definition_hash(&self) -> &str {
        &self.definition_hash
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl<M, A> fmt::Debug for OperationDefinition<M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let steps: Vec<String> = self.steps
                                     .iter()
                                     .map(|s| format!("{}[{}]", s.name(), s.track().as_str()))
                                     .collect();
        f.debug_struct("OperationDefinition")
         .field("name", &self.name)
         .field("steps", &steps)
         .field("definition_hash", &self.definition_hash)
         .finish()
    }
}

/// Hash estable de la lista de steps (nombre, vía, on_fatal) en orden.
pub fn definition_hash<M, A>(steps: &[Box<dyn StepDefinition<M, A>>]) -> String {
    let shape: Vec<_> = steps.iter()
                             .map(|s| json!({"name": s.name(), "track": s.track().as_str(), "on_fatal": s.on_fatal()}))
                             .collect();
    hash_value(&json!(shape))
}

/// Builder que acumula steps en orden y valida la definición al cerrar.
pub struct OperationBuilder<M, A> {
    name: String,
    steps: Vec<Box<dyn StepDefinition<M, A>>>,
}

impl<M: 'static, A: 'static> OperationBuilder<M, A> {
    /// Añade un step ya construido; su vía la decide el propio step.
    pub fn step<S>(mut self, step: S) -> Self
        where S: StepDefinition<M, A> + 'static
    {
        self.steps.push(Box::new(step));
        self
    }

    pub fn boxed(mut self, step: Box<dyn StepDefinition<M, A>>) -> Self {
        self.steps.push(step);
        self
    }

    /// Step de la vía de éxito a partir de un closure.
    pub fn step_fn<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync + 'static
    {
        self.step(FnStep::new(name, Track::Success, action))
    }

    /// Step que sólo corre en la vía de fallo.
    pub fn failure_fn<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync + 'static
    {
        self.step(FnStep::new(name, Track::Failure, action))
    }

    /// Step que corre en ambas vías.
    pub fn always_fn<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync + 'static
    {
        self.step(FnStep::new(name, Track::Both, action))
    }

    /// Step de la vía de fallo que también corre tras un fallo fatal.
    pub fn cleanup_fn<F>(self, name: impl Into<String>, action: F) -> Self
        where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync + 'static
    {
        self.step(FnStep::new(name, Track::Failure, action).run_on_fatal())
    }

    /// Cierra la definición. Rechaza nombre vacío y nombres de step
    /// duplicados.
    pub fn build(self) -> Result<OperationDefinition<M, A>, CoreEngineError> {
        if self.name.trim().is_empty() {
            return Err(CoreEngineError::EmptyOperationName);
        }
        let mut seen = HashSet::new();
        for s in &self.steps {
            if !seen.insert(s.name()) {
                return Err(CoreEngineError::DuplicateStep { operation: self.name.clone(),
                                                            step: s.name().to_string() });
            }
        }
        let definition_hash = definition_hash(&self.steps);
        Ok(OperationDefinition { name: self.name,
                                 steps: self.steps,
                                 definition_hash })
    }
}
