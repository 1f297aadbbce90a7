//! Registro de operaciones por nombre.
//!
//! Punto de entrada para colaboradores tipo controlador:
//! `run(nombre, params, actor) -> Result<OperationResult, CoreEngineError>`.
//! El registro sólo expone `&self` en tiempo de ejecución y guarda las
//! definiciones en `Arc`, así que puede compartirse entre hilos.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;

use crate::engine::PipelineExecutor;
use crate::errors::CoreEngineError;
use crate::model::Params;
use crate::operation::OperationDefinition;
use crate::result::OperationResult;

pub struct OperationRegistry<M, A> {
    executor: PipelineExecutor,
    operations: BTreeMap<String, Arc<OperationDefinition<M, A>>>,
}

impl<M, A> OperationRegistry<M, A> {
    pub fn new() -> Self {
        Self::with_executor(PipelineExecutor::new())
    }

    pub fn with_executor(executor: PipelineExecutor) -> Self {
        Self { executor,
               operations: BTreeMap::new() }
    }

    /// Registra una definición. Los nombres son únicos.
    pub fn register(&mut self, definition: OperationDefinition<M, A>) -> Result<(), CoreEngineError> {
        let name = definition.name().to_string();
        if self.operations.contains_key(&name) {
            return Err(CoreEngineError::DuplicateOperation(name));
        }
        debug!("registered operation '{name}' ({} steps, hash {})",
               definition.len(),
               definition.definition_hash());
        self.operations.insert(name, Arc::new(definition));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<OperationDefinition<M, A>>> {
        self.operations.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Nombres registrados, en orden alfabético.
    pub fn names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn executor(&self) -> &PipelineExecutor {
        &self.executor
    }

    /// Ejecuta la operación `name` con un contexto nuevo.
    pub fn run(&self, name: &str, params: Params, actor: Option<A>) -> Result<OperationResult<M>, CoreEngineError> {
        let definition = self.operations
                             .get(name)
                             .ok_or_else(|| CoreEngineError::UnknownOperation(name.to_string()))?;
        self.executor.run(definition, params, actor)
    }
}

impl<M, A> Default for OperationRegistry<M, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepOutcome;

    fn def(name: &str) -> OperationDefinition<(), ()> {
        OperationDefinition::builder(name).step_fn("only", |_ctx| Ok(StepOutcome::Success))
                                          .build()
                                          .unwrap()
    }

    #[test]
    fn register_rejects_duplicates_and_lists_names() {
        let mut reg = OperationRegistry::new();
        reg.register(def("B")).unwrap();
        reg.register(def("A")).unwrap();
        assert!(matches!(reg.register(def("A")), Err(CoreEngineError::DuplicateOperation(n)) if n == "A"));
        assert_eq!(reg.names(), vec!["A", "B"]);
        assert!(reg.contains("B"));
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn unknown_operation_is_an_error() {
        let reg: OperationRegistry<(), ()> = OperationRegistry::new();
        let err = reg.run("Missing", Params::new(), None).unwrap_err();
        assert!(matches!(err, CoreEngineError::UnknownOperation(n) if n == "Missing"));
    }
}
