use std::marker::PhantomData;
use std::sync::Arc;

use rail_contracts::ContractSet;
use rail_core::{RunContext, StepDefinition, StepFault, StepOutcome, StepRunResult, Track};

/// Valida `ctx.params` contra un esquema del `ContractSet` en un ámbito.
///
/// Un `ErrorMap` no vacío es un fallo de validación; un esquema
/// inexistente es un fallo de infraestructura.
pub struct ContractStep<M, A> {
    name: String,
    contracts: Arc<ContractSet>,
    schema: String,
    scope: String,
    _marker: PhantomData<fn() -> (M, A)>,
}

impl<M, A> ContractStep<M, A> {
    pub fn new(name: impl Into<String>,
               contracts: Arc<ContractSet>,
               schema: impl Into<String>,
               scope: impl Into<String>)
               -> Self {
        Self { name: name.into(),
               contracts,
               schema: schema.into(),
               scope: scope.into(),
               _marker: PhantomData }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl<M, A> StepDefinition<M, A> for ContractStep<M, A> {
    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> Track {
        Track::Success
    }

    fn run(&self, ctx: &mut RunContext<M, A>) -> StepRunResult {
        let errors = self.contracts
                         .validate(&self.schema, &ctx.params, &self.scope)
                         .map_err(StepFault::collaborator)?;
        Ok(StepOutcome::from_errors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rail_contracts::{ContractSchema, FieldRule};
    use rail_core::{params_from_value, CoreEngineError, OperationDefinition, PipelineExecutor};
    use serde_json::json;

    fn contracts() -> Arc<ContractSet> {
        Arc::new(ContractSet::new().with(ContractSchema::new("doc").rule(FieldRule::presence("title")))
                                   .unwrap())
    }

    #[test]
    fn unknown_schema_aborts_the_run() {
        let def = OperationDefinition::<(), ()>::builder("Publish")
            .step(ContractStep::new("contract.validate", contracts(), "missing", "create"))
            .step_fn("publish", |_ctx| Ok(StepOutcome::Success))
            .build()
            .unwrap();
        let err = PipelineExecutor::new().run(&def, params_from_value(json!({"title": "x"})).unwrap(), None)
                                         .unwrap_err();
        match err {
            CoreEngineError::StepFault { step, source, .. } => {
                assert_eq!(step, "contract.validate");
                assert!(source.to_string().contains("unknown contract schema 'missing'"));
            }
            other => panic!("expected StepFault, got {other:?}"),
        }
    }

    #[test]
    fn contract_errors_fail_the_run() {
        let def = OperationDefinition::<(), ()>::builder("Publish")
            .step(ContractStep::new("contract.validate", contracts(), "doc", "create"))
            .build()
            .unwrap();
        let res = PipelineExecutor::new().run(&def, params_from_value(json!({})).unwrap(), None).unwrap();
        assert!(res.is_failure());
        assert_eq!(res.failed_step(), Some("contract.validate"));
        assert_eq!(serde_json::to_value(res.errors()).unwrap(), json!({"title": ["can't be blank"]}));
    }
}
