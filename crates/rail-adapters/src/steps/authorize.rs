use std::marker::PhantomData;
use std::sync::Arc;

use log::debug;
use rail_core::{RunContext, StepDefinition, StepFault, StepOutcome, StepRunResult};
use rail_policies::{decide, Policy};

/// Clave en `ctx.extras` donde queda la última decisión de autorización.
pub const DECISION_KEY: &str = "authorization";

/// Consulta una política con el actor y el modelo actuales como sujeto.
/// Un `Deny` termina la vía de éxito con "not authorized".
pub struct AuthorizeStep<M, A, P: ?Sized> {
    name: String,
    policy: Arc<P>,
    action: String,
    _marker: PhantomData<fn() -> (M, A)>,
}

impl<M, A, P: ?Sized> AuthorizeStep<M, A, P> {
    pub fn new(name: impl Into<String>, policy: Arc<P>, action: impl Into<String>) -> Self {
        Self { name: name.into(),
               policy,
               action: action.into(),
               _marker: PhantomData }
    }

    pub fn action(&self) -> &str {
        &self.action
    }
}

impl<M, A, P> StepDefinition<M, A> for AuthorizeStep<M, A, P>
    where P: Policy<A, M> + ?Sized
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: &mut RunContext<M, A>) -> StepRunResult {
        let decision = decide(&*self.policy, ctx.actor(), ctx.model(), &self.action);
        debug!("run {}: authorization fingerprint {}", ctx.run_id(), decision.fingerprint());
        let recorded = serde_json::to_value(&decision).map_err(StepFault::collaborator)?;
        ctx.insert_extra(DECISION_KEY, recorded);
        if decision.is_allowed() {
            Ok(StepOutcome::Success)
        } else {
            Ok(StepOutcome::denied(decision.policy_id, decision.action))
        }
    }
}
