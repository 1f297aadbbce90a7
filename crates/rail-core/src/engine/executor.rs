//! Pipeline executor: recorre los steps de una `OperationDefinition` sobre
//! un `RunContext` nuevo y produce un `OperationResult`.

use log::{debug, info, warn};

use super::TrackState;
use crate::constants::{ENGINE_VERSION, NOT_AUTHORIZED};
use crate::errors::CoreEngineError;
use crate::event::{RunEventKind, RunEventLog};
use crate::model::{Params, RunContext};
use crate::operation::OperationDefinition;
use crate::result::{OperationResult, Status};
use crate::step::{StepFailure, StepOutcome};

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Registrar `RunEvent`s en el resultado.
    pub record_events: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self { record_events: true }
    }
}

/// Motor de ejecución de operaciones.
///
/// No guarda estado por invocación: todo lo mutable vive en el
/// `RunContext` y el `RunEventLog` creados dentro de `execute`, por lo que
/// un mismo executor y una misma definición pueden usarse desde varios
/// hilos a la vez.
#[derive(Debug, Clone, Default)]
pub struct PipelineExecutor {
    config: ExecutorConfig,
}

impl PipelineExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Ejecuta `definition` con un contexto nuevo.
    pub fn run<M, A>(&self,
                     definition: &OperationDefinition<M, A>,
                     params: Params,
                     actor: Option<A>)
                     -> Result<OperationResult<M>, CoreEngineError> {
        let ctx = RunContext::new(definition.name(), params, actor);
        self.execute(definition, ctx)
    }

    /// Ejecuta `definition` sobre un contexto ya preparado por el llamador.
    pub fn execute<M, A>(&self,
                         definition: &OperationDefinition<M, A>,
                         mut ctx: RunContext<M, A>)
                         -> Result<OperationResult<M>, CoreEngineError> {
        let run_id = ctx.run_id();
        let mut log = RunEventLog::new(run_id, self.config.record_events);
        log.append_kind(RunEventKind::RunStarted { operation: definition.name().to_string(),
                                                   definition_hash: definition.definition_hash().to_string(),
                                                   step_count: definition.len(),
                                                   engine_version: ENGINE_VERSION.to_string() });
        debug!("run {run_id}: operation '{}' started ({} steps)", definition.name(), definition.len());

        let mut state = TrackState::RunningSuccess;
        let mut explicit_failure = false;
        let mut failed_step: Option<String> = None;

        for (index, step) in definition.steps().iter().enumerate() {
            let name = step.name();
            let track = step.track();
            if !state.admits(track) {
                debug!("run {run_id}: skip '{name}' [{}]", track.as_str());
                log.append_kind(RunEventKind::StepSkipped { step_index: index,
                                                            step: name.to_string(),
                                                            track });
                continue;
            }

            log.append_kind(RunEventKind::StepStarted { step_index: index,
                                                        step: name.to_string(),
                                                        track });
            match step.run(&mut ctx) {
                Ok(StepOutcome::Success) => {
                    debug!("run {run_id}: step '{name}' ok");
                    log.append_kind(RunEventKind::StepSucceeded { step_index: index,
                                                                  step: name.to_string() });
                }
                Ok(StepOutcome::Failure(failure)) => {
                    let reason = failure.reason();
                    apply_failure(&mut ctx, failure, name);
                    explicit_failure = true;
                    log.append_kind(RunEventKind::StepFailed { step_index: index,
                                                               step: name.to_string(),
                                                               reason });
                    if !state.is_failure() {
                        debug!("run {run_id}: step '{name}' failed ({reason:?}), switching to failure track");
                        state = state.fail();
                        failed_step = Some(name.to_string());
                        log.append_kind(RunEventKind::TrackSwitched { step_index: index,
                                                                      step: name.to_string() });
                    }
                }
                Err(fault) => {
                    warn!("run {run_id}: step '{name}' of '{}' faulted: {fault}", definition.name());
                    log.append_kind(RunEventKind::StepFaulted { step_index: index,
                                                                step: name.to_string(),
                                                                error: fault.to_string() });
                    self.run_fatal_handlers(definition, index + 1, &mut ctx, &mut log);
                    return Err(CoreEngineError::StepFault { operation: definition.name().to_string(),
                                                            run_id,
                                                            step: name.to_string(),
                                                            source: fault });
                }
            }
        }

        state = state.terminate();
        debug!("run {run_id}: {state:?}");
        let status = if explicit_failure || !ctx.errors().is_empty() { Status::Failure } else { Status::Success };
        log.append_kind(RunEventKind::RunFinished { status });
        match status {
            Status::Success => info!("run {run_id}: operation '{}' succeeded", definition.name()),
            Status::Failure => info!("run {run_id}: operation '{}' failed at '{}': {:?}",
                                     definition.name(),
                                     failed_step.as_deref().unwrap_or("-"),
                                     ctx.errors().full_messages()),
        }
        Ok(OperationResult::from_context(ctx, explicit_failure, failed_step, log.into_events()))
    }

    /// Ejecuta los steps posteriores a `from` marcados `on_fatal`. Sus
    /// resultados sólo se registran; un nuevo fallo no detiene la limpieza.
    fn run_fatal_handlers<M, A>(&self,
                                definition: &OperationDefinition<M, A>,
                                from: usize,
                                ctx: &mut RunContext<M, A>,
                                log: &mut RunEventLog) {
        for (index, step) in definition.steps().iter().enumerate().skip(from) {
            if !step.on_fatal() {
                continue;
            }
            let name = step.name();
            log.append_kind(RunEventKind::FatalCleanup { step_index: index,
                                                         step: name.to_string() });
            match step.run(ctx) {
                Ok(StepOutcome::Success) => debug!("run {}: cleanup '{name}' ok", ctx.run_id()),
                Ok(StepOutcome::Failure(f)) => {
                    debug!("run {}: cleanup '{name}' reported {:?}", ctx.run_id(), f.reason())
                }
                Err(fault) => warn!("run {}: cleanup '{name}' faulted: {fault}", ctx.run_id()),
            }
        }
    }
}

fn apply_failure<M, A>(ctx: &mut RunContext<M, A>, failure: StepFailure, step: &str) {
    match failure {
        StepFailure::Invalid(errors) => ctx.merge_errors(errors),
        StepFailure::Denied { policy, action } => {
            warn!("run {}: policy '{policy}' denied '{action}' at step '{step}'", ctx.run_id());
            ctx.add_base_error(NOT_AUTHORIZED);
        }
        StepFailure::Halt => {}
    }
}
