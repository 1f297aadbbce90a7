use std::fmt;
use std::marker::PhantomData;

use super::{StepDefinition, StepRunResult, Track};
use crate::model::RunContext;

/// Step construido a partir de un closure.
///
/// Usage:
///   let step = FnStep::new("model.build", Track::Success, |ctx| { ...; Ok(StepOutcome::Success) });
pub struct FnStep<F, M, A> {
    name: String,
    track: Track,
    on_fatal: bool,
    action: F,
    _marker: PhantomData<fn() -> (M, A)>,
}

impl<F, M, A> FnStep<F, M, A>
    where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync
{
    pub fn new(name: impl Into<String>, track: Track, action: F) -> Self {
        Self { name: name.into(),
               track,
               on_fatal: false,
               action,
               _marker: PhantomData }
    }

    /// Marca el step para ejecutarse también tras un fallo fatal.
    pub fn run_on_fatal(mut self) -> Self {
        self.on_fatal = true;
        self
    }
}

impl<F, M, A> StepDefinition<M, A> for FnStep<F, M, A>
    where F: Fn(&mut RunContext<M, A>) -> StepRunResult + Send + Sync
{
    fn name(&self) -> &str {
        &self.name
    }

    fn track(&self) -> Track {
        self.track
    }

    fn on_fatal(&self) -> bool {
        self.on_fatal
    }

    fn run(&self, ctx: &mut RunContext<M, A>) -> StepRunResult {
        (self.action)(ctx)
    }
}

impl<F, M, A> fmt::Debug for FnStep<F, M, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnStep")
         .field("name", &self.name)
         .field("track", &self.track)
         .field("on_fatal", &self.on_fatal)
         .finish()
    }
}
