//! Engine module: executor y máquina de estados de vías.

pub mod executor;
pub mod state;

pub use executor::{ExecutorConfig, PipelineExecutor};
pub use state::TrackState;
