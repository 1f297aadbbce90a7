//! rail-core: motor de operaciones con semántica de vías (railway).
//!
//! Una operación es una lista ordenada de steps con nombre, cada uno
//! etiquetado con la vía en la que corre. El executor recorre la vía de
//! éxito hasta que un step falla; a partir de ahí sólo corren los steps de
//! la vía de fallo. Los fallos de infraestructura abortan la ejecución y se
//! propagan como `CoreEngineError::StepFault`.
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod operation;
pub mod registry;
pub mod result;
pub mod step;

pub use constants::{BASE_KEY, NOT_AUTHORIZED};
pub use engine::{ExecutorConfig, PipelineExecutor, TrackState};
pub use errors::{CoreEngineError, StepFault};
pub use event::{RunEvent, RunEventKind};
pub use model::{params_from_value, ErrorMap, Params, RunContext};
pub use operation::{OperationBuilder, OperationDefinition};
pub use registry::OperationRegistry;
pub use result::{OperationResult, Status};
pub use step::{FailureReason, FnStep, StepDefinition, StepFailure, StepOutcome, StepRunResult, Track};
