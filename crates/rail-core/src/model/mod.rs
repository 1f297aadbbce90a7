//! Modelos neutrales (RunContext, ErrorMap, Params).

pub mod context;
pub mod error_map;

pub use context::{params_from_value, Params, RunContext};
pub use error_map::ErrorMap;
