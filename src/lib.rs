//! railflow
//!
//! Fachada del workspace: reexporta los crates `rail-*`, carga la
//! configuración de entorno, inicializa el logging y monta la aplicación de
//! ejemplo (operaciones Company sobre colaboradores en memoria).
//!
//! ```ignore
//! let app = railflow::App::new(&railflow::config::CONFIG)?;
//! let res = app.run("CompanyCreate", params, Some(Actor::admin()))?;
//! ```

pub mod app;
pub mod config;
pub mod logging;

pub use app::{actor_from_args, params_from_pairs, parse_param, App, AppError, Invocation, OperationSummary};
pub use config::AppConfig;

pub use rail_adapters;
pub use rail_contracts;
pub use rail_core;
pub use rail_domain;
pub use rail_persistence;
pub use rail_policies;
