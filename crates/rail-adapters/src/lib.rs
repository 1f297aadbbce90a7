//! rail-adapters: capa de adaptación entre el motor y el dominio.
//!
//! Este crate provee:
//! - Steps genéricos (`ContractStep`, `AuthorizeStep`) que conectan
//!   `rail-contracts` y `rail-policies` con el executor.
//! - Los steps, contrato, política y definiciones de las operaciones
//!   Company, más `build_registry` para registrarlas.

pub mod company;
pub mod error;
pub mod steps;

pub use company::{build_registry, CompanyDeps, CompanyRegistry};
pub use error::AdapterError;
pub use steps::{AuthorizeStep, ContractStep};
