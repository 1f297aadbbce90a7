//! rail-domain: modelos de ejemplo (Company) y el actor que invoca las
//! operaciones.
pub mod actor;
pub mod company;
pub mod errors;

pub use actor::{Actor, Role};
pub use company::Company;
pub use errors::DomainError;
