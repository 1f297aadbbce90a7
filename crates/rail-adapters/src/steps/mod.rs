//! Steps genéricos reutilizables por cualquier operación.

pub mod authorize;
pub mod contract;

pub use authorize::AuthorizeStep;
pub use contract::ContractStep;
