//! Errores de persistencia.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("company {0} not found")]
    NotFound(Uuid),
    #[error("store capacity exceeded ({capacity} records)")]
    CapacityExceeded { capacity: usize },
    #[error("store is read-only")]
    ReadOnly,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
