use rail_contracts::ContractError;
use rail_core::CoreEngineError;
use thiserror::Error;

/// Errores al montar operaciones (tiempo de definición).
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error(transparent)]
    Core(#[from] CoreEngineError),
    #[error(transparent)]
    Contract(#[from] ContractError),
}
