use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContractError {
    #[error("unknown contract schema '{0}'")]
    UnknownSchema(String),
    #[error("duplicate contract schema '{0}'")]
    DuplicateSchema(String),
    #[error("invalid format pattern for field '{field}': {source}")]
    InvalidPattern {
        field: String,
        #[source]
        source: regex::Error,
    },
}
