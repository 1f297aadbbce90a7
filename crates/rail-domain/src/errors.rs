use thiserror::Error;

/// Errores del dominio Company/Actor.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid value for '{field}': {reason}")]
    InvalidAttribute { field: String, reason: String },

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidAttribute { field: field.into(),
                                        reason: reason.into() }
    }

    /// Campo afectado, si el error se refiere a uno.
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::InvalidAttribute { field, .. } => Some(field),
            _ => None,
        }
    }
}
