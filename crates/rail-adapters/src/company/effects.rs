//! Colaboradores de efectos secundarios: notificación y auditoría.
//!
//! Ambos son sustitutos en memoria de servicios externos (correo, log de
//! auditoría). Sus errores llegan al motor como fallos de infraestructura.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("{0} lock poisoned")]
    Poisoned(&'static str),
    #[error("delivery failed: {0}")]
    Delivery(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub from: String,
    pub subject: String,
    pub company_id: Option<Uuid>,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification) -> Result<(), EffectError>;
}

/// Bandeja de salida en memoria.
#[derive(Debug, Default)]
pub struct InMemoryOutbox {
    sent: Mutex<Vec<Notification>>,
}

impl InMemoryOutbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Result<Vec<Notification>, EffectError> {
        Ok(self.sent.lock().map_err(|_| EffectError::Poisoned("outbox"))?.clone())
    }
}

impl Notifier for InMemoryOutbox {
    fn notify(&self, notification: Notification) -> Result<(), EffectError> {
        self.sent
            .lock()
            .map_err(|_| EffectError::Poisoned("outbox"))?
            .push(notification);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub run_id: Uuid,
    pub operation: String,
    pub actor_id: Option<Uuid>,
    pub messages: Vec<String>,
    pub at: DateTime<Utc>,
}

/// Registro de rechazos (fallos y abortos) en memoria.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: AuditEntry) -> Result<(), EffectError> {
        self.entries
            .lock()
            .map_err(|_| EffectError::Poisoned("audit log"))?
            .push(entry);
        Ok(())
    }

    pub fn entries(&self) -> Result<Vec<AuditEntry>, EffectError> {
        Ok(self.entries.lock().map_err(|_| EffectError::Poisoned("audit log"))?.clone())
    }
}
