use std::fmt;

use chrono::{DateTime, Utc};
use rail_core::Params;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::DomainError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// `None` hasta que el repositorio la guarda.
    pub id: Option<Uuid>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub employees: Option<u32>,
    pub owner_id: Option<Uuid>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Company {
    pub fn new() -> Self {
        Self::default()
    }

    /// Construye una Company sin guardar a partir de los atributos
    /// asignables de `params`.
    pub fn from_params(params: &Params, owner_id: Option<Uuid>) -> Result<Self, DomainError> {
        let mut company = Company { owner_id,
                                    ..Company::default() };
        company.assign(params)?;
        Ok(company)
    }

    /// Copia `name`, `email` y `employees` si están en `params`. `null` borra
    /// el valor. `id`, `owner_id` y las marcas de tiempo no son asignables.
    pub fn assign(&mut self, params: &Params) -> Result<(), DomainError> {
        match self.assign_lenient(params).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Como `assign`, pero aplica todo lo que puede y devuelve los atributos
    /// rechazados en lugar de detenerse en el primero.
    pub fn assign_lenient(&mut self, params: &Params) -> Vec<DomainError> {
        let mut rejected = Vec::new();
        if let Some(v) = params.get("name") {
            match optional_string("name", v) {
                Ok(name) => self.name = name,
                Err(e) => rejected.push(e),
            }
        }
        if let Some(v) = params.get("email") {
            match optional_string("email", v) {
                Ok(email) => self.email = email,
                Err(e) => rejected.push(e),
            }
        }
        if let Some(v) = params.get("employees") {
            match optional_count("employees", v) {
                Ok(n) => self.employees = n,
                Err(e) => rejected.push(e),
            }
        }
        rejected
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_owned_by(&self, actor_id: Uuid) -> bool {
        self.owner_id == Some(actor_id)
    }

    pub fn to_value(&self) -> Result<Value, DomainError> {
        Ok(serde_json::to_value(self)?)
    }
}

fn optional_string(field: &str, v: &Value) -> Result<Option<String>, DomainError> {
    match v {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.trim().to_string())),
        other => Err(DomainError::invalid(field, format!("expected a string, got {other}"))),
    }
}

/// Acepta cualquier número finito sin parte decimal en `0..=u32::MAX`, como
/// valor JSON o como cadena (`12`, `12.0`, `"1e3"`).
fn optional_count(field: &str, v: &Value) -> Result<Option<u32>, DomainError> {
    let parsed = match v {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite() && n.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(n))
          .map(|n| Some(n as u32))
          .ok_or_else(|| DomainError::invalid(field, format!("expected a non-negative integer, got {v}")))
}

impl fmt::Display for Company {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.name.as_deref().unwrap_or("<unnamed>");
        match self.id {
            Some(id) => write!(f, "Company({name}, {id})"),
            None => write!(f, "Company({name}, unsaved)"),
        }
    }
}
