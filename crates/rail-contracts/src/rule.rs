//! Reglas de campo: qué se comprueba, en qué ámbitos y con qué mensaje.

use std::fmt;
use std::sync::Arc;

use rail_core::Params;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ContractError;
use crate::messages;

/// Ámbito de activación de una regla (p. ej. "create" / "update").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Always,
    Only(Vec<String>),
}

impl Scope {
    pub fn matches(&self, scope: &str) -> bool {
        match self {
            Scope::Always => true,
            Scope::Only(scopes) => scopes.iter().any(|s| s == scope),
        }
    }
}

/// Predicado personalizado: recibe el valor (None si falta) y devuelve los
/// mensajes de error (vacío = válido).
pub type CustomCheck = Arc<dyn Fn(Option<&Value>) -> Vec<String> + Send + Sync>;

#[derive(Clone)]
pub enum Check {
    Presence,
    Length { min: Option<usize>, max: Option<usize> },
    Format(Regex),
    Inclusion(Vec<Value>),
    Numericality { integer_only: bool, min: Option<f64>, max: Option<f64> },
    Custom(CustomCheck),
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Presence => write!(f, "Presence"),
            Check::Length { min, max } => write!(f, "Length({min:?}..{max:?})"),
            Check::Format(re) => write!(f, "Format({})", re.as_str()),
            Check::Inclusion(values) => write!(f, "Inclusion({values:?})"),
            Check::Numericality { integer_only, min, max } => {
                write!(f, "Numericality(integer_only={integer_only}, {min:?}..{max:?})")
            }
            Check::Custom(_) => write!(f, "Custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    field: String,
    check: Check,
    scope: Scope,
    allow_absent: bool,
    message: Option<String>,
}

impl FieldRule {
    fn new(field: impl Into<String>, check: Check) -> Self {
        Self { field: field.into(),
               check,
               scope: Scope::Always,
               allow_absent: false,
               message: None }
    }

    pub fn presence(field: impl Into<String>) -> Self {
        Self::new(field, Check::Presence)
    }

    pub fn length(field: impl Into<String>, min: Option<usize>, max: Option<usize>) -> Self {
        Self::new(field, Check::Length { min, max })
    }

    /// Longitud dentro de `min..=max` (en caracteres).
    pub fn length_between(field: impl Into<String>, min: usize, max: usize) -> Self {
        Self::length(field, Some(min), Some(max))
    }

    pub fn format(field: impl Into<String>, pattern: &str) -> Result<Self, ContractError> {
        let field = field.into();
        let re = Regex::new(pattern).map_err(|source| ContractError::InvalidPattern { field: field.clone(),
                                                                                       source })?;
        Ok(Self::new(field, Check::Format(re)))
    }

    pub fn inclusion(field: impl Into<String>, allowed: impl IntoIterator<Item = Value>) -> Self {
        Self::new(field, Check::Inclusion(allowed.into_iter().collect()))
    }

    pub fn numericality(field: impl Into<String>) -> Self {
        Self::new(field, Check::Numericality { integer_only: false, min: None, max: None })
    }

    pub fn custom<F>(field: impl Into<String>, check: F) -> Self
        where F: Fn(Option<&Value>) -> Vec<String> + Send + Sync + 'static
    {
        Self::new(field, Check::Custom(Arc::new(check)))
    }

    /// Restringe la regla a los ámbitos dados.
    pub fn on<I, S>(mut self, scopes: I) -> Self
        where I: IntoIterator<Item = S>,
              S: Into<String>
    {
        self.scope = Scope::Only(scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Omite la regla cuando el campo falta o es `null`. Sin efecto en
    /// `presence`.
    pub fn allow_absent(mut self) -> Self {
        self.allow_absent = true;
        self
    }

    /// Sustituye el mensaje por defecto de cualquier fallo de la regla.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sólo aplica a `numericality`.
    pub fn integer_only(mut self) -> Self {
        if let Check::Numericality { integer_only, .. } = &mut self.check {
            *integer_only = true;
        }
        self
    }

    /// Sólo aplica a `numericality`.
    pub fn range(mut self, lo: Option<f64>, hi: Option<f64>) -> Self {
        if let Check::Numericality { min, max, .. } = &mut self.check {
            *min = lo;
            *max = hi;
        }
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn check(&self) -> &Check {
        &self.check
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn applies_to(&self, scope: &str) -> bool {
        self.scope.matches(scope)
    }

    /// Evalúa la regla contra `payload`. Devuelve los mensajes de fallo.
    pub fn evaluate(&self, payload: &Params) -> Vec<String> {
        let value = payload.get(&self.field).filter(|v| !v.is_null());
        if value.is_none() && self.allow_absent && !matches!(self.check, Check::Presence) {
            return Vec::new();
        }
        let failures = match &self.check {
            Check::Presence => check_presence(value),
            Check::Length { min, max } => check_length(value, *min, *max),
            Check::Format(re) => check_format(value, re),
            Check::Inclusion(allowed) => check_inclusion(value, allowed),
            Check::Numericality { integer_only, min, max } => check_numericality(value, *integer_only, *min, *max),
            Check::Custom(f) => f(value),
        };
        match &self.message {
            Some(msg) if !failures.is_empty() => vec![msg.clone()],
            _ => failures,
        }
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(Value::Object(o)) => o.is_empty(),
        Some(_) => false,
    }
}

/// Longitud observable de un valor. Un valor ausente mide 0.
fn value_len(value: Option<&Value>) -> usize {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::String(s)) => s.chars().count(),
        Some(Value::Array(a)) => a.len(),
        Some(Value::Object(o)) => o.len(),
        Some(other) => other.to_string().chars().count(),
    }
}

fn check_presence(value: Option<&Value>) -> Vec<String> {
    if is_blank(value) {
        vec![messages::BLANK.to_string()]
    } else {
        Vec::new()
    }
}

fn check_length(value: Option<&Value>, min: Option<usize>, max: Option<usize>) -> Vec<String> {
    let len = value_len(value);
    let mut out = Vec::new();
    if let Some(min) = min {
        if len < min {
            out.push(messages::TOO_SHORT.to_string());
        }
    }
    if let Some(max) = max {
        if len > max {
            out.push(messages::TOO_LONG.to_string());
        }
    }
    out
}

fn check_format(value: Option<&Value>, re: &Regex) -> Vec<String> {
    match value.and_then(Value::as_str) {
        Some(s) if re.is_match(s) => Vec::new(),
        _ => vec![messages::INVALID.to_string()],
    }
}

fn check_inclusion(value: Option<&Value>, allowed: &[Value]) -> Vec<String> {
    match value {
        Some(v) if allowed.contains(v) => Vec::new(),
        _ => vec![messages::NOT_INCLUDED.to_string()],
    }
}

/// `NaN` e infinitos no cuentan como número.
fn as_number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn check_numericality(value: Option<&Value>, integer_only: bool, min: Option<f64>, max: Option<f64>) -> Vec<String> {
    let Some(n) = as_number(value) else {
        return vec![messages::NOT_A_NUMBER.to_string()];
    };
    let mut out = Vec::new();
    if integer_only && n.fract() != 0.0 {
        out.push(messages::NOT_AN_INTEGER.to_string());
    }
    if let Some(min) = min {
        if n < min {
            out.push(messages::greater_than_or_equal_to(min));
        }
    }
    if let Some(max) = max {
        if n > max {
            out.push(messages::less_than_or_equal_to(max));
        }
    }
    out
}
