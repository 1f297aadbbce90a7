use log::trace;
use rail_core::{ErrorMap, Params};

use crate::rule::FieldRule;

/// Conjunto ordenado de reglas con nombre.
///
/// El orden de declaración fija el orden de campos y mensajes del
/// `ErrorMap` resultante.
#[derive(Debug, Clone)]
pub struct ContractSchema {
    name: String,
    rules: Vec<FieldRule>,
}

impl ContractSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(),
               rules: Vec::new() }
    }

    pub fn rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    /// Reglas activas en `scope`.
    pub fn rules_for<'a>(&'a self, scope: &'a str) -> impl Iterator<Item = &'a FieldRule> + 'a {
        self.rules.iter().filter(move |r| r.applies_to(scope))
    }

    /// Valida `payload` con las reglas activas en `scope`. Nunca falla: un
    /// payload inválido produce un `ErrorMap` no vacío.
    pub fn validate(&self, payload: &Params, scope: &str) -> ErrorMap {
        let mut errors = ErrorMap::new();
        for rule in self.rules_for(scope) {
            for msg in rule.evaluate(payload) {
                errors.add(rule.field(), msg);
            }
        }
        trace!("contract '{}' scope '{scope}': {} message(s)", self.name, errors.message_count());
        errors
    }
}
