use std::collections::BTreeMap;

use log::debug;
use rail_core::{ErrorMap, Params};

use crate::error::ContractError;
use crate::schema::ContractSchema;

/// Catálogo de esquemas indexado por nombre.
#[derive(Debug, Clone, Default)]
pub struct ContractSet {
    schemas: BTreeMap<String, ContractSchema>,
}

impl ContractSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, schema: ContractSchema) -> Result<(), ContractError> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(ContractError::DuplicateSchema(name));
        }
        debug!("contract schema '{name}' registered ({} rules)", schema.rules().len());
        self.schemas.insert(name, schema);
        Ok(())
    }

    pub fn with(mut self, schema: ContractSchema) -> Result<Self, ContractError> {
        self.insert(schema)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&ContractSchema> {
        self.schemas.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    /// Valida `payload` contra el esquema `schema` en `scope`.
    ///
    /// Un esquema inexistente es un error de configuración, no un fallo de
    /// validación.
    pub fn validate(&self, schema: &str, payload: &Params, scope: &str) -> Result<ErrorMap, ContractError> {
        let found = self.get(schema)
                        .ok_or_else(|| ContractError::UnknownSchema(schema.to_string()))?;
        Ok(found.validate(payload, scope))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FieldRule;
    use serde_json::json;

    #[test]
    fn unknown_schema_is_an_error() {
        let set = ContractSet::new();
        let err = set.validate("company", &Params::new(), "create").unwrap_err();
        assert!(matches!(err, ContractError::UnknownSchema(n) if n == "company"));
    }

    #[test]
    fn duplicate_schema_is_rejected() {
        let set = ContractSet::new().with(ContractSchema::new("company")).unwrap();
        assert!(matches!(set.with(ContractSchema::new("company")), Err(ContractError::DuplicateSchema(_))));
    }

    #[test]
    fn validates_through_named_schema() {
        let set = ContractSet::new().with(ContractSchema::new("company").rule(FieldRule::presence("name")))
                                    .unwrap();
        let payload = rail_core::params_from_value(json!({"name": ""})).unwrap();
        let errors = set.validate("company", &payload, "create").unwrap();
        assert_eq!(errors.get("name"), Some(&["can't be blank".to_string()][..]));
        assert_eq!(set.names(), vec!["company"]);
    }
}
