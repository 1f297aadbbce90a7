//! Contrato "company".

use rail_contracts::{messages, ContractError, ContractSchema, ContractSet, FieldRule};
use serde_json::Value;

pub const SCHEMA: &str = "company";
pub const CREATE: &str = "create";
pub const UPDATE: &str = "update";

const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

pub fn company_schema() -> Result<ContractSchema, ContractError> {
    Ok(ContractSchema::new(SCHEMA)
        .rule(FieldRule::length("name", None, Some(40)).on([CREATE]).allow_absent())
        .rule(FieldRule::format("email", EMAIL_PATTERN)?.on([CREATE]).allow_absent())
        .rule(FieldRule::presence("name").on([UPDATE]))
        .rule(FieldRule::length_between("name", 6, 20).on([UPDATE]))
        .rule(FieldRule::numericality("employees").integer_only()
                                                  .range(Some(0.0), Some(f64::from(u32::MAX)))
                                                  .allow_absent())
        .rule(FieldRule::custom("name", text_only).allow_absent())
        .rule(FieldRule::custom("email", text_only).allow_absent()))
}

/// Cualquier valor que `Company` no puede guardar debe fallar aquí.
fn text_only(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(v) if !v.is_string() => vec![messages::INVALID.to_string()],
        _ => Vec::new(),
    }
}

/// Catálogo con todos los contratos de las operaciones Company.
pub fn company_contracts() -> Result<ContractSet, ContractError> {
    ContractSet::new().with(company_schema()?)
}
