//! Mensajes por defecto de las comprobaciones.

pub const BLANK: &str = "can't be blank";
pub const TOO_SHORT: &str = "too short";
pub const TOO_LONG: &str = "too long";
pub const INVALID: &str = "is invalid";
pub const NOT_INCLUDED: &str = "is not included in the list";
pub const NOT_A_NUMBER: &str = "is not a number";
pub const NOT_AN_INTEGER: &str = "must be an integer";
pub const NOT_FOUND: &str = "not found";

pub fn greater_than_or_equal_to(min: f64) -> String {
    format!("must be greater than or equal to {min}")
}

pub fn less_than_or_equal_to(max: f64) -> String {
    format!("must be less than or equal to {max}")
}
