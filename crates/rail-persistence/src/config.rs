//! Carga de configuración del almacén desde variables de entorno.
//! `RAILFLOW_STORE_CAPACITY` (entero, opcional) y
//! `RAILFLOW_STORE_READ_ONLY` (bool, por defecto false).

use std::env;

use dotenvy::dotenv;
use log::warn;
use once_cell::sync::Lazy;

pub const CAPACITY_VAR: &str = "RAILFLOW_STORE_CAPACITY";
pub const READ_ONLY_VAR: &str = "RAILFLOW_STORE_READ_ONLY";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Máximo de filas; `None` = sin límite.
    pub capacity: Option<usize>,
    pub read_only: bool,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Igual que `from_env` pero con una fuente de variables arbitraria.
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let capacity = lookup(CAPACITY_VAR).and_then(|raw| match raw.trim().parse::<usize>() {
                                               Ok(n) => Some(n),
                                               Err(_) => {
                                                   warn!("{CAPACITY_VAR}='{raw}' is not a number; using no limit");
                                                   None
                                               }
                                           });
        let read_only = lookup(READ_ONLY_VAR).map(|raw| parse_bool(READ_ONLY_VAR, &raw))
                                             .unwrap_or(false);
        Self { capacity, read_only }
    }
}

fn parse_bool(var: &str, raw: &str) -> bool {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" | "" => false,
        _ => {
            warn!("{var}='{raw}' is not a boolean; using false");
            false
        }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |k: &str| map.get(k).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        assert_eq!(StoreConfig::from_lookup(lookup(&[])), StoreConfig::default());
    }

    #[test]
    fn parses_capacity_and_read_only() {
        let cfg = StoreConfig::from_lookup(lookup(&[(CAPACITY_VAR, " 3 "), (READ_ONLY_VAR, "TRUE")]));
        assert_eq!(cfg.capacity, Some(3));
        assert!(cfg.read_only);
    }

    #[test]
    fn malformed_values_fall_back() {
        let cfg = StoreConfig::from_lookup(lookup(&[(CAPACITY_VAR, "lots"), (READ_ONLY_VAR, "maybe")]));
        assert_eq!(cfg, StoreConfig::default());
    }
}
