//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable (`CONFIG`).

use std::env;

use log::warn;
use once_cell::sync::Lazy;
use rail_persistence::{init_dotenv, StoreConfig};

pub const LOG_VAR: &str = "RAILFLOW_LOG";
pub const NOTIFY_FROM_VAR: &str = "RAILFLOW_NOTIFY_FROM";

pub const DEFAULT_LOG_FILTER: &str = "info";

/// Configuración global de la aplicación.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Filtro para `EnvFilter` (p. ej. "info" o "rail_core=debug").
    pub log_filter: String,
    /// Remitente de las notificaciones de alta.
    pub notify_from: String,
    pub store: StoreConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { log_filter: DEFAULT_LOG_FILTER.to_string(),
               notify_from: rail_adapters::company::DEFAULT_NOTIFY_FROM.to_string(),
               store: StoreConfig::default() }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        init_dotenv();
        let mut config = Self::from_lookup(|k| env::var(k).ok());
        config.store = StoreConfig::from_env();
        config
    }

    /// Lee sólo las variables propias de la fachada; `store` queda por
    /// defecto.
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let defaults = Self::default();
        let log_filter = lookup(LOG_VAR).map(|v| v.trim().to_string())
                                        .filter(|v| !v.is_empty())
                                        .unwrap_or(defaults.log_filter);
        let notify_from = match lookup(NOTIFY_FROM_VAR) {
            Some(v) if v.contains('@') => v.trim().to_string(),
            Some(v) => {
                warn!("{NOTIFY_FROM_VAR}='{v}' is not an address; using {}", defaults.notify_from);
                defaults.notify_from
            }
            None => defaults.notify_from,
        };
        Self { log_filter,
               notify_from,
               store: defaults.store }
    }

    /// Filtro efectivo: `-v` sube el nivel por encima de `RAILFLOW_LOG`.
    pub fn log_level(&self, verbose: u8) -> String {
        match verbose {
            0 => self.log_filter.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn reads_log_filter_and_sender() {
        let cfg = AppConfig::from_lookup(|k| match k {
            LOG_VAR => Some("rail_core=debug".into()),
            NOTIFY_FROM_VAR => Some("ops@acme.io".into()),
            _ => None,
        });
        assert_eq!(cfg.log_filter, "rail_core=debug");
        assert_eq!(cfg.notify_from, "ops@acme.io");
        assert_eq!(cfg.log_level(0), "rail_core=debug");
        assert_eq!(cfg.log_level(1), "debug");
        assert_eq!(cfg.log_level(5), "trace");
    }

    #[test]
    fn malformed_sender_falls_back() {
        let cfg = AppConfig::from_lookup(|k| (k == NOTIFY_FROM_VAR).then(|| "nobody".to_string()));
        assert_eq!(cfg.notify_from, AppConfig::default().notify_from);
    }
}
