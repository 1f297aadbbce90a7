//! Constantes del motor core.
//!
//! Agrupa valores estáticos compartidos por el executor, los steps de
//! adaptación y los tests. `ENGINE_VERSION` forma parte del evento
//! `RunStarted` para poder correlacionar trazas entre versiones del motor.

/// Versión lógica del motor de operaciones.
pub const ENGINE_VERSION: &str = "R1.0";

/// Clave reservada para errores que no pertenecen a un campo concreto
/// (p. ej. autorización denegada).
pub const BASE_KEY: &str = "base";

/// Mensaje que se registra bajo `BASE_KEY` cuando una política deniega.
pub const NOT_AUTHORIZED: &str = "not authorized";
