//! rail-persistence
//!
//! Almacenamiento en memoria para las operaciones de ejemplo. Sustituye a
//! un ORM real: el motor sólo ve el trait `CompanyRepository` y trata
//! cualquier `PersistenceError` como fallo de infraestructura.
//!
//! Módulos:
//! - `config`: carga de `StoreConfig` desde .env / entorno.
//! - `memory`: `InMemoryCompanyRepository` sobre `dashmap`.
//! - `repository`: el contrato de almacenamiento.

pub mod config;
pub mod error;
pub mod memory;
pub mod repository;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use memory::InMemoryCompanyRepository;
pub use repository::CompanyRepository;
