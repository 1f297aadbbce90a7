use rail_domain::Company;
use uuid::Uuid;

use crate::PersistenceError;

/// Contrato de almacenamiento de Company.
///
/// Implementaciones deben ser `Send + Sync`: un mismo repositorio atiende
/// invocaciones concurrentes.
pub trait CompanyRepository: Send + Sync {
    fn find(&self, id: Uuid) -> Result<Option<Company>, PersistenceError>;

    /// Inserta (si `id` es `None`) o actualiza. Devuelve la fila guardada,
    /// con `id` y marcas de tiempo asignadas.
    fn save(&self, company: Company) -> Result<Company, PersistenceError>;

    fn count(&self) -> Result<usize, PersistenceError>;
}
