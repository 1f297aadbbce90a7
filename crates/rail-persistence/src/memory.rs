use chrono::Utc;
use dashmap::DashMap;
use log::debug;
use rail_domain::Company;
use uuid::Uuid;

use crate::{CompanyRepository, PersistenceError, StoreConfig};

/// Repositorio en memoria. Útil para tests y para la CLI.
#[derive(Debug, Default)]
pub struct InMemoryCompanyRepository {
    rows: DashMap<Uuid, Company>,
    config: StoreConfig,
}

impl InMemoryCompanyRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self { rows: DashMap::new(),
               config }
    }

    pub fn from_env() -> Self {
        Self::with_config(StoreConfig::from_env())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Copia de todas las filas, ordenadas por `created_at`.
    pub fn snapshot(&self) -> Vec<Company> {
        let mut rows: Vec<Company> = self.rows.iter().map(|r| r.value().clone()).collect();
        rows.sort_by_key(|c| c.created_at);
        rows
    }
}

impl CompanyRepository for InMemoryCompanyRepository {
    fn find(&self, id: Uuid) -> Result<Option<Company>, PersistenceError> {
        let found = self.rows.get(&id).map(|r| r.value().clone());
        debug!("find company {id}: {}", if found.is_some() { "hit" } else { "miss" });
        Ok(found)
    }

    fn save(&self, mut company: Company) -> Result<Company, PersistenceError> {
        if self.config.read_only {
            return Err(PersistenceError::ReadOnly);
        }
        let now = Utc::now();
        match company.id {
            Some(id) => {
                let mut row = self.rows.get_mut(&id).ok_or(PersistenceError::NotFound(id))?;
                company.created_at = row.created_at;
                company.updated_at = Some(now);
                *row = company.clone();
                debug!("updated company {id}");
            }
            None => {
                if let Some(capacity) = self.config.capacity {
                    if self.rows.len() >= capacity {
                        return Err(PersistenceError::CapacityExceeded { capacity });
                    }
                }
                let id = Uuid::new_v4();
                company.id = Some(id);
                company.created_at = Some(now);
                company.updated_at = Some(now);
                self.rows.insert(id, company.clone());
                debug!("inserted company {id}");
            }
        }
        Ok(company)
    }

    fn count(&self) -> Result<usize, PersistenceError> {
        Ok(self.rows.len())
    }
}
