use clinica_core::{Consulta, ConsultaChanges, CoreError, NewConsulta, Result, next_free_id};
use clinica_storage::DynDocumentStore;
use tracing::{info, warn};

use crate::repository::{ConsultaRepository, Entity, encode};

/// Persist attempts per creation: the first try plus one retry after an
/// identifier race.
pub const ALLOCATION_ATTEMPTS: usize = 2;

/// Appointment operations. Identifiers are allocated gap-filling from 1.
#[derive(Debug, Clone)]
pub struct ConsultaService {
    repository: ConsultaRepository,
}

impl ConsultaService {
    pub fn new(store: DynDocumentStore) -> Self {
        Self {
            repository: ConsultaRepository::new(store),
        }
    }

    /// Persists a new appointment under the smallest free identifier.
    ///
    /// The identifier is recomputed from the store before every attempt. A
    /// duplicate key on the last attempt becomes [`CoreError::Conflict`].
    pub async fn create(&self, data: NewConsulta) -> Result<Consulta> {
        let mut attempt = 1;
        loop {
            let id = next_free_id(self.repository.existing_ids().await?);
            let consulta = data.clone().into_consulta(id);

            match self.repository.insert(&consulta).await {
                Ok(saved) => {
                    info!(id, attempt, "consulta created");
                    return Ok(saved);
                }
                Err(err) if err.is_duplicate_key() && attempt < ALLOCATION_ATTEMPTS => {
                    warn!(id, attempt, "identifier taken concurrently, reallocating");
                    attempt += 1;
                }
                Err(err) if err.is_duplicate_key() => {
                    warn!(id, attempt, "identifier conflict after retry");
                    return Err(CoreError::conflict(Consulta::NAME, id));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    pub async fn list(&self) -> Result<Vec<Consulta>> {
        Ok(self.repository.find_all().await?)
    }

    /// `None` when no appointment has this identifier.
    pub async fn get(&self, id: i64) -> Result<Option<Consulta>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Applies the supplied fields; returns the matched count (0 means absent).
    pub async fn update(&self, id: i64, changes: ConsultaChanges) -> Result<u64> {
        if changes.is_empty() {
            return Ok(u64::from(self.repository.find_by_id(id).await?.is_some()));
        }
        let patch = encode(&changes)?;
        let result = self.repository.update(id, patch).await?;
        info!(id, modified = result.modified_count, "consulta updated");
        Ok(result.matched_count)
    }

    /// Returns the deleted count (0 or 1).
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let deleted = self.repository.delete(id).await?;
        if deleted > 0 {
            info!(id, "consulta deleted");
        }
        Ok(deleted)
    }
}
