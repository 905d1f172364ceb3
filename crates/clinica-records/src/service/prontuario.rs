use clinica_core::{
    CoreError, Exam, ExamInput, NewProntuario, Prontuario, ProntuarioChanges, Result,
};
use clinica_storage::DynDocumentStore;
use tracing::info;

use crate::repository::{Entity, ProntuarioRepository, encode};

/// Medical record operations. Identifiers are chosen by the caller.
#[derive(Debug, Clone)]
pub struct ProntuarioService {
    repository: ProntuarioRepository,
}

impl ProntuarioService {
    pub fn new(store: DynDocumentStore) -> Self {
        Self {
            repository: ProntuarioRepository::new(store),
        }
    }

    /// Persists a new record; an identifier already in use is a conflict.
    pub async fn create(&self, data: NewProntuario) -> Result<Prontuario> {
        let prontuario = data.into_prontuario();
        match self.repository.insert(&prontuario).await {
            Ok(saved) => {
                info!(id = saved.id, exams = saved.exams.len(), "prontuario created");
                Ok(saved)
            }
            Err(err) if err.is_duplicate_key() => {
                Err(CoreError::conflict(Prontuario::NAME, prontuario.id))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn list(&self) -> Result<Vec<Prontuario>> {
        Ok(self.repository.find_all().await?)
    }

    pub async fn get(&self, id: i64) -> Result<Option<Prontuario>> {
        Ok(self.repository.find_by_id(id).await?)
    }

    /// Applies the supplied fields; returns the matched count (0 means absent).
    ///
    /// A supplied exam list replaces the stored one entirely.
    pub async fn update(&self, id: i64, mut changes: ProntuarioChanges) -> Result<u64> {
        if changes.is_empty() {
            return Ok(u64::from(self.repository.find_by_id(id).await?.is_some()));
        }

        let exams: Option<Vec<Exam>> = changes
            .exams
            .take()
            .map(|exams| exams.into_iter().map(Exam::from).collect());
        let mut patch = encode(&changes)?;
        if let Some(exams) = exams {
            patch.insert("exams".to_string(), serde_json::to_value(exams)?);
        }

        let result = self.repository.update(id, patch).await?;
        info!(id, modified = result.modified_count, "prontuario updated");
        Ok(result.matched_count)
    }

    /// Removes the record together with its exams.
    pub async fn delete(&self, id: i64) -> Result<u64> {
        let deleted = self.repository.delete(id).await?;
        if deleted > 0 {
            info!(id, "prontuario deleted");
        }
        Ok(deleted)
    }

    /// Appends one exam and saves the record. `None` when the record is absent.
    pub async fn add_exam(&self, id: i64, exam: ExamInput) -> Result<Option<Prontuario>> {
        let Some(mut stored) = self.repository.find_stored(id).await? else {
            return Ok(None);
        };
        stored.entity.add_exam(exam.into());
        self.repository.replace(&stored).await?;
        info!(id, exams = stored.entity.exams.len(), "exam added");
        Ok(Some(stored.entity))
    }

    /// Removes every exam named exactly `name` and saves the record.
    pub async fn remove_exams(&self, id: i64, name: &str) -> Result<Option<Prontuario>> {
        let Some(mut stored) = self.repository.find_stored(id).await? else {
            return Ok(None);
        };
        let removed = stored.entity.remove_exams(name);
        if removed > 0 {
            self.repository.replace(&stored).await?;
            info!(id, removed, "exams removed");
        }
        Ok(Some(stored.entity))
    }
}
