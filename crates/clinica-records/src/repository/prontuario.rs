use clinica_core::Prontuario;
use clinica_storage::CollectionSpec;

use super::{Entity, Repository};

pub const PRONTUARIOS: CollectionSpec = CollectionSpec::new("prontuarios", "id");

pub type ProntuarioRepository = Repository<Prontuario>;

impl Entity for Prontuario {
    const COLLECTION: CollectionSpec = PRONTUARIOS;
    const NAME: &'static str = "Prontuario";

    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{new_prontuario, store};

    #[tokio::test]
    async fn test_replace_keeps_single_document() {
        let repo = ProntuarioRepository::new(store());
        repo.insert(&new_prontuario(5).into_prontuario())
            .await
            .unwrap();

        let mut stored = repo.find_stored(5).await.unwrap().unwrap();
        assert!(!stored.document_id.is_empty());
        stored.entity.treatment = "Antiviral course".into();
        repo.replace(&stored).await.unwrap();

        let all = repo.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].treatment, "Antiviral course");
    }

    #[tokio::test]
    async fn test_find_stored_missing() {
        let repo = ProntuarioRepository::new(store());
        assert!(repo.find_stored(5).await.unwrap().is_none());
    }
}
