use clinica_core::Consulta;
use clinica_storage::CollectionSpec;

use super::{Entity, Repository};

pub const CONSULTAS: CollectionSpec = CollectionSpec::new("consultas", "id");

pub type ConsultaRepository = Repository<Consulta>;

impl Entity for Consulta {
    const COLLECTION: CollectionSpec = CONSULTAS;
    const NAME: &'static str = "Consulta";

    fn id(&self) -> i64 {
        self.id
    }
}
