//! Repositories and entity services for the Clinica server.
//!
//! Repositories are typed facades over an injected [`DynDocumentStore`]; they
//! relay store errors unchanged. Services sit on top, own the identifier
//! policy of each entity and are the only place a store duplicate-key signal
//! becomes a domain [`CoreError::Conflict`].
//!
//! [`DynDocumentStore`]: clinica_storage::DynDocumentStore
//! [`CoreError::Conflict`]: clinica_core::CoreError::Conflict

pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use repository::{
    CONSULTAS, ConsultaRepository, Entity, PRONTUARIOS, ProntuarioRepository, Repository, Stored,
};
pub use service::{ALLOCATION_ATTEMPTS, ConsultaService, ProntuarioService};

/// Collections used by the services; backends create their unique indexes
/// from this list.
pub const COLLECTIONS: [clinica_storage::CollectionSpec; 2] = [CONSULTAS, PRONTUARIOS];
