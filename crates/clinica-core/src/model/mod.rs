//! Domain entities.
//!
//! Entities are well-formed by construction: payloads are validated once at
//! the boundary (see [`crate::payload`]) and converted into these types, so
//! nothing here re-checks field ranges.
//!
//! Each entity serializes (serde) into its stored document form and renders
//! its canonical external representation through `to_json`.

mod consulta;
mod prontuario;

pub use consulta::{Consulta, ConsultaStatus};
pub use prontuario::{Exam, Prontuario};
