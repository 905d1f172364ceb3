//! Entity services: identifier policy, exam conversion and the mapping of
//! store duplicate-key signals to domain conflicts.

mod consulta;
mod prontuario;

pub use consulta::{ALLOCATION_ATTEMPTS, ConsultaService};
pub use prontuario::ProntuarioService;
