pub mod error;
pub mod id;
pub mod model;
pub mod payload;
pub mod timestamp;

pub use error::{CoreError, ErrorCategory, Result};
pub use id::next_free_id;
pub use model::{Consulta, ConsultaStatus, Exam, Prontuario};
pub use payload::{ConsultaChanges, ExamInput, NewConsulta, NewProntuario, ProntuarioChanges};
pub use timestamp::Timestamp;
