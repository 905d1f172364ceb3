use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::timestamp::Timestamp;

/// A named, dated test result embedded in a medical record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub name: String,
    pub performed_at: Timestamp,
}

impl Exam {
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.name,
            "performedAt": self.performed_at.to_string(),
        })
    }
}

/// A patient's medical record. Owns its exams; they are stored inline and
/// written together with the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prontuario {
    pub id: i64,
    pub created_at: Timestamp,
    pub medical_history: String,
    pub diagnosis: String,
    pub patient_id: i64,
    pub treatment: String,
    #[serde(default)]
    pub exams: Vec<Exam>,
}

impl Prontuario {
    /// Appends an exam to the end of the sequence.
    pub fn add_exam(&mut self, exam: Exam) {
        self.exams.push(exam);
    }

    /// Drops every exam named exactly `name`; returns how many were removed.
    pub fn remove_exams(&mut self, name: &str) -> usize {
        let before = self.exams.len();
        self.exams.retain(|exam| exam.name != name);
        before - self.exams.len()
    }

    /// Canonical external representation.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "createdAt": self.created_at.to_string(),
            "medicalHistory": self.medical_history,
            "diagnosis": self.diagnosis,
            "patientId": self.patient_id,
            "treatment": self.treatment,
            "exams": self.exams.iter().map(Exam::to_json).collect::<Vec<_>>(),
        })
    }
}
