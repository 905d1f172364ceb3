//! Create and update payloads accepted at the API boundary.
//!
//! Payloads arrive typed (timestamps, integers, strings, status enum) through
//! serde; `validate` adds the length rules. Services trust validated payloads
//! and do not check them again.
//!
//! Update payloads carry every field as `Option`; only `Some` fields are
//! applied, and a JSON `null` counts as absent. Serializing an update payload
//! yields exactly the supplied fields in stored-document form.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::model::{Consulta, ConsultaStatus, Exam, Prontuario};
use crate::timestamp::Timestamp;

const REASON_MIN: usize = 3;
const REASON_MAX: usize = 255;
const MEDICAL_HISTORY_MIN: usize = 10;
const DIAGNOSIS_MIN: usize = 5;
const TREATMENT_MIN: usize = 5;
const EXAM_NAME_MIN: usize = 2;
const EXAM_NAME_MAX: usize = 100;

fn check_length(field: &str, value: &str, min: usize, max: Option<usize>) -> Result<()> {
    let len = value.chars().count();
    match max {
        Some(max) if len < min || len > max => Err(CoreError::validation(
            field,
            format!("must be between {min} and {max} characters, got {len}"),
        )),
        None if len < min => Err(CoreError::validation(
            field,
            format!("must be at least {min} characters, got {len}"),
        )),
        _ => Ok(()),
    }
}

/// Fields for a new appointment. The identifier is allocated by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewConsulta {
    pub scheduled_at: Timestamp,
    pub reason: String,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub status: ConsultaStatus,
}

impl NewConsulta {
    pub fn validate(&self) -> Result<()> {
        check_length("reason", &self.reason, REASON_MIN, Some(REASON_MAX))
    }

    pub fn into_consulta(self, id: i64) -> Consulta {
        Consulta {
            id,
            scheduled_at: self.scheduled_at,
            reason: self.reason,
            doctor_id: self.doctor_id,
            patient_id: self.patient_id,
            status: self.status,
        }
    }
}

/// Partial update of an appointment; the identifier cannot be changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultaChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ConsultaStatus>,
}

impl ConsultaChanges {
    pub fn validate(&self) -> Result<()> {
        match &self.reason {
            Some(reason) => check_length("reason", reason, REASON_MIN, Some(REASON_MAX)),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled_at.is_none()
            && self.reason.is_none()
            && self.doctor_id.is_none()
            && self.patient_id.is_none()
            && self.status.is_none()
    }
}

/// An exam entry as supplied by a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamInput {
    pub name: String,
    pub performed_at: Timestamp,
}

impl ExamInput {
    pub fn validate(&self) -> Result<()> {
        check_length("name", &self.name, EXAM_NAME_MIN, Some(EXAM_NAME_MAX))
    }

    fn validate_at(&self, index: usize) -> Result<()> {
        check_length(
            &format!("exams[{index}].name"),
            &self.name,
            EXAM_NAME_MIN,
            Some(EXAM_NAME_MAX),
        )
    }
}

impl From<ExamInput> for Exam {
    fn from(input: ExamInput) -> Self {
        Exam {
            name: input.name,
            performed_at: input.performed_at,
        }
    }
}

fn validate_exams(exams: &[ExamInput]) -> Result<()> {
    exams
        .iter()
        .enumerate()
        .try_for_each(|(index, exam)| exam.validate_at(index))
}

/// Fields for a new medical record, including its caller-chosen identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProntuario {
    pub id: i64,
    pub created_at: Timestamp,
    pub medical_history: String,
    pub diagnosis: String,
    pub patient_id: i64,
    pub treatment: String,
    #[serde(default)]
    pub exams: Vec<ExamInput>,
}

impl NewProntuario {
    pub fn validate(&self) -> Result<()> {
        check_length(
            "medicalHistory",
            &self.medical_history,
            MEDICAL_HISTORY_MIN,
            None,
        )?;
        check_length("diagnosis", &self.diagnosis, DIAGNOSIS_MIN, None)?;
        check_length("treatment", &self.treatment, TREATMENT_MIN, None)?;
        validate_exams(&self.exams)
    }

    pub fn into_prontuario(self) -> Prontuario {
        Prontuario {
            id: self.id,
            created_at: self.created_at,
            medical_history: self.medical_history,
            diagnosis: self.diagnosis,
            patient_id: self.patient_id,
            treatment: self.treatment,
            exams: self.exams.into_iter().map(Exam::from).collect(),
        }
    }
}

/// Partial update of a medical record. A supplied `exams` list replaces the
/// stored sequence as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProntuarioChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exams: Option<Vec<ExamInput>>,
}

impl ProntuarioChanges {
    pub fn validate(&self) -> Result<()> {
        if let Some(history) = &self.medical_history {
            check_length("medicalHistory", history, MEDICAL_HISTORY_MIN, None)?;
        }
        if let Some(diagnosis) = &self.diagnosis {
            check_length("diagnosis", diagnosis, DIAGNOSIS_MIN, None)?;
        }
        if let Some(treatment) = &self.treatment {
            check_length("treatment", treatment, TREATMENT_MIN, None)?;
        }
        match &self.exams {
            Some(exams) => validate_exams(exams),
            None => Ok(()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.created_at.is_none()
            && self.medical_history.is_none()
            && self.diagnosis.is_none()
            && self.patient_id.is_none()
            && self.treatment.is_none()
            && self.exams.is_none()
    }
}
