use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;

use crate::timestamp::Timestamp;

/// Lifecycle state of an appointment.
///
/// The Portuguese labels used by earlier clients are accepted on input and
/// normalised to the English form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsultaStatus {
    #[serde(alias = "Agendada")]
    Scheduled,
    #[serde(alias = "Realizada")]
    Completed,
    #[serde(alias = "Cancelada")]
    Cancelled,
}

impl ConsultaStatus {
    pub const ALL: [ConsultaStatus; 3] = [Self::Scheduled, Self::Completed, Self::Cancelled];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for ConsultaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An appointment linking a doctor, a patient, a reason and a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Consulta {
    pub id: i64,
    pub scheduled_at: Timestamp,
    pub reason: String,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub status: ConsultaStatus,
}

impl Consulta {
    /// Canonical external representation.
    pub fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "scheduledAt": self.scheduled_at.to_string(),
            "reason": self.reason,
            "doctorId": self.doctor_id,
            "patientId": self.patient_id,
            "status": self.status.as_str(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sample() -> Consulta {
        Consulta {
            id: 1,
            scheduled_at: Timestamp::new(datetime!(2025-07-25 10:00:00)),
            reason: "Check-up".into(),
            doctor_id: 101,
            patient_id: 201,
            status: ConsultaStatus::Scheduled,
        }
    }

    #[test]
    fn test_canonical_representation() {
        assert_eq!(
            sample().to_json(),
            json!({
                "id": 1,
                "scheduledAt": "2025-07-25 10:00:00",
                "reason": "Check-up",
                "doctorId": 101,
                "patientId": 201,
                "status": "Scheduled",
            })
        );
    }

    #[test]
    fn test_stored_document_form() {
        let doc = serde_json::to_value(sample()).unwrap();
        assert_eq!(doc["scheduledAt"], "2025-07-25T10:00:00Z");
        assert_eq!(doc["doctorId"], 101);

        let back: Consulta = serde_json::from_value(doc).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_status_accepts_legacy_labels() {
        let status: ConsultaStatus = serde_json::from_value(json!("Realizada")).unwrap();
        assert_eq!(status, ConsultaStatus::Completed);
        assert_eq!(serde_json::to_value(status).unwrap(), json!("Completed"));

        let status: ConsultaStatus = serde_json::from_value(json!("Cancelada")).unwrap();
        assert_eq!(status, ConsultaStatus::Cancelled);
    }

    #[test]
    fn test_status_rejects_unknown_values() {
        assert!(serde_json::from_value::<ConsultaStatus>(json!("Pending")).is_err());
        assert!(serde_json::from_value::<ConsultaStatus>(json!("scheduled")).is_err());
    }

    #[test]
    fn test_status_display_matches_wire() {
        for status in ConsultaStatus::ALL {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                json!(status.to_string())
            );
        }
    }
}
