use serde::{Deserialize, Serialize};
use sqlx::types::Uuid;
use time::{Date, OffsetDateTime};
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, Serialize, Deserialize)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Booked,
    Cancelled,
}

/// A reservation binding a student to one of a professor's slots.
/// `cancelled` is terminal; records are never deleted.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub student_id: Uuid,
    pub professor_id: Uuid,
    pub date: Date,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub student_id: Uuid,
    pub professor_id: Uuid,
    pub date: Date,
    pub time_slot: String,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentPayload {
    pub professor_id: Uuid,
    pub date: String,
    #[validate(length(min = 1, message = "timeSlot is required"))]
    pub time_slot: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_uses_camel_case_wire_format() {
        let payload: BookAppointmentPayload = serde_json::from_str(
            r#"{"professorId":"7e2c9f6a-44a5-4f0b-b6cd-3a54f45e8d01","date":"2024-03-20","timeSlot":"09:00"}"#,
        )
        .unwrap();
        assert_eq!(payload.date, "2024-03-20");
        assert_eq!(payload.time_slot, "09:00");
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Booked).unwrap(),
            r#""booked""#
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::Cancelled).unwrap(),
            r#""cancelled""#
        );
    }
}
