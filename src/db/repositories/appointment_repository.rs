use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{Appointment, NewAppointment};

use super::AppointmentStore;

/// Postgres-backed appointment ledger. The partial unique index on
/// (professor_id, date, time_slot) WHERE status = 'booked' is the
/// anti-double-booking guard.
#[derive(Debug, Clone)]
pub struct AppointmentRepository {
    pool: PgPool,
}

impl AppointmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppointmentStore for AppointmentRepository {
    async fn insert(&self, new: &NewAppointment) -> Result<Appointment, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "INSERT INTO appointments (student_id, professor_id, date, time_slot, status)
             VALUES ($1, $2, $3, $4, 'booked')
             RETURNING *",
        )
        .bind(new.student_id)
        .bind(new.professor_id)
        .bind(new.date)
        .bind(&new.time_slot)
        .fetch_one(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let appointment =
            sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(appointment)
    }

    async fn find_booked(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointment = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE professor_id = $1 AND date = $2 AND time_slot = $3 AND status = 'booked'",
        )
        .bind(professor_id)
        .bind(date)
        .bind(slot)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }

    async fn booked_slots(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Vec<String>, DatabaseError> {
        let slots: Vec<String> = sqlx::query_scalar(
            "SELECT time_slot FROM appointments
             WHERE professor_id = $1 AND date = $2 AND status = 'booked'",
        )
        .bind(professor_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(slots)
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE student_id = $1
             ORDER BY date ASC, time_slot ASC",
        )
        .bind(student_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn list_for_professor(
        &self,
        professor_id: Uuid,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = sqlx::query_as::<_, Appointment>(
            "SELECT * FROM appointments
             WHERE professor_id = $1
             ORDER BY date ASC, time_slot ASC",
        )
        .bind(professor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(appointments)
    }

    async fn mark_cancelled(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        // The status guard makes the transition single-shot under races.
        let appointment = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments
             SET status = 'cancelled', updated_at = NOW()
             WHERE id = $1 AND status = 'booked'
             RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(appointment)
    }
}
