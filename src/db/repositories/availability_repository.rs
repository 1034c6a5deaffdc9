use async_trait::async_trait;
use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{Availability, NewAvailability};

use super::AvailabilityStore;

/// Postgres-backed availability store. The unique index on
/// (professor_id, date) backs the one-record-per-day invariant.
#[derive(Debug, Clone)]
pub struct AvailabilityRepository {
    pool: PgPool,
}

impl AvailabilityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AvailabilityStore for AvailabilityRepository {
    async fn find(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Option<Availability>, DatabaseError> {
        let record = sqlx::query_as::<_, Availability>(
            "SELECT * FROM availability WHERE professor_id = $1 AND date = $2",
        )
        .bind(professor_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(
        &self,
        professor_id: Uuid,
        date: Option<Date>,
    ) -> Result<Vec<Availability>, DatabaseError> {
        let records = match date {
            Some(date) => {
                sqlx::query_as::<_, Availability>(
                    "SELECT * FROM availability
                     WHERE professor_id = $1 AND date = $2
                     ORDER BY date ASC",
                )
                .bind(professor_id)
                .bind(date)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Availability>(
                    "SELECT * FROM availability WHERE professor_id = $1 ORDER BY date ASC",
                )
                .bind(professor_id)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(records)
    }

    async fn insert(&self, new: &NewAvailability) -> Result<Availability, DatabaseError> {
        let record = sqlx::query_as::<_, Availability>(
            "INSERT INTO availability (professor_id, date, slots)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(new.professor_id)
        .bind(new.date)
        .bind(&new.slots)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn replace_slots(
        &self,
        id: Uuid,
        slots: &[String],
    ) -> Result<Availability, DatabaseError> {
        let record = sqlx::query_as::<_, Availability>(
            "UPDATE availability
             SET slots = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(slots.to_vec())
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn remove_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE availability
             SET slots = array_remove(slots, $3), updated_at = NOW()
             WHERE professor_id = $1 AND date = $2",
        )
        .bind(professor_id)
        .bind(date)
        .bind(slot)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn add_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError> {
        // Guarded append: never inserts a duplicate label.
        sqlx::query(
            "UPDATE availability
             SET slots = array_append(slots, $3), updated_at = NOW()
             WHERE professor_id = $1 AND date = $2 AND NOT ($3 = ANY(slots))",
        )
        .bind(professor_id)
        .bind(date)
        .bind(slot)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
