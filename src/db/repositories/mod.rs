mod appointment_repository;
mod availability_repository;
#[cfg(test)]
pub mod memory;

pub use appointment_repository::AppointmentRepository;
pub use availability_repository::AvailabilityRepository;

use async_trait::async_trait;
use time::Date;
use uuid::Uuid;

use super::error::DatabaseError;
use super::models::{Appointment, Availability, NewAppointment, NewAvailability};

/// Per-professor per-day open-slot sets.
///
/// Implementations must enforce a uniqueness constraint on
/// (professor_id, date) so concurrent first writes for the same day cannot
/// both create a record; the engine treats the resulting
/// [`DatabaseError::Duplicate`] as a conflict.
#[async_trait]
pub trait AvailabilityStore: Send + Sync {
    async fn find(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Option<Availability>, DatabaseError>;

    /// All records for a professor, optionally narrowed to one date,
    /// ordered by date ascending.
    async fn list(
        &self,
        professor_id: Uuid,
        date: Option<Date>,
    ) -> Result<Vec<Availability>, DatabaseError>;

    async fn insert(&self, new: &NewAvailability) -> Result<Availability, DatabaseError>;

    /// Full overwrite of the slot set.
    async fn replace_slots(
        &self,
        id: Uuid,
        slots: &[String],
    ) -> Result<Availability, DatabaseError>;

    async fn remove_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError>;

    /// Set-union insertion: a no-op when the slot is already present or the
    /// record does not exist.
    async fn add_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError>;
}

/// Appointment ledger.
///
/// Implementations must enforce a uniqueness constraint on
/// (professor_id, date, time_slot) scoped to `booked` rows. That constraint,
/// not the engine's pre-check, is what keeps two concurrent bookings of the
/// same slot from both succeeding.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// Insert with status `booked`. Returns [`DatabaseError::Duplicate`] when
    /// an active booking already holds the slot.
    async fn insert(&self, new: &NewAppointment) -> Result<Appointment, DatabaseError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError>;

    async fn find_booked(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<Option<Appointment>, DatabaseError>;

    /// Slot labels currently backing booked appointments for one day.
    async fn booked_slots(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Vec<String>, DatabaseError>;

    /// Ordered by (date, time_slot) ascending.
    async fn list_for_student(&self, student_id: Uuid)
        -> Result<Vec<Appointment>, DatabaseError>;

    /// Ordered by (date, time_slot) ascending.
    async fn list_for_professor(
        &self,
        professor_id: Uuid,
    ) -> Result<Vec<Appointment>, DatabaseError>;

    /// Guarded transition to `cancelled`. Returns `None` when the row is not
    /// in `booked` state anymore (lost cancel race or already cancelled).
    async fn mark_cancelled(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError>;
}
