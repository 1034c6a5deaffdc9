//! In-memory store double for engine tests. Enforces the same uniqueness
//! constraints as the Postgres schema, atomically under a mutex, so the
//! concurrency properties can be exercised without a database.

use std::sync::Mutex;

use async_trait::async_trait;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::db::error::DatabaseError;
use crate::db::models::{
    Appointment, AppointmentStatus, Availability, NewAppointment, NewAvailability,
};

use super::{AppointmentStore, AvailabilityStore};

#[derive(Default)]
pub struct MemoryStore {
    availability: Mutex<Vec<Availability>>,
    appointments: Mutex<Vec<Appointment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityStore for MemoryStore {
    async fn find(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Option<Availability>, DatabaseError> {
        let records = self.availability.lock().unwrap();
        Ok(records
            .iter()
            .find(|r| r.professor_id == professor_id && r.date == date)
            .cloned())
    }

    async fn list(
        &self,
        professor_id: Uuid,
        date: Option<Date>,
    ) -> Result<Vec<Availability>, DatabaseError> {
        let records = self.availability.lock().unwrap();
        let mut matching: Vec<Availability> = records
            .iter()
            .filter(|r| r.professor_id == professor_id && date.map_or(true, |d| r.date == d))
            .cloned()
            .collect();
        matching.sort_by_key(|r| r.date);
        Ok(matching)
    }

    async fn insert(&self, new: &NewAvailability) -> Result<Availability, DatabaseError> {
        let mut records = self.availability.lock().unwrap();
        if records
            .iter()
            .any(|r| r.professor_id == new.professor_id && r.date == new.date)
        {
            return Err(DatabaseError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let record = Availability {
            id: Uuid::new_v4(),
            professor_id: new.professor_id,
            date: new.date,
            slots: new.slots.clone(),
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn replace_slots(
        &self,
        id: Uuid,
        slots: &[String],
    ) -> Result<Availability, DatabaseError> {
        let mut records = self.availability.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(DatabaseError::NotFound)?;
        record.slots = slots.to_vec();
        record.updated_at = OffsetDateTime::now_utc();
        Ok(record.clone())
    }

    async fn remove_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError> {
        let mut records = self.availability.lock().unwrap();
        if let Some(record) = records
            .iter_mut()
            .find(|r| r.professor_id == professor_id && r.date == date)
        {
            record.slots.retain(|s| s != slot);
            record.updated_at = OffsetDateTime::now_utc();
        }
        Ok(())
    }

    async fn add_slot(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<(), DatabaseError> {
        let mut records = self.availability.lock().unwrap();
        if let Some(record) = records
            .iter_mut()
            .find(|r| r.professor_id == professor_id && r.date == date)
        {
            if !record.slots.iter().any(|s| s == slot) {
                record.slots.push(slot.to_string());
                record.updated_at = OffsetDateTime::now_utc();
            }
        }
        Ok(())
    }
}

#[async_trait]
impl AppointmentStore for MemoryStore {
    async fn insert(&self, new: &NewAppointment) -> Result<Appointment, DatabaseError> {
        // Check-and-insert under one lock: the active-booking uniqueness
        // constraint, same as the partial unique index.
        let mut appointments = self.appointments.lock().unwrap();
        let conflict = appointments.iter().any(|a| {
            a.professor_id == new.professor_id
                && a.date == new.date
                && a.time_slot == new.time_slot
                && a.status == AppointmentStatus::Booked
        });
        if conflict {
            return Err(DatabaseError::Duplicate);
        }
        let now = OffsetDateTime::now_utc();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            student_id: new.student_id,
            professor_id: new.professor_id,
            date: new.date,
            time_slot: new.time_slot.clone(),
            status: AppointmentStatus::Booked,
            created_at: now,
            updated_at: now,
        };
        appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_booked(
        &self,
        professor_id: Uuid,
        date: Date,
        slot: &str,
    ) -> Result<Option<Appointment>, DatabaseError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments
            .iter()
            .find(|a| {
                a.professor_id == professor_id
                    && a.date == date
                    && a.time_slot == slot
                    && a.status == AppointmentStatus::Booked
            })
            .cloned())
    }

    async fn booked_slots(
        &self,
        professor_id: Uuid,
        date: Date,
    ) -> Result<Vec<String>, DatabaseError> {
        let appointments = self.appointments.lock().unwrap();
        Ok(appointments
            .iter()
            .filter(|a| {
                a.professor_id == professor_id
                    && a.date == date
                    && a.status == AppointmentStatus::Booked
            })
            .map(|a| a.time_slot.clone())
            .collect())
    }

    async fn list_for_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = self.appointments.lock().unwrap();
        let mut matching: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.student_id == student_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.date, &a.time_slot).cmp(&(b.date, &b.time_slot)));
        Ok(matching)
    }

    async fn list_for_professor(
        &self,
        professor_id: Uuid,
    ) -> Result<Vec<Appointment>, DatabaseError> {
        let appointments = self.appointments.lock().unwrap();
        let mut matching: Vec<Appointment> = appointments
            .iter()
            .filter(|a| a.professor_id == professor_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| (a.date, &a.time_slot).cmp(&(b.date, &b.time_slot)));
        Ok(matching)
    }

    async fn mark_cancelled(&self, id: Uuid) -> Result<Option<Appointment>, DatabaseError> {
        let mut appointments = self.appointments.lock().unwrap();
        match appointments
            .iter_mut()
            .find(|a| a.id == id && a.status == AppointmentStatus::Booked)
        {
            Some(appointment) => {
                appointment.status = AppointmentStatus::Cancelled;
                appointment.updated_at = OffsetDateTime::now_utc();
                Ok(Some(appointment.clone()))
            }
            None => Ok(None),
        }
    }
}
