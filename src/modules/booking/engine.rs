use std::sync::Arc;

use time::Date;
use tracing::info;
use uuid::Uuid;

use crate::db::repositories::{AppointmentStore, AvailabilityStore};
use crate::db::{
    open_slots, parse_date, slot_is_valid, Appointment, AppointmentStatus, Availability,
    DatabaseError, NewAppointment, NewAvailability, Role,
};
use crate::error::{AppError, AppResult};

/// Coordinates the availability calendar and the appointment ledger so that
/// every slot label is either open or backing exactly one booked appointment.
///
/// There is no in-process locking: requests race freely and the stores'
/// uniqueness constraints decide the winners. The pre-checks below exist to
/// fail fast with a friendly error, nothing more.
#[derive(Clone)]
pub struct BookingEngine {
    availability: Arc<dyn AvailabilityStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl BookingEngine {
    pub fn new(
        availability: Arc<dyn AvailabilityStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self {
            availability,
            appointments,
        }
    }

    /// Publish the open-slot set for one day. Replaces any existing set
    /// wholesale; booked slots are NOT merged back in, so a caller doing a
    /// partial update must fetch current state first.
    pub async fn set_availability(
        &self,
        professor_id: Uuid,
        date: &str,
        slots: Vec<String>,
    ) -> AppResult<Availability> {
        let date = parse_day(date)?;
        for slot in &slots {
            if !slot_is_valid(slot) {
                return Err(AppError::InvalidInput(format!(
                    "{slot} is not a valid time format"
                )));
            }
        }

        match self.availability.find(professor_id, date).await? {
            Some(existing) => Ok(self.availability.replace_slots(existing.id, &slots).await?),
            None => {
                let new = NewAvailability {
                    professor_id,
                    date,
                    slots,
                };
                match self.availability.insert(&new).await {
                    Ok(record) => Ok(record),
                    // Concurrent first write for the same day; the caller
                    // should re-fetch and decide.
                    Err(DatabaseError::Duplicate) => Err(AppError::DuplicateAvailability),
                    Err(err) => Err(err.into()),
                }
            }
        }
    }

    /// All availability records for a professor, slots projected down to the
    /// truly open set (stored slots minus currently booked ones).
    pub async fn get_availability(
        &self,
        professor_id: Uuid,
        date: Option<&str>,
    ) -> AppResult<Vec<Availability>> {
        let date = match date {
            Some(value) => Some(parse_day(value)?),
            None => None,
        };

        let mut records = self.availability.list(professor_id, date).await?;
        for record in &mut records {
            let booked = self
                .appointments
                .booked_slots(record.professor_id, record.date)
                .await?;
            record.slots = open_slots(&record.slots, &booked);
        }

        Ok(records)
    }

    /// Reserve a slot for a student. The store's active-booking uniqueness
    /// constraint is the real race guard; losing the insert race reports
    /// `SlotAlreadyBooked` exactly like failing the pre-check.
    pub async fn book(
        &self,
        student_id: Uuid,
        professor_id: Uuid,
        date: &str,
        time_slot: &str,
    ) -> AppResult<Appointment> {
        let date = parse_day(date)?;
        if time_slot.is_empty() {
            return Err(AppError::InvalidInput("timeSlot is required".to_string()));
        }

        let available = self
            .availability
            .find(professor_id, date)
            .await?
            .map(|record| record.slots.iter().any(|s| s == time_slot))
            .unwrap_or(false);
        if !available {
            return Err(AppError::SlotUnavailable);
        }

        if self
            .appointments
            .find_booked(professor_id, date, time_slot)
            .await?
            .is_some()
        {
            return Err(AppError::SlotAlreadyBooked);
        }

        let new = NewAppointment {
            student_id,
            professor_id,
            date,
            time_slot: time_slot.to_string(),
        };
        let appointment = match self.appointments.insert(&new).await {
            Ok(appointment) => appointment,
            Err(DatabaseError::Duplicate) => return Err(AppError::SlotAlreadyBooked),
            Err(err) => return Err(err.into()),
        };

        self.availability
            .remove_slot(professor_id, date, time_slot)
            .await?;

        info!(
            appointment_id = %appointment.id,
            %professor_id,
            %date,
            time_slot,
            "Appointment booked"
        );

        Ok(appointment)
    }

    /// Cancel a booked appointment and return its slot to the open set.
    /// Only the owning professor may cancel, and only once.
    pub async fn cancel(
        &self,
        appointment_id: Uuid,
        acting_professor_id: Uuid,
    ) -> AppResult<Appointment> {
        let appointment = self
            .appointments
            .find_by_id(appointment_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        if appointment.professor_id != acting_professor_id {
            return Err(AppError::Forbidden(
                "Not authorized to cancel this appointment".to_string(),
            ));
        }

        if appointment.status == AppointmentStatus::Cancelled {
            return Err(AppError::AlreadyCancelled);
        }

        // Guarded update: a concurrent cancel that got there first also
        // surfaces as AlreadyCancelled.
        let cancelled = self
            .appointments
            .mark_cancelled(appointment_id)
            .await?
            .ok_or(AppError::AlreadyCancelled)?;

        self.availability
            .add_slot(cancelled.professor_id, cancelled.date, &cancelled.time_slot)
            .await?;

        info!(
            appointment_id = %cancelled.id,
            professor_id = %cancelled.professor_id,
            "Appointment cancelled"
        );

        Ok(cancelled)
    }

    /// Appointments visible to the caller: their own bookings for students,
    /// their own calendar for professors.
    pub async fn list_mine(&self, caller_id: Uuid, role: Role) -> AppResult<Vec<Appointment>> {
        let appointments = match role {
            Role::Student => self.appointments.list_for_student(caller_id).await?,
            Role::Professor => self.appointments.list_for_professor(caller_id).await?,
        };
        Ok(appointments)
    }

    pub async fn list_for_professor(&self, professor_id: Uuid) -> AppResult<Vec<Appointment>> {
        Ok(self.appointments.list_for_professor(professor_id).await?)
    }

    /// Fetch one appointment; only the student or professor on the record
    /// may see it.
    pub async fn get_by_id(
        &self,
        id: Uuid,
        caller_id: Uuid,
        role: Role,
    ) -> AppResult<Appointment> {
        let appointment = self
            .appointments
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Appointment not found".to_string()))?;

        let is_owner = match role {
            Role::Student => appointment.student_id == caller_id,
            Role::Professor => appointment.professor_id == caller_id,
        };
        if !is_owner {
            return Err(AppError::Forbidden(
                "Not authorized to view this appointment".to_string(),
            ));
        }

        Ok(appointment)
    }
}

fn parse_day(value: &str) -> AppResult<Date> {
    parse_date(value).map_err(|_| AppError::InvalidInput("Invalid date format".to_string()))
}
