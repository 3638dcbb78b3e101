//! Store traits. Handlers and domain functions only see these; the backend
//! (memory or SQLite) is chosen once at startup.
//!
//! Compound operations (capacity-checked insert, status transition, bulk
//! confirmation, doctor patch) are single trait calls so each backend can
//! run them under one lock or transaction.

use chrono::NaiveDate;
use uuid::Uuid;

use super::StoreError;
use crate::models::{Appointment, AppointmentStatus, Doctor, DoctorPatch};

/// Result of a status transition.
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub previous: AppointmentStatus,
    pub appointment: Appointment,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.appointment.status
    }
}

pub trait AppointmentStore: Send + Sync {
    /// Short backend name for health output and logs.
    fn backend_tag(&self) -> &'static str;

    /// Insert a new appointment. With `daily_capacity` set, fails with
    /// `DayFull` when the appointment's day already holds that many records.
    fn insert_appointment(
        &self,
        appointment: &Appointment,
        daily_capacity: Option<usize>,
    ) -> Result<(), StoreError>;

    /// All appointments, in no particular order.
    fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError>;

    fn get_appointment(&self, id: &Uuid) -> Result<Option<Appointment>, StoreError>;

    /// Move an appointment to `target` if the lifecycle allows it.
    /// Fails with `InvalidTransition` otherwise.
    fn transition_appointment(
        &self,
        id: &Uuid,
        target: AppointmentStatus,
    ) -> Result<StatusChange, StoreError>;

    fn remove_appointment(&self, id: &Uuid) -> Result<Appointment, StoreError>;

    /// Confirm up to `limit` pending appointments on `day`, earliest first.
    /// Returns the confirmed records in slot order.
    fn confirm_earliest_pending(
        &self,
        day: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Appointment>, StoreError>;
}

pub trait DoctorStore: Send + Sync {
    fn insert_doctor(&self, doctor: &Doctor) -> Result<(), StoreError>;

    /// All doctors, in no particular order.
    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError>;

    fn get_doctor(&self, id: &Uuid) -> Result<Option<Doctor>, StoreError>;

    fn update_doctor(&self, id: &Uuid, patch: DoctorPatch) -> Result<Doctor, StoreError>;

    fn remove_doctor(&self, id: &Uuid) -> Result<Doctor, StoreError>;
}
