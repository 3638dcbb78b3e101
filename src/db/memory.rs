//! Process-lifetime store. Nothing survives a restart.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::NaiveDate;
use uuid::Uuid;

use super::repository::{AppointmentStore, DoctorStore, StatusChange};
use super::StoreError;
use crate::models::{earliest_pending_on, Appointment, AppointmentStatus, Doctor, DoctorPatch};

#[derive(Default)]
pub struct MemoryStore {
    appointments: RwLock<Vec<Appointment>>,
    doctors: RwLock<Vec<Doctor>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_appointments(&self) -> Result<RwLockReadGuard<'_, Vec<Appointment>>, StoreError> {
        self.appointments.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_appointments(&self) -> Result<RwLockWriteGuard<'_, Vec<Appointment>>, StoreError> {
        self.appointments.write().map_err(|_| StoreError::LockPoisoned)
    }

    fn read_doctors(&self) -> Result<RwLockReadGuard<'_, Vec<Doctor>>, StoreError> {
        self.doctors.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_doctors(&self) -> Result<RwLockWriteGuard<'_, Vec<Doctor>>, StoreError> {
        self.doctors.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl AppointmentStore for MemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    fn insert_appointment(
        &self,
        appointment: &Appointment,
        daily_capacity: Option<usize>,
    ) -> Result<(), StoreError> {
        let mut items = self.write_appointments()?;
        if let Some(capacity) = daily_capacity {
            let day = appointment.day();
            let booked = items.iter().filter(|a| a.day() == day).count();
            if booked >= capacity {
                return Err(StoreError::DayFull { day, capacity });
            }
        }
        items.push(appointment.clone());
        Ok(())
    }

    fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        Ok(self.read_appointments()?.clone())
    }

    fn get_appointment(&self, id: &Uuid) -> Result<Option<Appointment>, StoreError> {
        Ok(self.read_appointments()?.iter().find(|a| a.id == *id).cloned())
    }

    fn transition_appointment(
        &self,
        id: &Uuid,
        target: AppointmentStatus,
    ) -> Result<StatusChange, StoreError> {
        let mut items = self.write_appointments()?;
        let appointment = items
            .iter_mut()
            .find(|a| a.id == *id)
            .ok_or_else(|| StoreError::not_found("appointment", id))?;

        let previous = appointment.status;
        if !previous.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                from: previous,
                to: target,
            });
        }
        appointment.status = target;

        Ok(StatusChange {
            previous,
            appointment: appointment.clone(),
        })
    }

    fn remove_appointment(&self, id: &Uuid) -> Result<Appointment, StoreError> {
        let mut items = self.write_appointments()?;
        let idx = items
            .iter()
            .position(|a| a.id == *id)
            .ok_or_else(|| StoreError::not_found("appointment", id))?;
        Ok(items.remove(idx))
    }

    fn confirm_earliest_pending(
        &self,
        day: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut items = self.write_appointments()?;
        let ids = earliest_pending_on(&items, day, limit);

        let mut confirmed = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(appointment) = items.iter_mut().find(|a| a.id == id) {
                appointment.status = AppointmentStatus::Confirmed;
                confirmed.push(appointment.clone());
            }
        }
        Ok(confirmed)
    }
}

impl DoctorStore for MemoryStore {
    fn insert_doctor(&self, doctor: &Doctor) -> Result<(), StoreError> {
        self.write_doctors()?.push(doctor.clone());
        Ok(())
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        Ok(self.read_doctors()?.clone())
    }

    fn get_doctor(&self, id: &Uuid) -> Result<Option<Doctor>, StoreError> {
        Ok(self.read_doctors()?.iter().find(|d| d.id == *id).cloned())
    }

    fn update_doctor(&self, id: &Uuid, patch: DoctorPatch) -> Result<Doctor, StoreError> {
        let mut items = self.write_doctors()?;
        let doctor = items
            .iter_mut()
            .find(|d| d.id == *id)
            .ok_or_else(|| StoreError::not_found("doctor", id))?;
        doctor.apply(patch);
        Ok(doctor.clone())
    }

    fn remove_doctor(&self, id: &Uuid) -> Result<Doctor, StoreError> {
        let mut items = self.write_doctors()?;
        let idx = items
            .iter()
            .position(|d| d.id == *id)
            .ok_or_else(|| StoreError::not_found("doctor", id))?;
        Ok(items.remove(idx))
    }
}
