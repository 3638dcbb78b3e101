//! Doctor registry: reference entries picked from at booking time.
//!
//! Appointments store the doctor's display name as text, so removing or
//! renaming a doctor never touches existing appointments.

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::core_state::{CoreError, CoreState};
use crate::models::{normalize_optional, Doctor, DoctorPatch};
use crate::validation::{parse_id, required};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewDoctor {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

pub fn register(core: &CoreState, request: NewDoctor) -> Result<Doctor, CoreError> {
    let doctor = Doctor {
        id: Uuid::new_v4(),
        name: required("name", request.name)?,
        specialty: normalize_optional(request.specialty),
        location: normalize_optional(request.location),
        email: normalize_optional(request.email),
        phone: normalize_optional(request.phone),
        created_at: Utc::now(),
    };

    core.doctors.insert_doctor(&doctor)?;
    tracing::info!(id = %doctor.id, name = %doctor.name, "Doctor registered");
    Ok(doctor)
}

/// Doctors by name, case-insensitive, exact name breaking ties.
pub fn list(core: &CoreState) -> Result<Vec<Doctor>, CoreError> {
    let mut doctors = core.doctors.list_doctors()?;
    doctors.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    Ok(doctors)
}

pub fn get(core: &CoreState, id: &str) -> Result<Doctor, CoreError> {
    let id = parse_id("doctor", id)?;
    core.doctors.get_doctor(&id)?.ok_or_else(|| CoreError::NotFound {
        entity: "doctor",
        id: id.to_string(),
    })
}

/// Partial update. A provided `name` must not be blank.
pub fn update(core: &CoreState, id: &str, patch: DoctorPatch) -> Result<Doctor, CoreError> {
    if let Some(name) = &patch.name {
        if name.trim().is_empty() {
            return Err(CoreError::InvalidField {
                field: "name",
                reason: "must not be blank".into(),
            });
        }
    }
    let id = parse_id("doctor", id)?;

    let doctor = core.doctors.update_doctor(&id, patch)?;
    tracing::info!(id = %id, "Doctor updated");
    Ok(doctor)
}

pub fn remove(core: &CoreState, id: &str) -> Result<Doctor, CoreError> {
    let id = parse_id("doctor", id)?;
    let removed = core.doctors.remove_doctor(&id)?;
    tracing::info!(id = %id, name = %removed.name, "Doctor removed");
    Ok(removed)
}
