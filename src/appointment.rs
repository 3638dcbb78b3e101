//! Appointment intake, listing, status changes and bulk daily confirmation.
//!
//! Handlers pass raw request bodies here; presence and format checks happen
//! before the store is touched. Emails go out through the notifier and are
//! never awaited.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core_state::{CoreError, CoreState};
use crate::models::{parse_datetime, parse_day, Appointment, AppointmentStatus};
use crate::notify::templates;
use crate::validation::{parse_id, required};

// ─── Types ────────────────────────────────────────────────────────────────────

/// Booking request as submitted. Every field is required; they are optional
/// here so a missing one is reported by name instead of as a parse error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub rep_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub doctor_name: Option<String>,
    pub datetime: Option<String>,
}

/// Listing filters from the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentFilter {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Exact doctor display name.
    pub doctor: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusUpdate {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfirmDayRequest {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfirmDayResult {
    pub confirmed: usize,
}

// ─── Operations ───────────────────────────────────────────────────────────────

/// Validate and store a booking, then send the booking-received email.
pub fn book(core: &CoreState, request: NewAppointment) -> Result<Appointment, CoreError> {
    let rep_name = required("repName", request.rep_name)?;
    let email = required("email", request.email)?;
    let phone = required("phone", request.phone)?;
    let doctor_name = required("doctorName", request.doctor_name)?;
    let raw_datetime = required("datetime", request.datetime)?;

    let datetime = parse_datetime(&raw_datetime).ok_or_else(|| CoreError::InvalidField {
        field: "datetime",
        reason: format!("{raw_datetime:?} is not an ISO-8601 date-time"),
    })?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        rep_name,
        email,
        phone,
        doctor_name,
        datetime,
        status: AppointmentStatus::Pending,
        created_at: Utc::now(),
    };

    core.appointments
        .insert_appointment(&appointment, core.policy.daily_capacity)?;

    tracing::info!(
        id = %appointment.id,
        doctor = %appointment.doctor_name,
        slot = %appointment.datetime,
        "Appointment booked"
    );

    core.notifier
        .dispatch(templates::booking_received(&appointment));

    Ok(appointment)
}

/// All appointments matching `filter`, earliest slot first.
pub fn list(core: &CoreState, filter: &AppointmentFilter) -> Result<Vec<Appointment>, CoreError> {
    let day = match filter.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        Some(raw) => Some(parse_day(raw).ok_or_else(|| CoreError::InvalidField {
            field: "date",
            reason: format!("{raw:?} is not a YYYY-MM-DD date"),
        })?),
        None => None,
    };
    let doctor = filter.doctor.as_deref().filter(|d| !d.is_empty());

    let mut appointments: Vec<Appointment> = core
        .appointments
        .list_appointments()?
        .into_iter()
        .filter(|a| day.map_or(true, |d| a.day() == d))
        .filter(|a| doctor.map_or(true, |name| a.doctor_name == name))
        .collect();

    appointments.sort_by_key(|a| a.schedule_key());
    Ok(appointments)
}

/// One appointment by id.
pub fn get(core: &CoreState, id: &str) -> Result<Appointment, CoreError> {
    let id = parse_id("appointment", id)?;
    core.appointments
        .get_appointment(&id)?
        .ok_or_else(|| CoreError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        })
}

/// Move one appointment to the requested status.
///
/// An unknown id is reported before the body is checked. Re-applying the current status succeeds without side effects. The
/// confirmation email is sent only when the record actually became
/// `confirmed`.
pub fn set_status(core: &CoreState, id: &str, update: StatusUpdate) -> Result<Appointment, CoreError> {
    let id = parse_id("appointment", id)?;
    if core.appointments.get_appointment(&id)?.is_none() {
        return Err(CoreError::NotFound {
            entity: "appointment",
            id: id.to_string(),
        });
    }

    let raw = required("status", update.status)?;
    let target: AppointmentStatus = raw.parse().map_err(|_| CoreError::InvalidField {
        field: "status",
        reason: format!("{raw:?} is not one of pending, confirmed, completed"),
    })?;

    let change = core.appointments.transition_appointment(&id, target)?;

    if change.changed() {
        tracing::info!(
            id = %id,
            from = %change.previous,
            to = %change.appointment.status,
            "Appointment status changed"
        );
        if change.appointment.status == AppointmentStatus::Confirmed {
            core.notifier
                .dispatch(templates::appointment_confirmed(&change.appointment));
        }
    }

    Ok(change.appointment)
}

pub fn remove(core: &CoreState, id: &str) -> Result<Appointment, CoreError> {
    let id = parse_id("appointment", id)?;
    let removed = core.appointments.remove_appointment(&id)?;
    tracing::info!(id = %id, "Appointment removed");
    Ok(removed)
}

/// Confirm the earliest pending appointments of one calendar day, up to the
/// configured batch size, and email each confirmed representative.
pub fn confirm_day(core: &CoreState, request: ConfirmDayRequest) -> Result<ConfirmDayResult, CoreError> {
    let raw = required("date", request.date)?;
    let day = parse_day(&raw).ok_or_else(|| CoreError::InvalidField {
        field: "date",
        reason: format!("{raw:?} is not a YYYY-MM-DD date"),
    })?;

    let confirmed = core
        .appointments
        .confirm_earliest_pending(day, core.policy.confirm_batch)?;

    tracing::info!(
        %day,
        confirmed = confirmed.len(),
        batch = core.policy.confirm_batch,
        "Bulk confirmation"
    );

    if !confirmed.is_empty() {
        let emails = confirmed.iter().map(templates::appointment_confirmed).collect();
        core.notifier.dispatch_all(emails);
    }

    Ok(ConfirmDayResult {
        confirmed: confirmed.len(),
    })
}
