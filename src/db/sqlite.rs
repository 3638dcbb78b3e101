use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::repository::{AppointmentStore, DoctorStore, StatusChange};
use super::StoreError;
use crate::models::{
    format_datetime, parse_datetime, Appointment, AppointmentStatus, Doctor, DoctorPatch,
};

const APPOINTMENT_COLUMNS: &str =
    "id, rep_name, email, phone, doctor_name, datetime, status, created_at";

const DOCTOR_COLUMNS: &str = "id, name, specialty, location, email, phone, created_at";

/// SQLite-backed store. One connection, serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file and run migrations.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory database (tests, throwaway runs).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        configure_pragmas(&conn)?;
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

fn configure_pragmas(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA journal_mode=DELETE;
         PRAGMA foreign_keys=ON;",
    )?;
    Ok(())
}

/// Run all pending migrations
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let current_version = get_current_version(conn);

    let migrations: Vec<(i64, &str)> = vec![(
        1,
        include_str!("../../resources/migrations/001_initial.sql"),
    )];

    for (version, sql) in migrations {
        if version > current_version {
            tracing::info!("Running migration v{version}");
            conn.execute_batch(sql)
                .map_err(|e| StoreError::MigrationFailed {
                    version,
                    reason: e.to_string(),
                })?;
        }
    }

    Ok(())
}

/// Get the current schema version (0 if no schema exists yet)
fn get_current_version(conn: &Connection) -> i64 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, i64>(0)
    })
    .unwrap_or(0)
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

struct AppointmentRow {
    id: String,
    rep_name: String,
    email: String,
    phone: String,
    doctor_name: String,
    datetime: String,
    status: String,
    created_at: String,
}

impl AppointmentRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            rep_name: row.get(1)?,
            email: row.get(2)?,
            phone: row.get(3)?,
            doctor_name: row.get(4)?,
            datetime: row.get(5)?,
            status: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    fn into_appointment(self) -> Result<Appointment, StoreError> {
        Ok(Appointment {
            id: parse_uuid("appointments", &self.id)?,
            rep_name: self.rep_name,
            email: self.email,
            phone: self.phone,
            doctor_name: self.doctor_name,
            datetime: parse_instant("appointments", &self.datetime)?,
            status: AppointmentStatus::from_str(&self.status)?,
            created_at: parse_instant("appointments", &self.created_at)?,
        })
    }
}

struct DoctorRow {
    id: String,
    name: String,
    specialty: Option<String>,
    location: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    created_at: String,
}

impl DoctorRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            specialty: row.get(2)?,
            location: row.get(3)?,
            email: row.get(4)?,
            phone: row.get(5)?,
            created_at: row.get(6)?,
        })
    }

    fn into_doctor(self) -> Result<Doctor, StoreError> {
        Ok(Doctor {
            id: parse_uuid("doctors", &self.id)?,
            name: self.name,
            specialty: self.specialty,
            location: self.location,
            email: self.email,
            phone: self.phone,
            created_at: parse_instant("doctors", &self.created_at)?,
        })
    }
}

fn parse_uuid(table: &'static str, raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| StoreError::Corrupt {
        table,
        reason: format!("bad id {raw}: {e}"),
    })
}

fn parse_instant(table: &'static str, raw: &str) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
    parse_datetime(raw).ok_or_else(|| StoreError::Corrupt {
        table,
        reason: format!("bad timestamp {raw}"),
    })
}

fn fetch_appointment(conn: &Connection, id: &Uuid) -> Result<Option<Appointment>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments WHERE id = ?1"),
            params![id.to_string()],
            AppointmentRow::from_row,
        )
        .optional()?;
    row.map(AppointmentRow::into_appointment).transpose()
}

fn fetch_doctor(conn: &Connection, id: &Uuid) -> Result<Option<Doctor>, StoreError> {
    let row = conn
        .query_row(
            &format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"),
            params![id.to_string()],
            DoctorRow::from_row,
        )
        .optional()?;
    row.map(DoctorRow::into_doctor).transpose()
}

// ═══════════════════════════════════════════
// Appointments
// ═══════════════════════════════════════════

impl AppointmentStore for SqliteStore {
    fn backend_tag(&self) -> &'static str {
        "sqlite"
    }

    fn insert_appointment(
        &self,
        appointment: &Appointment,
        daily_capacity: Option<usize>,
    ) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let day = appointment.day();

        if let Some(capacity) = daily_capacity {
            let booked: i64 = tx.query_row(
                "SELECT COUNT(*) FROM appointments WHERE day = ?1",
                params![day.to_string()],
                |row| row.get(0),
            )?;
            if booked >= i64::try_from(capacity).unwrap_or(i64::MAX) {
                return Err(StoreError::DayFull { day, capacity });
            }
        }

        tx.execute(
            "INSERT INTO appointments (id, rep_name, email, phone, doctor_name, datetime, day, status, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                appointment.id.to_string(),
                appointment.rep_name,
                appointment.email,
                appointment.phone,
                appointment.doctor_name,
                format_datetime(&appointment.datetime),
                day.to_string(),
                appointment.status.as_str(),
                format_datetime(&appointment.created_at),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn list_appointments(&self) -> Result<Vec<Appointment>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {APPOINTMENT_COLUMNS} FROM appointments"))?;
        let rows = stmt
            .query_map([], AppointmentRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(AppointmentRow::into_appointment).collect()
    }

    fn get_appointment(&self, id: &Uuid) -> Result<Option<Appointment>, StoreError> {
        let conn = self.lock()?;
        fetch_appointment(&conn, id)
    }

    fn transition_appointment(
        &self,
        id: &Uuid,
        target: AppointmentStatus,
    ) -> Result<StatusChange, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut appointment =
            fetch_appointment(&tx, id)?.ok_or_else(|| StoreError::not_found("appointment", id))?;
        let previous = appointment.status;
        if !previous.can_transition_to(target) {
            return Err(StoreError::InvalidTransition {
                from: previous,
                to: target,
            });
        }

        if previous != target {
            tx.execute(
                "UPDATE appointments SET status = ?1 WHERE id = ?2",
                params![target.as_str(), id.to_string()],
            )?;
        }
        tx.commit()?;

        appointment.status = target;
        Ok(StatusChange {
            previous,
            appointment,
        })
    }

    fn remove_appointment(&self, id: &Uuid) -> Result<Appointment, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let appointment =
            fetch_appointment(&tx, id)?.ok_or_else(|| StoreError::not_found("appointment", id))?;
        tx.execute(
            "DELETE FROM appointments WHERE id = ?1",
            params![id.to_string()],
        )?;
        tx.commit()?;
        Ok(appointment)
    }

    fn confirm_earliest_pending(
        &self,
        day: NaiveDate,
        limit: usize,
    ) -> Result<Vec<Appointment>, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        // Stored datetimes are fixed-width UTC strings, so text order is slot order.
        let rows = {
            let mut stmt = tx.prepare(&format!(
                "SELECT {APPOINTMENT_COLUMNS} FROM appointments
                 WHERE day = ?1 AND status = 'pending'
                 ORDER BY datetime ASC, created_at ASC
                 LIMIT ?2"
            ))?;
            let rows = stmt
                .query_map(params![day.to_string(), limit as i64], AppointmentRow::from_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut confirmed = Vec::with_capacity(rows.len());
        for row in rows {
            let mut appointment = row.into_appointment()?;
            tx.execute(
                "UPDATE appointments SET status = 'confirmed' WHERE id = ?1",
                params![appointment.id.to_string()],
            )?;
            appointment.status = AppointmentStatus::Confirmed;
            confirmed.push(appointment);
        }
        tx.commit()?;
        Ok(confirmed)
    }
}

// ═══════════════════════════════════════════
// Doctors
// ═══════════════════════════════════════════

impl DoctorStore for SqliteStore {
    fn insert_doctor(&self, doctor: &Doctor) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO doctors (id, name, specialty, location, email, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                doctor.id.to_string(),
                doctor.name,
                doctor.specialty,
                doctor.location,
                doctor.email,
                doctor.phone,
                format_datetime(&doctor.created_at),
            ],
        )?;
        Ok(())
    }

    fn list_doctors(&self) -> Result<Vec<Doctor>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors"))?;
        let rows = stmt
            .query_map([], DoctorRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        rows.into_iter().map(DoctorRow::into_doctor).collect()
    }

    fn get_doctor(&self, id: &Uuid) -> Result<Option<Doctor>, StoreError> {
        let conn = self.lock()?;
        fetch_doctor(&conn, id)
    }

    fn update_doctor(&self, id: &Uuid, patch: DoctorPatch) -> Result<Doctor, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut doctor = fetch_doctor(&tx, id)?.ok_or_else(|| StoreError::not_found("doctor", id))?;
        doctor.apply(patch);
        tx.execute(
            "UPDATE doctors SET name = ?1, specialty = ?2, location = ?3, email = ?4, phone = ?5
             WHERE id = ?6",
            params![
                doctor.name,
                doctor.specialty,
                doctor.location,
                doctor.email,
                doctor.phone,
                id.to_string(),
            ],
        )?;
        tx.commit()?;
        Ok(doctor)
    }

    fn remove_doctor(&self, id: &Uuid) -> Result<Doctor, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let doctor = fetch_doctor(&tx, id)?.ok_or_else(|| StoreError::not_found("doctor", id))?;
        tx.execute("DELETE FROM doctors WHERE id = ?1", params![id.to_string()])?;
        tx.commit()?;
        Ok(doctor)
    }
}
