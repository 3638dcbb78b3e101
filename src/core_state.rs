//! Shared application state and the domain error type.
//!
//! `CoreState` is built once at startup, wrapped in `Arc`, and handed to
//! the axum router. Stores and the mailer are trait objects so the backend
//! is picked from configuration without touching handlers.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::{AppConfig, BookingPolicy, MailConfig, StorageConfig};
use crate::db::{AppointmentStore, DoctorStore, MemoryStore, SqliteStore, StoreError};
use crate::models::AppointmentStatus;
use crate::notify::{LogMailer, MailError, Mailer, Notifier, ResendMailer};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Cannot move appointment from {from} to {to}")]
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },

    #[error("No capacity left on {day} (limit {capacity})")]
    DayFull { day: NaiveDate, capacity: usize },

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Mail setup failed: {0}")]
    Mail(#[from] MailError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity_type, id } => CoreError::NotFound {
                entity: entity_type,
                id,
            },
            StoreError::DayFull { day, capacity } => CoreError::DayFull { day, capacity },
            StoreError::InvalidTransition { from, to } => CoreError::InvalidTransition { from, to },
            other => CoreError::Store(other),
        }
    }
}

pub struct CoreState {
    pub appointments: Arc<dyn AppointmentStore>,
    pub doctors: Arc<dyn DoctorStore>,
    pub notifier: Notifier,
    pub policy: BookingPolicy,
    /// Contact-form messages are forwarded here when set.
    pub contact_inbox: Option<String>,
}

impl CoreState {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        doctors: Arc<dyn DoctorStore>,
        notifier: Notifier,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            appointments,
            doctors,
            notifier,
            policy,
            contact_inbox: None,
        }
    }

    /// Memory-backed state with default policy.
    pub fn in_memory(mailer: Arc<dyn Mailer>) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(
            store.clone(),
            store,
            Notifier::new(mailer),
            BookingPolicy::default(),
        )
    }

    pub fn with_contact_inbox(mut self, inbox: Option<String>) -> Self {
        self.contact_inbox = inbox;
        self
    }

    /// Build the store and mailer described by `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        let (appointments, doctors): (Arc<dyn AppointmentStore>, Arc<dyn DoctorStore>) =
            match &config.storage {
                StorageConfig::Memory => {
                    let store = Arc::new(MemoryStore::new());
                    (store.clone(), store)
                }
                StorageConfig::SqliteInMemory => {
                    let store = Arc::new(SqliteStore::open_in_memory()?);
                    (store.clone(), store)
                }
                StorageConfig::SqliteFile(path) => {
                    let store = Arc::new(SqliteStore::open(path)?);
                    (store.clone(), store)
                }
            };

        let mailer: Arc<dyn Mailer> = match &config.mail {
            MailConfig::Log => Arc::new(LogMailer),
            MailConfig::Resend {
                api_url,
                api_key,
                from,
            } => Arc::new(ResendMailer::new(api_url, api_key, from)?),
        };

        tracing::info!(
            store = appointments.backend_tag(),
            mailer = mailer.transport(),
            daily_capacity = ?config.policy.daily_capacity,
            confirm_batch = config.policy.confirm_batch,
            "Core state initialized"
        );

        Ok(Self::new(
            appointments,
            doctors,
            Notifier::new(mailer),
            config.policy.clone(),
        )
        .with_contact_inbox(config.contact_inbox.clone()))
    }
}
