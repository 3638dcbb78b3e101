//! Environment-driven configuration, read once at startup.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::notify::resend::DEFAULT_API_URL;

/// Application-level constants
pub const APP_NAME: &str = "rep-booking";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
pub const DEFAULT_CONFIRM_BATCH: usize = 10;
pub const DEFAULT_MAIL_FROM: &str = "Doctor Appointments <onboarding@resend.dev>";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "rep_booking=info,tower_http=warn"
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    Memory,
    SqliteInMemory,
    SqliteFile(PathBuf),
}

#[derive(Clone, PartialEq, Eq)]
pub enum MailConfig {
    /// No provider: emails are written to the log.
    Log,
    Resend {
        api_url: String,
        api_key: String,
        from: String,
    },
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MailConfig::Log => f.write_str("Log"),
            MailConfig::Resend { api_url, from, .. } => f
                .debug_struct("Resend")
                .field("api_url", api_url)
                .field("api_key", &"<redacted>")
                .field("from", from)
                .finish(),
        }
    }
}

/// Booking rules that vary per deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Maximum appointments per calendar day. `None` disables the check.
    pub daily_capacity: Option<usize>,
    /// How many pending appointments one bulk confirmation may confirm.
    pub confirm_batch: usize,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            daily_capacity: None,
            confirm_batch: DEFAULT_CONFIRM_BATCH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: SocketAddr,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub policy: BookingPolicy,
    /// Where contact-form messages are forwarded. `None` only logs them.
    pub contact_inbox: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let bind = parse_or("BOOKING_BIND", var("BOOKING_BIND"), DEFAULT_BIND)?;

        let storage = match var("BOOKING_DATABASE_PATH") {
            None => StorageConfig::Memory,
            Some(path) if path == ":memory:" => StorageConfig::SqliteInMemory,
            Some(path) => StorageConfig::SqliteFile(PathBuf::from(path)),
        };

        let mail = match var("RESEND_API_KEY") {
            None => MailConfig::Log,
            Some(api_key) => MailConfig::Resend {
                api_url: var("RESEND_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
                api_key,
                from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            },
        };

        let daily_capacity = var("BOOKING_DAILY_CAPACITY")
            .map(|raw| parse_value::<usize>("BOOKING_DAILY_CAPACITY", &raw))
            .transpose()?;

        let confirm_batch: usize = parse_or(
            "BOOKING_CONFIRM_BATCH",
            var("BOOKING_CONFIRM_BATCH"),
            &DEFAULT_CONFIRM_BATCH.to_string(),
        )?;
        if confirm_batch == 0 {
            return Err(ConfigError::Invalid {
                key: "BOOKING_CONFIRM_BATCH",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            bind,
            storage,
            mail,
            policy: BookingPolicy {
                daily_capacity,
                confirm_batch,
            },
            contact_inbox: var("BOOKING_CONTACT_INBOX"),
        })
    }
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    raw.parse::<T>().map_err(|e| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}

fn parse_or<T: FromStr>(
    key: &'static str,
    value: Option<String>,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    let raw = value.unwrap_or_else(|| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    parse_value(key, &raw)
}
