//! Contact form. Messages are forwarded to the configured inbox, or only
//! logged when none is set.

use serde::{Deserialize, Serialize};

use crate::core_state::{CoreError, CoreState};
use crate::notify::templates;
use crate::validation::required;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactMessage {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactAck {
    pub ok: bool,
}

pub fn submit(core: &CoreState, request: ContactMessage) -> Result<ContactAck, CoreError> {
    let name = required("name", request.name)?;
    let email = required("email", request.email)?;
    let message = required("message", request.message)?;

    match &core.contact_inbox {
        Some(inbox) => {
            tracing::info!(from = %email, %inbox, "Forwarding contact message");
            core.notifier
                .dispatch(templates::contact_forward(inbox, &name, &email, &message));
        }
        None => {
            tracing::info!(from = %email, %name, %message, "Contact message received");
        }
    }

    Ok(ContactAck { ok: true })
}
