//! Email bodies. User-supplied text is HTML-escaped; the slot is shown as a
//! UTC date and `HH:MM` time.

use super::Email;
use crate::models::Appointment;

const SIGNATURE: &str = "GKF Medical Team";

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

fn slot(appointment: &Appointment) -> (String, String) {
    (
        appointment.datetime.format("%Y-%m-%d").to_string(),
        appointment.datetime.format("%H:%M").to_string(),
    )
}

fn wrap(body: &str) -> String {
    format!(
        "<div style=\"font-family:system-ui,-apple-system,Segoe UI,Roboto,Helvetica,Arial,sans-serif;line-height:1.6;color:#111827;\">{body}</div>"
    )
}

/// Sent right after a booking is stored.
pub fn booking_received(appointment: &Appointment) -> Email {
    let (date, time) = slot(appointment);
    let rep = escape_html(&appointment.rep_name);
    let doctor = escape_html(&appointment.doctor_name);

    let html = wrap(&format!(
        "<p>Hi {rep},</p>\
         <p>Your appointment request with {doctor} on <strong>{date}</strong> at <strong>{time}</strong> (UTC) has been received. \
         We will confirm shortly.</p>\
         <p>Contact phone on file: {phone}</p>\
         <p>Thank you,<br/>{SIGNATURE}</p>",
        phone = escape_html(&appointment.phone),
    ));
    let text = format!(
        "Hi {},\n\nYour appointment request with {} on {date} at {time} (UTC) has been received. \
         We will confirm shortly.\n\nThank you,\n{SIGNATURE}",
        appointment.rep_name, appointment.doctor_name,
    );

    Email {
        to: appointment.email.clone(),
        subject: "Your Appointment has been Booked Successfully".into(),
        html,
        text,
        reply_to: None,
    }
}

/// Sent when an appointment moves to `confirmed`.
pub fn appointment_confirmed(appointment: &Appointment) -> Email {
    let (date, time) = slot(appointment);
    let rep = escape_html(&appointment.rep_name);
    let doctor = escape_html(&appointment.doctor_name);

    let html = wrap(&format!(
        "<p>Hi {rep},</p>\
         <p>Your appointment with {doctor} is confirmed for <strong>{date}</strong> at <strong>{time}</strong> (UTC).</p>\
         <p>Thank you,<br/>{SIGNATURE}</p>"
    ));
    let text = format!(
        "Hi {},\n\nYour appointment with {} is confirmed for {date} at {time} (UTC).\n\nThank you,\n{SIGNATURE}",
        appointment.rep_name, appointment.doctor_name,
    );

    Email {
        to: appointment.email.clone(),
        subject: "Your Appointment has been Confirmed".into(),
        html,
        text,
        reply_to: None,
    }
}

/// Contact-form message forwarded to the site inbox.
pub fn contact_forward(inbox: &str, name: &str, email: &str, message: &str) -> Email {
    let html = wrap(&format!(
        "<p><strong>From:</strong> {} &lt;{}&gt;</p><p>{}</p>",
        escape_html(name),
        escape_html(email),
        escape_html(message).replace('\n', "<br/>"),
    ));
    let text = format!("From: {name} <{email}>\n\n{message}");

    Email {
        to: inbox.to_string(),
        subject: format!("Contact form: {name}"),
        html,
        text,
        reply_to: Some(email.to_string()),
    }
}
