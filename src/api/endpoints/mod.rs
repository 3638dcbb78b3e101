//! API endpoint handlers.
//!
//! Handlers unwrap the request, call the matching domain module, and map
//! `CoreError` to `ApiError`. No business rules live here.

pub mod appointments;
pub mod contact;
pub mod doctors;
pub mod health;
