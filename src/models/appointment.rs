use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::AppointmentStatus;

/// A representative's request to meet a doctor.
///
/// `doctor_name` is free text; it is never joined to a `Doctor` record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    pub rep_name: String,
    pub email: String,
    pub phone: String,
    pub doctor_name: String,
    #[serde(with = "super::iso8601")]
    pub datetime: DateTime<Utc>,
    pub status: AppointmentStatus,
    #[serde(with = "super::iso8601")]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Calendar date of the requested slot (UTC).
    pub fn day(&self) -> NaiveDate {
        self.datetime.date_naive()
    }

    /// Listing order: slot first, then submission time.
    pub fn schedule_key(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.datetime, self.created_at)
    }
}

/// Ids of the first `limit` pending appointments on `day`, in slot order.
pub fn earliest_pending_on(appointments: &[Appointment], day: NaiveDate, limit: usize) -> Vec<Uuid> {
    let mut candidates: Vec<&Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Pending && a.day() == day)
        .collect();
    candidates.sort_by_key(|a| a.schedule_key());
    candidates.into_iter().take(limit).map(|a| a.id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            rep_name: "Alice".into(),
            email: "a@x.com".into(),
            phone: "123".into(),
            doctor_name: "Dr. Lee".into(),
            datetime: Utc.with_ymd_and_hms(2024, 5, 1, 23, 30, 0).unwrap(),
            status: AppointmentStatus::Pending,
            created_at: Utc.with_ymd_and_hms(2024, 4, 20, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["repName"], "Alice");
        assert_eq!(json["doctorName"], "Dr. Lee");
        assert_eq!(json["datetime"], "2024-05-01T23:30:00.000Z");
        assert_eq!(json["createdAt"], "2024-04-20T08:00:00.000Z");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn day_is_utc_calendar_date() {
        assert_eq!(sample().day(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }

    #[test]
    fn earliest_pending_skips_other_days_and_statuses() {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let at = |h: u32| Utc.with_ymd_and_hms(2024, 5, 1, h, 0, 0).unwrap();

        let late = Appointment { datetime: at(15), ..sample() };
        let early = Appointment { id: Uuid::new_v4(), datetime: at(9), ..sample() };
        let confirmed = Appointment {
            id: Uuid::new_v4(),
            datetime: at(8),
            status: AppointmentStatus::Confirmed,
            ..sample()
        };
        let next_day = Appointment {
            id: Uuid::new_v4(),
            datetime: Utc.with_ymd_and_hms(2024, 5, 2, 7, 0, 0).unwrap(),
            ..sample()
        };

        let all = vec![late.clone(), confirmed, next_day, early.clone()];
        assert_eq!(earliest_pending_on(&all, day, 10), vec![early.id, late.id]);
        assert_eq!(earliest_pending_on(&all, day, 1), vec![early.id]);
        assert!(earliest_pending_on(&all, day, 0).is_empty());
    }
}
