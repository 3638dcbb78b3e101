use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: Uuid,
    pub name: String,
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(with = "super::iso8601")]
    pub created_at: DateTime<Utc>,
}

/// Partial update. `None` keeps the current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// Optional text fields are trimmed; blank means absent.
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Doctor {
    /// Apply a patch. The caller has already rejected a blank `name`.
    pub fn apply(&mut self, patch: DoctorPatch) {
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(specialty) = patch.specialty {
            self.specialty = normalize_optional(Some(specialty));
        }
        if let Some(location) = patch.location {
            self.location = normalize_optional(Some(location));
        }
        if let Some(email) = patch.email {
            self.email = normalize_optional(Some(email));
        }
        if let Some(phone) = patch.phone {
            self.phone = normalize_optional(Some(phone));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor() -> Doctor {
        Doctor {
            id: Uuid::new_v4(),
            name: "Dr. Maria Torres".into(),
            specialty: Some("Cardiology".into()),
            location: Some("Room 4".into()),
            email: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn normalize_trims_and_drops_blank() {
        assert_eq!(normalize_optional(Some("  ENT ".into())), Some("ENT".into()));
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let mut doc = doctor();
        doc.apply(DoctorPatch {
            phone: Some("555-0101".into()),
            ..Default::default()
        });
        assert_eq!(doc.name, "Dr. Maria Torres");
        assert_eq!(doc.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(doc.phone.as_deref(), Some("555-0101"));
    }

    #[test]
    fn patch_with_blank_optional_clears_it() {
        let mut doc = doctor();
        doc.apply(DoctorPatch {
            location: Some("".into()),
            ..Default::default()
        });
        assert_eq!(doc.location, None);
    }

    #[test]
    fn null_in_json_patch_keeps_value() {
        let patch: DoctorPatch =
            serde_json::from_str(r#"{"specialty": null, "name": "Dr. M. Torres"}"#).unwrap();
        let mut doc = doctor();
        doc.apply(patch);
        assert_eq!(doc.name, "Dr. M. Torres");
        assert_eq!(doc.specialty.as_deref(), Some("Cardiology"));
    }

    #[test]
    fn absent_optionals_serialize_as_null() {
        let json = serde_json::to_value(doctor()).unwrap();
        assert!(json["email"].is_null());
        assert!(json.get("createdAt").is_some());
    }
}
