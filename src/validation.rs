//! Request field checks shared by the domain modules.

use uuid::Uuid;

use crate::core_state::CoreError;

/// Trimmed value of a required text field.
pub fn required(field: &'static str, value: Option<String>) -> Result<String, CoreError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(CoreError::MissingField(field))
}

/// Path ids that are not UUIDs cannot name a record.
pub fn parse_id(entity: &'static str, raw: &str) -> Result<Uuid, CoreError> {
    Uuid::parse_str(raw).map_err(|_| CoreError::NotFound {
        entity,
        id: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required("name", Some("  Bob ".into())).unwrap(), "Bob");
        assert!(matches!(
            required("name", Some("   ".into())),
            Err(CoreError::MissingField("name"))
        ));
        assert!(matches!(
            required("email", None),
            Err(CoreError::MissingField("email"))
        ));
    }

    #[test]
    fn non_uuid_ids_are_not_found() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("doctor", &id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("doctor", "42"),
            Err(CoreError::NotFound { entity: "doctor", .. })
        ));
    }
}
