use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(AppointmentStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Completed => "completed",
});

impl AppointmentStatus {
    /// The only status an appointment may move to from `self`.
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Confirmed),
            Self::Confirmed => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// Forward-only, one step at a time. Re-applying the current status is allowed.
    pub fn can_transition_to(&self, target: Self) -> bool {
        *self == target || self.next() == Some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn appointment_status_round_trip() {
        for (variant, s) in [
            (AppointmentStatus::Pending, "pending"),
            (AppointmentStatus::Confirmed, "confirmed"),
            (AppointmentStatus::Completed, "completed"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(AppointmentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&AppointmentStatus::Confirmed).unwrap();
        assert_eq!(json, "\"confirmed\"");
        let parsed: AppointmentStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(parsed, AppointmentStatus::Completed);
    }

    #[test]
    fn cancelled_is_not_a_status() {
        assert!(AppointmentStatus::from_str("cancelled").is_err());
        assert!(AppointmentStatus::from_str("").is_err());
        assert!(AppointmentStatus::from_str("Pending").is_err());
    }

    #[test]
    fn transitions_move_forward_one_step() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Completed));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn reapplying_same_status_is_allowed() {
        use AppointmentStatus::*;
        for status in [Pending, Confirmed, Completed] {
            assert!(status.can_transition_to(status));
        }
    }
}
