use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Account role. Registration accepts exactly these two values; anything
/// else is rejected at the deserialization boundary.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Employer,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Employee).unwrap(), "\"employee\"");
        assert_eq!(serde_json::to_string(&Role::Employer).unwrap(), "\"employer\"");
    }

    #[test]
    fn rejects_unknown_role() {
        assert!(serde_json::from_str::<Role>("\"admin\"").is_err());
        assert!(serde_json::from_str::<Role>("\"Employee\"").is_err());
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Role::Employer.to_string(), "employer");
        assert_eq!(Role::from_str("employee").unwrap(), Role::Employee);
    }
}
