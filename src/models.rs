use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;
use crate::model::user::PublicUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterReq {
    #[schema(example = "jane@acme.test")]
    pub email: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "employee")]
    pub role: Role,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    #[schema(example = "jane@acme.test")]
    pub email: String,
    #[schema(example = "s3cret-pass")]
    pub password: String,
}

/// Issued on both register and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResp {
    pub token: String,
    pub user: PublicUser,
}

/// Bearer token payload: user id subject, role claim, unix-seconds expiry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn register_request_rejects_unknown_role() {
        let body = json!({
            "email": "a@b.test",
            "password": "pw",
            "name": "A",
            "role": "manager"
        });
        assert!(serde_json::from_value::<RegisterReq>(body).is_err());
    }

    #[test]
    fn register_request_accepts_both_roles() {
        for role in ["employee", "employer"] {
            let body = json!({
                "email": "a@b.test",
                "password": "pw",
                "name": "A",
                "role": role
            });
            assert!(serde_json::from_value::<RegisterReq>(body).is_ok());
        }
    }
}
