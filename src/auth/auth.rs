use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::ApiError;
use crate::model::role::Role;

/// The authenticated caller. Resolved by the bearer middleware against
/// the live user row and stashed in request extensions; handlers pull
/// it out with this extractor.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing authentication".to_string())),
        )
    }
}

impl AuthUser {
    pub fn require_employee(&self, action: &str) -> Result<(), ApiError> {
        if self.role == Role::Employee {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("Only employees can {action}")))
        }
    }

    pub fn require_employer(&self, action: &str) -> Result<(), ApiError> {
        if self.role == Role::Employer {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("Only employers can {action}")))
        }
    }
}
