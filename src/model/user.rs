use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Stored account row. Rows are immutable after registration; the
/// password field holds an argon2 PHC hash, never plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Caller-facing view of a user, without the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PublicUser {
    #[schema(example = "9a1f53e2-7c1b-4b84-9c8e-2f6a06b1d9e4")]
    pub user_id: String,
    #[schema(example = "jane@acme.test")]
    pub email: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    pub role: Role,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }
}
