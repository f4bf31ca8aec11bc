use sqlx::MySqlPool;

use crate::model::role::Role;
use crate::model::user::User;

pub struct UserStore;

impl UserStore {
    /// Fails with a duplicate-key error when the email is already taken.
    pub async fn insert(pool: &MySqlPool, user: &User) -> sqlx::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, name, role, password, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(user.role)
        .bind(&user.password)
        .bind(user.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn find_by_email(pool: &MySqlPool, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, password, created_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &MySqlPool, user_id: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, password, created_at
            FROM users
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    pub async fn email_exists(pool: &MySqlPool, email: &str) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)")
            .bind(email)
            .fetch_one(pool)
            .await
    }

    /// Every account holding the given role. Used by the notifier to
    /// fan the daily alert out to employers.
    pub async fn list_by_role(pool: &MySqlPool, role: Role) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, role, password, created_at
            FROM users
            WHERE role = ?
            ORDER BY created_at
            "#,
        )
        .bind(role)
        .fetch_all(pool)
        .await
    }
}
