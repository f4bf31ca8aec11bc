pub mod attendance;
pub mod users;

/// MySQL reports unique-key violations as SQLSTATE 23000. Both tables
/// lean on this for their uniqueness rules (email, one record per
/// user per day).
pub fn is_duplicate_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some("23000"),
        _ => false,
    }
}
