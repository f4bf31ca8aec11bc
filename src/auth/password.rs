use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Hash with a fresh random salt; the PHC string is what gets stored.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

/// A stored hash that fails to parse counts as a mismatch.
pub fn verify_password(password: &str, hashed: &str) -> bool {
    let argon2 = Argon2::default();
    let Ok(parsed) = PasswordHash::new(hashed) else {
        return false;
    };

    argon2.verify_password(password.as_bytes(), &parsed).is_ok()
}
