use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use crate::model::role::Role;
use crate::models::Claims;

const SECONDS_PER_DAY: usize = 24 * 60 * 60;

fn now() -> usize {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize
}

/// HS256 bearer token carrying the user id and role, valid for
/// `ttl_days` from now.
pub fn generate_access_token(user_id: &str, role: Role, secret: &str, ttl_days: usize) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        role,
        exp: now() + ttl_days * SECONDS_PER_DAY,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

pub fn verify_token(token: &str, secret: &str) -> Result<Claims, String> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn issue_then_verify_round_trip() {
        let token = generate_access_token("user-1", Role::Employee, SECRET, 30);
        let claims = verify_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Employee);
        assert!(claims.exp > now());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = generate_access_token("user-1", Role::Employer, SECRET, 30);
        assert!(verify_token(&token, "another-secret").is_err());
    }

    #[test]
    fn tampered_token_is_rejected() {
        let token = generate_access_token("user-1", Role::Employee, SECRET, 30);
        let mut tampered = token.into_bytes();
        let last = tampered.len() - 1;
        tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).unwrap();
        assert!(verify_token(&tampered, SECRET).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token("not.a.jwt", SECRET).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // past the 60s leeway jsonwebtoken's default validation allows
        let claims = Claims {
            sub: "user-1".to_string(),
            role: Role::Employee,
            exp: now() - 120,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verify_token(&token, SECRET).is_err());
    }
}
