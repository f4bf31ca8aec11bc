use actix_web::{HttpResponse, web};
use chrono::Utc;
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::config::Config;
use crate::error::ApiError;
use crate::model::user::{PublicUser, User};
use crate::models::{AuthResp, LoginReq, RegisterReq};
use crate::store::{is_duplicate_key, users::UserStore};
use crate::utils::email_cache;
use crate::utils::email_filter;

// auth end points

/// true  => email AVAILABLE
/// false => email TAKEN
pub async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1️⃣ Cuckoo filter — fast negative
    // if filter says not exist then it is definitely available.
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2️⃣ Moka cache — fast positive
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3️⃣ Database fallback
    let exists = UserStore::email_exists(pool, &email).await.unwrap_or(true); // fail-safe

    !exists
}

/// Registration handler; issues a token right away so the client can
/// skip a follow-up login.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterReq,
    responses(
        (status = 200, description = "Registered successfully", body = AuthResp),
        (status = 400, description = "Email already registered", body = Object, example = json!({
            "detail": "Email already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn register(
    payload: web::Json<RegisterReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let email = payload.email.trim().to_lowercase();
    let name = payload.name.trim();

    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password must not be empty".to_string(),
        ));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let hashed = hash_password(&payload.password).map_err(|e| {
        tracing::error!(error = %e, "Password hashing failed");
        ApiError::Internal
    })?;

    let user = User {
        user_id: Uuid::new_v4().to_string(),
        email,
        name: name.to_string(),
        role: payload.role,
        password: hashed,
        created_at: Utc::now(),
    };

    match UserStore::insert(pool.get_ref(), &user).await {
        Ok(()) => {
            // keep the filter and cache in step with the table
            email_filter::insert(&user.email);
            email_cache::mark_taken(&user.email).await;
        }
        Err(e) if is_duplicate_key(&e) => {
            // lost the race against a concurrent registration
            return Err(ApiError::Conflict("Email already registered".to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let token = generate_access_token(
        &user.user_id,
        user.role,
        &config.jwt_secret,
        config.token_ttl_days,
    );

    info!(user_id = %user.user_id, role = %user.role, "User registered");

    Ok(HttpResponse::Ok().json(AuthResp {
        token,
        user: PublicUser::from(&user),
    }))
}

/// Login handler
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReq,
    responses(
        (status = 200, description = "Logged in successfully", body = AuthResp),
        (status = 401, description = "Invalid email or password", body = Object, example = json!({
            "detail": "Invalid email or password"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, config, payload),
    fields(email = %payload.email)
)]
pub async fn login(
    payload: web::Json<LoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    debug!("Fetching user from database");

    // same normalization as registration
    let email = payload.email.trim().to_lowercase();
    let user = match UserStore::find_by_email(pool.get_ref(), &email).await? {
        Some(user) => {
            debug!(user_id = %user.user_id, "User found");
            user
        }
        None => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
        }
    };

    debug!("Verifying password");

    if !verify_password(&payload.password, &user.password) {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Invalid email or password".to_string()));
    }

    let token = generate_access_token(
        &user.user_id,
        user.role,
        &config.jwt_secret,
        config.token_ttl_days,
    );

    info!("Login successful");

    Ok(HttpResponse::Ok().json(AuthResp {
        token,
        user: PublicUser::from(&user),
    }))
}
