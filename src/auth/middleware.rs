use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use serde_json::json;
use sqlx::MySqlPool;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::ApiError;
use crate::store::users::UserStore;

/// Bearer guard for the attendance scope. Validates the token, then
/// resolves the subject against the user store so a deleted account
/// stops authenticating immediately. The resolved [`AuthUser`] lands in
/// request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let config = req
        .app_data::<Data<Config>>()
        .ok_or(ApiError::Internal)?
        .clone();
    let pool = req
        .app_data::<Data<MySqlPool>>()
        .ok_or(ApiError::Internal)?
        .clone();

    let header_value = match req.headers().get("Authorization") {
        Some(h) => h.to_str().map_err(|_| {
            ApiError::Unauthorized("Invalid Authorization header encoding".to_string())
        })?,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"detail": "Missing Authorization header"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let token = match header_value.strip_prefix("Bearer ") {
        Some(t) => t,
        None => {
            let resp = HttpResponse::Unauthorized()
                .json(json!({"detail": "Authorization header must start with Bearer"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let claims = match verify_token(token, &config.jwt_secret) {
        Ok(c) => c,
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            let resp = HttpResponse::Unauthorized()
                .json(json!({"detail": "Invalid or expired token"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
    };

    let user = match UserStore::find_by_id(pool.get_ref(), &claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            let resp = HttpResponse::Unauthorized().json(json!({"detail": "User not found"}));
            return Ok(req.into_response(resp.map_into_boxed_body()));
        }
        Err(e) => return Err(ApiError::from(e).into()),
    };

    // Role comes from the stored row, not the token claim.
    req.extensions_mut().insert(AuthUser {
        user_id: user.user_id,
        name: user.name,
        email: user.email,
        role: user.role,
    });

    next.call(req).await
}
