use crate::{
    api::{attendance, reports},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope(&format!("{}/auth", config.api_prefix))
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&format!("{}/attendance", config.api_prefix))
            .wrap(from_fn(auth_middleware))
            // authentication
            .wrap(protected_limiter) // rate limiting
            .service(web::resource("/punch-in").route(web::post().to(attendance::punch_in)))
            .service(web::resource("/punch-out").route(web::post().to(attendance::punch_out)))
            .service(web::resource("/start-break").route(web::post().to(attendance::start_break)))
            .service(web::resource("/end-break").route(web::post().to(attendance::end_break)))
            .service(web::resource("/today-status").route(web::get().to(reports::today_status)))
            .service(web::resource("/my-history").route(web::get().to(reports::my_history)))
            .service(web::resource("/all-employees").route(web::get().to(reports::all_employees)))
            .service(
                web::resource("/monthly-report").route(web::post().to(reports::monthly_report)),
            ),
    );
}

// REGISTER / LOGIN
//  └─ token (30 days)

// API REQUEST
//  └─ Authorization: Bearer token

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test, web::Data};
    use sqlx::MySqlPool;

    use super::*;

    fn test_config() -> Config {
        Config {
            server_addr: "127.0.0.1:0".to_string(),
            database_url: "mysql://invalid:3306".to_string(),
            database_name: "workshift_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            token_ttl_days: 30,
            cors_origins: "*".to_string(),
            resend_api_key: String::new(),
            sender_email: "onboarding@resend.dev".to_string(),
            rate_login_per_min: 60,
            rate_register_per_min: 30,
            rate_protected_per_min: 1000,
            api_prefix: "/api".to_string(),
        }
    }

    /// Pool that never connects; these tests only exercise routing and
    /// the guard paths that reject before any query runs.
    fn lazy_pool() -> MySqlPool {
        MySqlPool::connect_lazy("mysql://invalid:3306/workshift_test").unwrap()
    }

    // The peer-IP limiter needs a peer address on every test request.
    fn peer() -> std::net::SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    #[actix_web::test]
    async fn protected_route_without_header_is_unauthorized() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(lazy_pool()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/attendance/punch-in")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Missing Authorization header");
    }

    #[actix_web::test]
    async fn non_bearer_header_is_unauthorized() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(lazy_pool()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/attendance/my-history")
            .insert_header(("Authorization", "Basic xyz"))
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Authorization header must start with Bearer");
    }

    #[actix_web::test]
    async fn garbage_bearer_token_is_unauthorized() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(lazy_pool()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/attendance/today-status")
            .insert_header(("Authorization", "Bearer not.a.token"))
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["detail"], "Invalid or expired token");
    }

    #[actix_web::test]
    async fn register_with_unknown_role_is_a_bad_request() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(lazy_pool()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .peer_addr(peer())
            .set_json(serde_json::json!({
                "email": "a@b.test",
                "password": "pw",
                "name": "A",
                "role": "manager"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn register_only_accepts_post() {
        let config = test_config();
        let app = test::init_service(
            App::new()
                .app_data(Data::new(lazy_pool()))
                .app_data(Data::new(config.clone()))
                .configure(|cfg| configure(cfg, config)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/auth/register")
            .peer_addr(peer())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
