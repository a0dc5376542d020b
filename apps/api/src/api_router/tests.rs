use std::error::Error;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode, header};
use chrono::Duration;
use serde_json::{Value, json};
use skillswap_application::{BruteForcePolicy, PasswordHasher};
use skillswap_core::{AppResult, Clock, ManualClock};
use skillswap_infrastructure::BackgroundSweeper;
use tower::ServiceExt;

use crate::api_config::{ApiConfig, RateLimitStoreConfig};
use crate::api_services::build_app_state_with;
use crate::state::AppState;

use super::build_router;

type TestResult = Result<(), Box<dyn Error>>;

struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("plain:{password}"))
    }
}

struct TestApp {
    router: Router,
    state: AppState,
    clock: Arc<ManualClock>,
    _sweepers: Vec<BackgroundSweeper>,
}

impl TestApp {
    fn new() -> AppResult<Self> {
        let config = ApiConfig {
            api_host: "127.0.0.1".to_owned(),
            api_port: 0,
            rate_limit_store: RateLimitStoreConfig::Memory,
            redis_url: None,
            sweep_interval: StdDuration::from_secs(300),
            brute_force_policy: BruteForcePolicy::default(),
        };
        let clock = Arc::new(ManualClock::default());
        let services = build_app_state_with(&config, clock.clone(), Arc::new(PlainHasher))?;

        Ok(Self {
            router: build_router(services.state.clone()),
            state: services.state,
            clock,
            _sweepers: services.sweepers,
        })
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        client: &str,
        body: Option<Value>,
    ) -> Result<Response<Body>, Box<dyn Error>> {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-forwarded-for", client)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))?;

        Ok(self.router.clone().oneshot(request).await?)
    }
}

fn header_value(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(ToOwned::to_owned)
}

async fn json_body(response: Response<Body>) -> Result<Value, Box<dyn Error>> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn health_reports_rate_limit_store() -> TestResult {
    let app = TestApp::new()?;

    let response = app.send(Method::GET, "/health", "203.0.113.1", None).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await?,
        json!({ "status": "ok", "rate_limit_store": "memory" })
    );
    Ok(())
}

#[tokio::test]
async fn registration_is_denied_after_five_requests() -> TestResult {
    let app = TestApp::new()?;
    let invalid = json!({ "username": "ab", "password": "short" });

    for expected_remaining in ["4", "3", "2", "1", "0"] {
        let response = app
            .send(
                Method::POST,
                "/auth/register",
                "203.0.113.1",
                Some(invalid.clone()),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            header_value(&response, "x-ratelimit-limit").as_deref(),
            Some("5")
        );
        assert_eq!(
            header_value(&response, "x-ratelimit-remaining").as_deref(),
            Some(expected_remaining)
        );
    }

    let denied = app
        .send(Method::POST, "/auth/register", "203.0.113.1", Some(invalid))
        .await?;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(header_value(&denied, "retry-after").as_deref(), Some("900"));
    assert_eq!(
        header_value(&denied, "x-ratelimit-remaining").as_deref(),
        Some("0")
    );
    let window_end = app.clock.now() + Duration::minutes(15);
    assert_eq!(
        header_value(&denied, "x-ratelimit-reset"),
        Some(window_end.timestamp_millis().to_string())
    );
    assert_eq!(
        json_body(denied).await?,
        json!({ "error": "too many registration attempts, try again later" })
    );
    Ok(())
}

#[tokio::test]
async fn registration_window_reopens_after_it_elapses() -> TestResult {
    let app = TestApp::new()?;
    let invalid = json!({ "username": "ab", "password": "short" });

    for _ in 0..6 {
        app.send(
            Method::POST,
            "/auth/register",
            "203.0.113.1",
            Some(invalid.clone()),
        )
        .await?;
    }

    app.clock.advance(Duration::minutes(15));
    let response = app
        .send(Method::POST, "/auth/register", "203.0.113.1", Some(invalid))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        header_value(&response, "x-ratelimit-remaining").as_deref(),
        Some("4")
    );
    Ok(())
}

#[tokio::test]
async fn clients_are_limited_independently() -> TestResult {
    let app = TestApp::new()?;
    let invalid = json!({ "username": "ab", "password": "short" });

    for _ in 0..6 {
        app.send(
            Method::POST,
            "/auth/register",
            "203.0.113.1",
            Some(invalid.clone()),
        )
        .await?;
    }

    let other = app
        .send(Method::POST, "/auth/register", "203.0.113.2", Some(invalid))
        .await?;
    assert_eq!(other.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn registered_account_is_visible_without_password_hash() -> TestResult {
    let app = TestApp::new()?;

    let created = app
        .send(
            Method::POST,
            "/auth/register",
            "203.0.113.1",
            Some(json!({ "username": "maria", "password": "guitar-lessons" })),
        )
        .await?;
    assert_eq!(created.status(), StatusCode::CREATED);

    let fetched = app
        .send(Method::GET, "/api/accounts/maria", "203.0.113.1", None)
        .await?;
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(
        header_value(&fetched, "x-ratelimit-limit").as_deref(),
        Some("100")
    );

    let body = json_body(fetched).await?;
    assert_eq!(body["username"], "maria");
    assert!(body.get("password_hash").is_none());
    Ok(())
}

#[tokio::test]
async fn unknown_account_is_not_found() -> TestResult {
    let app = TestApp::new()?;

    let response = app
        .send(Method::GET, "/api/accounts/nobody", "203.0.113.1", None)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn repeated_login_failures_lock_the_client() -> TestResult {
    let app = TestApp::new()?;
    app.state
        .account_service
        .register("maria", "guitar-lessons")
        .await?;
    let wrong = json!({ "username": "maria", "password": "piano-lessons" });
    let right = json!({ "username": "maria", "password": "guitar-lessons" });

    for _ in 0..4 {
        let response = app
            .send(
                Method::POST,
                "/auth/login",
                "198.51.100.7",
                Some(wrong.clone()),
            )
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let tripped = app
        .send(Method::POST, "/auth/login", "198.51.100.7", Some(wrong))
        .await?;
    assert_eq!(tripped.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(header_value(&tripped, "retry-after").as_deref(), Some("900"));

    let locked = app
        .send(
            Method::POST,
            "/auth/login",
            "198.51.100.7",
            Some(right.clone()),
        )
        .await?;
    assert_eq!(locked.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        json_body(locked).await?,
        json!({ "error": "too many failed login attempts, try again later" })
    );

    let other_client = app
        .send(
            Method::POST,
            "/auth/login",
            "198.51.100.8",
            Some(right.clone()),
        )
        .await?;
    assert_eq!(other_client.status(), StatusCode::OK);

    app.clock.advance(Duration::minutes(15));
    let unlocked = app
        .send(Method::POST, "/auth/login", "198.51.100.7", Some(right))
        .await?;
    assert_eq!(unlocked.status(), StatusCode::OK);
    let body = json_body(unlocked).await?;
    assert_eq!(body["status"], "authenticated");
    assert_eq!(body["account"]["username"], "maria");
    Ok(())
}

#[tokio::test]
async fn login_requests_are_rate_limited_per_client() -> TestResult {
    let app = TestApp::new()?;
    let unknown = json!({ "username": "nobody", "password": "whatever-it-is" });

    // A different username each round keeps the failed-attempt gate open.
    for round in 0..10 {
        let payload = json!({ "username": format!("nobody{round}"), "password": "whatever-it-is" });
        let response = app
            .send(Method::POST, "/auth/login", "198.51.100.9", Some(payload))
            .await?;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    let denied = app
        .send(Method::POST, "/auth/login", "198.51.100.9", Some(unknown))
        .await?;
    assert_eq!(denied.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        header_value(&denied, "x-ratelimit-limit").as_deref(),
        Some("10")
    );
    assert_eq!(
        json_body(denied).await?,
        json!({ "error": "too many login attempts, try again in 15 minutes" })
    );
    Ok(())
}

#[tokio::test]
async fn lockout_follows_the_first_forwarded_address() -> TestResult {
    let app = TestApp::new()?;
    app.state
        .account_service
        .register("maria", "guitar-lessons")
        .await?;
    let wrong = json!({ "username": "maria", "password": "piano-lessons" });
    let right = json!({ "username": "maria", "password": "guitar-lessons" });

    for _ in 0..5 {
        app.send(
            Method::POST,
            "/auth/login",
            "198.51.100.7",
            Some(wrong.clone()),
        )
        .await?;
    }

    // A proxy that appends its own hop does not change the key.
    let appended = app
        .send(
            Method::POST,
            "/auth/login",
            "198.51.100.7, 10.0.0.1",
            Some(right.clone()),
        )
        .await?;
    assert_eq!(appended.status(), StatusCode::TOO_MANY_REQUESTS);

    // A rewritten first entry is a different key; only a trusted proxy prevents this.
    let rewritten = app
        .send(
            Method::POST,
            "/auth/login",
            "203.0.113.50, 10.0.0.1",
            Some(right),
        )
        .await?;
    assert_eq!(rewritten.status(), StatusCode::OK);
    Ok(())
}
