//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{Value, json};

pub use crate::test_support::{SEEDED_PASSWORD, memory_state, seed_account, test_app};

/// Log in and return the session cookie.
pub async fn login_cookie<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": username, "password": SEEDED_PASSWORD }))
            .to_request(),
    )
    .await;
    assert!(response.status().is_success(), "login for {username} failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Send a JSON request, optionally authenticated, and return status and body.
pub async fn send_json<S, B>(
    app: &S,
    request: test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status().as_u16();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Create an item through the API and return its JSON representation.
pub async fn create_item<S, B>(app: &S, cookie: &Cookie<'static>, payload: Value) -> Value
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = send_json(
        app,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .set_json(payload),
        Some(cookie),
    )
    .await;
    assert_eq!(status, 201, "item creation failed: {body}");
    body
}
