//! Shared helpers for the HTTP scenario suites.
//!
//! Drives the API the way a client would: JSON bodies in, status plus JSON
//! out, with the session cookie threaded through by hand.

#![allow(dead_code)]

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use serde_json::{Value, json};

pub use barter_backend::test_support::{SEEDED_PASSWORD, memory_state, seed_account, test_app};

/// Log in with `password` and return the session cookie.
pub async fn login_as<S, B>(app: &S, username: &str, password: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": username, "password": password }))
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

/// Log in a seeded account.
pub async fn login<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    login_as(app, username, SEEDED_PASSWORD).await
}

/// Status code and decoded body of a finished response.
pub async fn into_parts<B>(response: ServiceResponse<B>) -> (u16, Value)
where
    B: MessageBody,
{
    let status = response.status().as_u16();
    let body = test::read_body(response).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

/// Build a request for `uri`, attaching the cookie when one is given.
pub fn request(
    request: test::TestRequest,
    uri: &str,
    cookie: Option<&Cookie<'static>>,
) -> Request {
    let request = request.uri(uri);
    match cookie {
        Some(cookie) => request.cookie(cookie.clone()).to_request(),
        None => request.to_request(),
    }
}

pub async fn get<S, B>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    into_parts(test::call_service(app, request(test::TestRequest::get(), uri, cookie)).await).await
}

pub async fn post<S, B>(
    app: &S,
    uri: &str,
    body: Value,
    cookie: Option<&Cookie<'static>>,
) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = request(test::TestRequest::post().set_json(body), uri, cookie);
    into_parts(test::call_service(app, req).await).await
}

pub async fn delete<S, B>(app: &S, uri: &str, cookie: Option<&Cookie<'static>>) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    into_parts(test::call_service(app, request(test::TestRequest::delete(), uri, cookie)).await)
        .await
}

/// Create an item and return its id.
pub async fn create_item<S, B>(app: &S, cookie: &Cookie<'static>, title: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, body) = post(app, "/api/v1/items", json!({ "title": title }), Some(cookie)).await;
    assert_eq!(status, 201, "item creation failed: {body}");
    id_of(&body)
}

/// Submit an offer and return the full status plus body.
pub async fn submit_offer<S, B>(
    app: &S,
    cookie: &Cookie<'static>,
    payload: Value,
) -> (u16, Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    post(app, "/api/v1/offers", payload, Some(cookie)).await
}

pub fn id_of(body: &Value) -> String {
    body["id"].as_str().expect("id field").to_owned()
}
