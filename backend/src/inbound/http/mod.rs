//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod items;
pub mod offers;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

use crate::domain::Error;
pub use error::ApiResult;

fn extractor_error(err: impl Into<actix_web::Error>) -> actix_web::Error {
    let err: actix_web::Error = err.into();
    Error::invalid_request(err.to_string()).into()
}

/// Register every `/api/v1` handler on `cfg`.
///
/// Body, query and path extractor failures are reported in the standard
/// error envelope with code `invalid_request`.
///
/// # Examples
/// ```no_run
/// use actix_web::{App, web};
/// use barter_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| extractor_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| extractor_error(err)))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(users::current_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(items::create_item)
        .service(items::list_items)
        .service(items::get_item)
        .service(items::update_item)
        .service(items::change_item_status)
        .service(items::delete_item)
        .service(offers::create_offer)
        .service(offers::list_offers)
        .service(offers::get_offer)
        .service(offers::revise_offer)
        .service(offers::delete_offer)
        .service(offers::accept_offer)
        .service(offers::refuse_offer);
}
