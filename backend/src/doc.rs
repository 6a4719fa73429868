//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path from the inbound layer and the schema
//! wrappers ([`ErrorSchema`], [`ErrorCodeSchema`], [`UserSchema`]) that keep
//! utoipa out of the domain types. The document backs Swagger UI in debug
//! builds and is exported by `cargo run --bin openapi-dump`.

use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::items::{ItemPayload, ItemResponse, ItemStatusPayload};
use crate::inbound::http::offers::{CreateOfferPayload, OfferResponse, OfferTermsPayload};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, UserSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Barter marketplace API",
        description = "Listings, offers and trades between marketplace members.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::change_item_status,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::offers::create_offer,
        crate::inbound::http::offers::list_offers,
        crate::inbound::http::offers::get_offer,
        crate::inbound::http::offers::revise_offer,
        crate::inbound::http::offers::delete_offer,
        crate::inbound::http::offers::accept_offer,
        crate::inbound::http::offers::refuse_offer,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        RegisterRequest,
        ItemPayload,
        ItemStatusPayload,
        ItemResponse,
        OfferTermsPayload,
        CreateOfferPayload,
        OfferResponse,
    )),
    tags(
        (name = "auth", description = "Registration and session management"),
        (name = "users", description = "Member accounts"),
        (name = "items", description = "Listed items and their status"),
        (name = "offers", description = "Offers and their decisions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema and path registration.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const USER_SCHEMA_NAME: &str = "crate.domain.User";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case(ERROR_SCHEMA_NAME, "code")]
    #[case(ERROR_SCHEMA_NAME, "traceId")]
    #[case(USER_SCHEMA_NAME, "displayName")]
    #[case("ItemResponse", "imageUrl")]
    #[case("OfferResponse", "moneyAmount")]
    fn schemas_expose_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas.get(schema).expect("registered schema");
        assert_object_schema_has_field(found, field);
    }

    #[rstest]
    #[case("/api/v1/auth/login")]
    #[case("/api/v1/users/me")]
    #[case("/api/v1/items/{id}/status")]
    #[case("/api/v1/offers/{id}/accept")]
    #[case("/api/v1/offers/{id}/refuse")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }
}
