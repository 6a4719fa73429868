//! Barter marketplace backend.
//!
//! Layout follows a hexagonal split: [`domain`] holds entities, the access
//! policy and services; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports with Diesel, an in-memory store,
//! Argon2 and a media URL resolver.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
