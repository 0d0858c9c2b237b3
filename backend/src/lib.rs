//! School-administration back end.
//!
//! Hexagonal layout: `domain` holds the entities, ports, and attendance
//! services; `inbound::http` adapts them to REST; `outbound::persistence`
//! implements the driven ports on PostgreSQL via Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request-id middleware applied to every route.
pub use middleware::request_id::RequestId;
