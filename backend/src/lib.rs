//! Campus helpdesk backend library.
//!
//! The crate is laid out hexagonally: [`domain`] holds entities, access rules
//! and services; [`inbound`] adapts HTTP requests onto the driving ports; and
//! [`outbound`] implements the driven ports against PostgreSQL, memory, the
//! filesystem and the credential primitives.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
