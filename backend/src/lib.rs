//! Backend library modules for the group restaurant-voting service.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by tooling and the debug docs endpoint.
pub use doc::ApiDoc;
/// Request-correlation middleware re-exported for app assembly.
pub use middleware::request_id::Correlation;
