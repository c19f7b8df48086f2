//! API gateway: CORS filter and forwarding to the resource services.

pub mod cors;
pub mod proxy;

pub use cors::{apply_cors_headers, cors_filter};
pub use proxy::{gateway_routes, match_route, Gateway};
