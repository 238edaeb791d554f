//! Trellis client layer: route tables, wire types, the query cache, and the
//! HTTP client the TUI talks through.

pub mod api_client;
pub mod cache;
pub mod cached;
pub mod routes;
pub mod types;

pub use api_client::{ApiClient, ApiClientError, ClientCredentials};
pub use cache::{QueryCache, QueryKey};
pub use cached::CachedClient;
pub use routes::{Operation, RouteError, RouteSet, RouteTemplate};
