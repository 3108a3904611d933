//! HTTP surface: state, bootstrap, and route handlers.

pub mod http;
pub mod routes;
pub mod state;

pub use http::run;
pub use state::AppState;
