//! Black-box tests against the assembled app: auth guard, public routes,
//! and the dispatch core's "no active providers" path end to end.

pub mod auth_surface;
pub mod dispatch_surface;
