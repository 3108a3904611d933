//! Integration test suite for aicarousel-gateway.
//!
//! `common` holds shared harness helpers (a migrated in-memory database and
//! a temp-file-backed models config); `integration` exercises the HTTP
//! surface, the auth guard, and the provider registry through the crate's
//! public API rather than via internal unit tests.

pub mod common;
pub mod integration;
