//! Identity primitives.
//!
//! - [`jwt`] -- bearer-token validation (and generation for tests/tooling).

pub mod jwt;
