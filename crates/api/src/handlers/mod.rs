//! HTTP handlers.
//!
//! [`resource`] holds the generic controller; the other modules bind each
//! forum model to it and add their resource-specific endpoints.

pub mod category;
pub mod post;
pub mod resource;
pub mod thread;
