//! Pure forum domain logic shared by the persistence and HTTP layers.
//!
//! Nothing in this crate performs I/O: repositories and handlers feed it rows
//! and counts, and it answers with page maths, listing order, URLs, reply
//! counts, hierarchy checks and access decisions.

pub mod access;
pub mod bulk;
pub mod counts;
pub mod error;
pub mod hierarchy;
pub mod pagination;
pub mod roles;
pub mod search;
pub mod slug;
pub mod sorting;
pub mod types;
pub mod urls;
