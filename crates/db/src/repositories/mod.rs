//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod category_repo;
pub mod post_repo;
pub mod thread_repo;

pub use category_repo::CategoryRepo;
pub use post_repo::PostRepo;
pub use thread_repo::ThreadRepo;
