//! Primitive aliases shared by every crate.

/// Row ids of categories, threads and posts (PostgreSQL `BIGSERIAL`), and
/// the external user ids carried in tokens.
pub type DbId = i64;

/// `created_at` / `updated_at` / `deleted_at` values, always UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
