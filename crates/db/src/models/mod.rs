//! Row models and input DTOs, one module per table.

pub mod category;
pub mod post;
pub mod thread;

use serde::{Deserialize, Deserializer};

/// Deserialize a field that distinguishes "absent" from an explicit `null`.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`:
/// absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
