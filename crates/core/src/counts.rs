//! Reply counting.
//!
//! The first post of every thread is its opening post, not a reply, so a
//! category's reply count subtracts one post per thread.

/// Sum of `posts - 1` over the given per-thread post counts.
///
/// The subtraction is applied per thread exactly as stated: a thread with no
/// surviving posts contributes `-1`.
pub fn reply_count(posts_per_thread: &[i64]) -> i64 {
    posts_per_thread.iter().map(|posts| posts - 1).sum()
}

/// Replies in a single thread (its posts minus the opening post), floored at 0.
pub fn thread_reply_count(posts: i64) -> i64 {
    (posts - 1).max(0)
}
