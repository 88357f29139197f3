//! The [`MeetingResolver`] trait.
//!
//! This is the only surface the chat command layer sees: given the chat
//! user's email, produce the numeric id of their personal meeting. The
//! BlueJeans client implements it; tests substitute their own.

use std::future::Future;
use std::pin::Pin;

use crate::error::ApiResult;

/// A boxed future for object-safe async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Resolves a user identifier to a personal meeting id.
///
/// Implementations must be safe to share between concurrent command
/// invocations; each call runs its own independent lookup.
pub trait MeetingResolver: Send + Sync {
    /// Short name of the backing service, used in logs.
    fn name(&self) -> &str;

    /// Returns the numeric meeting id of `user_id`'s personal meeting.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`](crate::ApiError) of the first failing step.
    fn resolve_meeting_id<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, ApiResult<String>>;
}
