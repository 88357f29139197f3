//! Chat platform capabilities used by the command handler.
//!
//! The handler never talks to a chat server directly. It goes through
//! [`ChatPlatform`], which a host integration implements on top of its own
//! API. [`MemoryChat`] keeps everything in memory and backs the CLI and the
//! tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::trace;

use bluejeans_api::BoxFuture;

use crate::post::ChatPost;

/// A chat account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatUser {
    pub id: String,
    pub username: String,
    /// Used as the BlueJeans directory lookup key.
    pub email: String,
}

impl ChatUser {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            email: email.into(),
        }
    }
}

/// Errors reported by a chat platform.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("user {0} not found")]
    UserNotFound(String),

    #[error("user {user_id} is not a member of channel {channel_id}")]
    NotChannelMember { channel_id: String, user_id: String },

    #[error("chat platform error: {0}")]
    Platform(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

/// What the command handler needs from the chat platform.
pub trait ChatPlatform: Send + Sync {
    fn get_user<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, ChatResult<ChatUser>>;

    /// Succeeds when `user_id` belongs to `channel_id`.
    fn get_channel_member<'a>(
        &'a self,
        channel_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, ChatResult<()>>;

    /// Channel posts created at or after `since`.
    fn posts_since<'a>(
        &'a self,
        channel_id: &'a str,
        since: DateTime<Utc>,
    ) -> BoxFuture<'a, ChatResult<Vec<ChatPost>>>;

    /// Stores a channel post and returns it with its id assigned.
    fn create_post(&self, post: ChatPost) -> BoxFuture<'_, ChatResult<ChatPost>>;

    /// Shows a post to a single user without storing it in the channel.
    fn send_ephemeral_post<'a>(
        &'a self,
        user_id: &'a str,
        post: ChatPost,
    ) -> BoxFuture<'a, ChatResult<ChatPost>>;
}

/// In-memory [`ChatPlatform`].
#[derive(Debug, Default)]
pub struct MemoryChat {
    users: Mutex<HashMap<String, ChatUser>>,
    members: Mutex<HashSet<(String, String)>>,
    posts: Mutex<Vec<ChatPost>>,
    ephemeral: Mutex<Vec<(String, ChatPost)>>,
    next_id: AtomicU64,
    history_unavailable: AtomicBool,
    posting_disabled: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MemoryChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, user: ChatUser) {
        lock(&self.users).insert(user.id.clone(), user);
    }

    pub fn add_member(&self, channel_id: &str, user_id: &str) {
        lock(&self.members).insert((channel_id.to_string(), user_id.to_string()));
    }

    /// Stores a post as-is, keeping its timestamp. Used to seed history.
    pub fn insert_post(&self, mut post: ChatPost) -> ChatPost {
        if post.id.is_empty() {
            post.id = self.assign_id();
        }
        lock(&self.posts).push(post.clone());
        post
    }

    /// Channel posts in insertion order.
    pub fn channel_posts(&self, channel_id: &str) -> Vec<ChatPost> {
        lock(&self.posts)
            .iter()
            .filter(|p| p.channel_id == channel_id)
            .cloned()
            .collect()
    }

    /// Ephemeral posts shown to `user_id`, oldest first.
    pub fn ephemeral_posts(&self, user_id: &str) -> Vec<ChatPost> {
        lock(&self.ephemeral)
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .map(|(_, p)| p.clone())
            .collect()
    }

    /// Makes history reads fail, as a platform outage would.
    pub fn set_history_unavailable(&self, unavailable: bool) {
        self.history_unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes channel posting fail.
    pub fn set_posting_disabled(&self, disabled: bool) {
        self.posting_disabled.store(disabled, Ordering::SeqCst);
    }

    fn assign_id(&self) -> String {
        format!("post-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

impl ChatPlatform for MemoryChat {
    fn get_user<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, ChatResult<ChatUser>> {
        Box::pin(async move {
            lock(&self.users)
                .get(user_id)
                .cloned()
                .ok_or_else(|| ChatError::UserNotFound(user_id.to_string()))
        })
    }

    fn get_channel_member<'a>(
        &'a self,
        channel_id: &'a str,
        user_id: &'a str,
    ) -> BoxFuture<'a, ChatResult<()>> {
        Box::pin(async move {
            let key = (channel_id.to_string(), user_id.to_string());
            if lock(&self.members).contains(&key) {
                Ok(())
            } else {
                Err(ChatError::NotChannelMember {
                    channel_id: key.0,
                    user_id: key.1,
                })
            }
        })
    }

    fn posts_since<'a>(
        &'a self,
        channel_id: &'a str,
        since: DateTime<Utc>,
    ) -> BoxFuture<'a, ChatResult<Vec<ChatPost>>> {
        Box::pin(async move {
            if self.history_unavailable.load(Ordering::SeqCst) {
                return Err(ChatError::Platform("history unavailable".to_string()));
            }
            Ok(lock(&self.posts)
                .iter()
                .filter(|p| p.channel_id == channel_id && p.create_at >= since)
                .cloned()
                .collect())
        })
    }

    fn create_post(&self, post: ChatPost) -> BoxFuture<'_, ChatResult<ChatPost>> {
        Box::pin(async move {
            if self.posting_disabled.load(Ordering::SeqCst) {
                return Err(ChatError::Platform("posting disabled".to_string()));
            }
            trace!(channel = %post.channel_id, "storing post");
            Ok(self.insert_post(post))
        })
    }

    fn send_ephemeral_post<'a>(
        &'a self,
        user_id: &'a str,
        mut post: ChatPost,
    ) -> BoxFuture<'a, ChatResult<ChatPost>> {
        Box::pin(async move {
            post.id = self.assign_id();
            lock(&self.ephemeral).push((user_id.to_string(), post.clone()));
            Ok(post)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[tokio::test]
    async fn user_lookup() {
        let chat = MemoryChat::new();
        chat.add_user(ChatUser::new("u1", "jane", "jane@example.com"));

        let user = chat.get_user("u1").await.unwrap();
        assert_eq!(user.email, "jane@example.com");
        assert_eq!(
            chat.get_user("u2").await.unwrap_err(),
            ChatError::UserNotFound("u2".to_string())
        );
    }

    #[tokio::test]
    async fn membership() {
        let chat = MemoryChat::new();
        chat.add_member("chan", "u1");

        assert!(chat.get_channel_member("chan", "u1").await.is_ok());
        assert!(matches!(
            chat.get_channel_member("chan", "u2").await,
            Err(ChatError::NotChannelMember { .. })
        ));
    }

    #[tokio::test]
    async fn posts_since_filters_channel_and_time() {
        let chat = MemoryChat::new();
        let now = Utc::now();
        chat.insert_post(ChatPost::new("u", "a", "old").with_create_at(now - TimeDelta::minutes(5)));
        chat.insert_post(ChatPost::new("u", "a", "new").with_create_at(now));
        chat.insert_post(ChatPost::new("u", "b", "other").with_create_at(now));

        let posts = chat
            .posts_since("a", now - TimeDelta::seconds(30))
            .await
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].message, "new");
    }

    #[tokio::test]
    async fn created_posts_get_ids() {
        let chat = MemoryChat::new();
        let first = chat.create_post(ChatPost::new("u", "a", "1")).await.unwrap();
        let second = chat.create_post(ChatPost::new("u", "a", "2")).await.unwrap();
        assert_eq!(first.id, "post-1");
        assert_eq!(second.id, "post-2");
        assert_eq!(chat.channel_posts("a").len(), 2);
    }

    #[tokio::test]
    async fn ephemeral_posts_stay_out_of_channel() {
        let chat = MemoryChat::new();
        chat.send_ephemeral_post("u1", ChatPost::new("bot", "a", "psst"))
            .await
            .unwrap();
        assert!(chat.channel_posts("a").is_empty());
        assert_eq!(chat.ephemeral_posts("u1")[0].message, "psst");
        assert!(chat.ephemeral_posts("u2").is_empty());
    }

    #[tokio::test]
    async fn failure_switches() {
        let chat = MemoryChat::new();
        chat.set_history_unavailable(true);
        chat.set_posting_disabled(true);

        assert!(chat.posts_since("a", Utc::now()).await.is_err());
        assert!(chat.create_post(ChatPost::new("u", "a", "x")).await.is_err());
    }
}
