//! Chat posts and the meeting post format.
//!
//! A started meeting is announced with a post of type `custom_bluejeans`.
//! Its props carry the meeting id and link so the web client can render a
//! join card, and so later `/bluejeans start` calls can spot a meeting that
//! was just started in the same channel.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bluejeans_core::links::{meeting_id_from_link, meeting_link};

/// Post type rendered as a BlueJeans card by the web client.
pub const MEETING_POST_TYPE: &str = "custom_bluejeans";

/// `meeting_status` of a freshly started meeting.
pub const STATUS_STARTED: &str = "STARTED";

/// `meeting_status` of the "someone already started one" notice.
pub const STATUS_RECENTLY_CREATED: &str = "RECENTLY_CREATED";

pub const PROP_MEETING_ID: &str = "meeting_id";
pub const PROP_MEETING_LINK: &str = "meeting_link";
pub const PROP_MEETING_STATUS: &str = "meeting_status";
pub const PROP_MEETING_PERSONAL: &str = "meeting_personal";
pub const PROP_MEETING_CREATOR: &str = "meeting_creator_username";

/// A chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatPost {
    /// Assigned by the platform when the post is stored.
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    pub channel_id: String,
    pub message: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub post_type: String,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub props: Map<String, Value>,
    pub create_at: DateTime<Utc>,
}

impl ChatPost {
    /// Creates a plain post stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: String::new(),
            user_id: user_id.into(),
            channel_id: channel_id.into(),
            message: message.into(),
            post_type: String::new(),
            props: Map::new(),
            create_at: Utc::now(),
        }
    }

    pub fn with_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = post_type.into();
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn with_create_at(mut self, create_at: DateTime<Utc>) -> Self {
        self.create_at = create_at;
        self
    }

    /// Returns a string prop, if present.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(Value::as_str)
    }

    /// Whether this post announces a started BlueJeans meeting.
    pub fn is_started_meeting(&self) -> bool {
        self.post_type == MEETING_POST_TYPE
            && self.prop_str(PROP_MEETING_STATUS) == Some(STATUS_STARTED)
    }
}

/// Builds the channel post announcing a started personal meeting.
pub fn meeting_post(
    bot_user_id: &str,
    channel_id: &str,
    creator_username: &str,
    meeting_id: &str,
    join_base: &str,
) -> ChatPost {
    let link = meeting_link(join_base, meeting_id);

    ChatPost::new(bot_user_id, channel_id, format!("Meeting started at {}.", link))
        .with_type(MEETING_POST_TYPE)
        .with_prop(PROP_MEETING_ID, meeting_id)
        .with_prop(PROP_MEETING_LINK, link)
        .with_prop(PROP_MEETING_STATUS, STATUS_STARTED)
        .with_prop(PROP_MEETING_PERSONAL, true)
        .with_prop(PROP_MEETING_CREATOR, creator_username)
}

/// A meeting recently started in a channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentMeeting {
    pub meeting_id: String,
    pub link: String,
    /// Falls back to `Someone` when the post has no creator.
    pub creator_username: String,
}

/// Finds the newest started meeting among `posts` created at or after
/// `now - window`.
///
/// A post without a stored link gets one built on `join_base`.
pub fn find_recent_meeting(
    posts: &[ChatPost],
    now: DateTime<Utc>,
    window: TimeDelta,
    join_base: &str,
) -> Option<RecentMeeting> {
    let since = now - window;

    posts
        .iter()
        .filter(|p| p.create_at >= since && p.is_started_meeting())
        .filter_map(|p| {
            let link = p.prop_str(PROP_MEETING_LINK);
            let meeting_id = p
                .prop_str(PROP_MEETING_ID)
                .map(str::to_string)
                .or_else(|| link.and_then(meeting_id_from_link))?;
            Some((p, meeting_id, link))
        })
        .max_by_key(|(p, _, _)| p.create_at)
        .map(|(p, meeting_id, link)| RecentMeeting {
            link: link
                .map(str::to_string)
                .unwrap_or_else(|| meeting_link(join_base, &meeting_id)),
            meeting_id,
            creator_username: p
                .prop_str(PROP_MEETING_CREATOR)
                .filter(|s| !s.is_empty())
                .unwrap_or("Someone")
                .to_string(),
        })
}

/// Builds the private notice shown instead of starting a second meeting.
pub fn recent_meeting_notice(bot_user_id: &str, channel_id: &str, recent: &RecentMeeting) -> ChatPost {
    ChatPost::new(
        bot_user_id,
        channel_id,
        format!(
            "There is another recent meeting created on this channel by {}: {}",
            recent.creator_username, recent.link
        ),
    )
    .with_type(MEETING_POST_TYPE)
    .with_prop(PROP_MEETING_ID, recent.meeting_id.as_str())
    .with_prop(PROP_MEETING_LINK, recent.link.as_str())
    .with_prop(PROP_MEETING_STATUS, STATUS_RECENTLY_CREATED)
    .with_prop(PROP_MEETING_CREATOR, recent.creator_username.as_str())
}
