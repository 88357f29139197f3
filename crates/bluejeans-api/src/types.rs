//! Wire types for the three BlueJeans endpoints used by the bridge.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Response of `POST /oauth2/token?client`.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: i64,
    pub scope: TokenScope,
}

impl AccessToken {
    /// Value for the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("BEARER {}", self.access_token)
    }

    pub fn enterprise_id(&self) -> i64 {
        self.scope.enterprise
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Scope block of the token response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenScope {
    /// Enterprise (tenant) the client belongs to; keys the user directory.
    pub enterprise: i64,
    #[serde(default)]
    pub partition_name: String,
    #[serde(default)]
    pub partition: Value,
    #[serde(default)]
    pub capabilities: Value,
}

/// Envelope of `GET /v1/enterprise/{id}/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserList {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub users: Vec<UserRecord>,
}

/// A user entry of the enterprise directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    /// Resource path of the user, e.g. `/v1/user/1234`.
    pub uri: String,
}

/// A user's personal meeting room.
///
/// Only the fields the bridge reads are typed. Everything else the provider
/// sends lands in `extra` and is written back unchanged on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalMeeting {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: i64,
    /// Dial-in id, also the last path segment of the join link.
    pub numeric_meeting_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attendee_passcode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub add_attendee_passcode: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub locked: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_expired: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub is_personal_meeting: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub start: Option<i64>,
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Reads an explicit `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl PersonalMeeting {
    /// Returns the attendee passcode, if one is set.
    pub fn passcode(&self) -> Option<&str> {
        Some(self.attendee_passcode.as_str()).filter(|p| !p.is_empty())
    }

    /// Whether attendees can currently join.
    pub fn is_open(&self) -> bool {
        !self.locked && !self.is_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEETING_FIXTURE: &str = r#"{
        "id": 9001,
        "uuid": null,
        "title": "My Personal Meeting",
        "description": "",
        "start": 1500000000000,
        "end": 1500003600000,
        "timezone": "America/New_York",
        "numericMeetingId": "1234567",
        "attendeePasscode": "4321",
        "addAttendeePasscode": true,
        "locked": false,
        "isExpired": false,
        "isPersonalMeeting": true,
        "moderator": {"id": 77, "username": "jdoe"},
        "attendees": [],
        "inviteeJoinOption": 0
    }"#;

    #[test]
    fn token_parses_scope() {
        let token: AccessToken = serde_json::from_str(
            r#"{"access_token":"abc","expires_in":3600,
                "scope":{"enterprise":42,"partitionName":"z1","partition":{"id":1}}}"#,
        )
        .unwrap();
        assert_eq!(token.enterprise_id(), 42);
        assert_eq!(token.scope.partition_name, "z1");
        assert_eq!(token.authorization(), "BEARER abc");
    }

    #[test]
    fn token_without_scope_is_rejected() {
        let result: Result<AccessToken, _> =
            serde_json::from_str(r#"{"access_token":"abc","expires_in":3600}"#);
        assert!(result.is_err());
    }

    #[test]
    fn token_debug_hides_secret() {
        let token: AccessToken =
            serde_json::from_str(r#"{"access_token":"s3cr3t","scope":{"enterprise":1}}"#).unwrap();
        assert!(!format!("{:?}", token).contains("s3cr3t"));
    }

    #[test]
    fn user_list_defaults_to_empty() {
        let list: UserList = serde_json::from_str("{}").unwrap();
        assert_eq!(list.count, 0);
        assert!(list.users.is_empty());
    }

    #[test]
    fn meeting_typed_fields() {
        let meeting: PersonalMeeting = serde_json::from_str(MEETING_FIXTURE).unwrap();
        assert_eq!(meeting.id, 9001);
        assert_eq!(meeting.numeric_meeting_id, "1234567");
        assert_eq!(meeting.passcode(), Some("4321"));
        assert!(meeting.is_open());
        assert_eq!(meeting.timezone.as_deref(), Some("America/New_York"));
        assert_eq!(meeting.start, Some(1_500_000_000_000));
    }

    #[test]
    fn meeting_keeps_unmodelled_fields() {
        let meeting: PersonalMeeting = serde_json::from_str(MEETING_FIXTURE).unwrap();
        assert_eq!(meeting.extra["moderator"]["username"], "jdoe");
        assert_eq!(meeting.extra["uuid"], Value::Null);

        let written = serde_json::to_value(&meeting).unwrap();
        assert_eq!(written["moderator"], serde_json::json!({"id": 77, "username": "jdoe"}));
        assert_eq!(written["inviteeJoinOption"], 0);
        assert_eq!(written["numericMeetingId"], "1234567");
    }

    #[test]
    fn meeting_requires_numeric_id() {
        let result: Result<PersonalMeeting, _> = serde_json::from_str(r#"{"id":1}"#);
        assert!(result.is_err());
    }

    #[test]
    fn locked_meeting_is_not_open() {
        let meeting: PersonalMeeting =
            serde_json::from_str(r#"{"numericMeetingId":"1","locked":true}"#).unwrap();
        assert!(!meeting.is_open());
        assert!(meeting.passcode().is_none());
    }

    #[test]
    fn meeting_tolerates_null_fields() {
        let meeting: PersonalMeeting = serde_json::from_str(
            r#"{"numericMeetingId":"1234567","id":null,"title":null,
                "attendeePasscode":null,"locked":null,"isExpired":null}"#,
        )
        .unwrap();
        assert_eq!(meeting.numeric_meeting_id, "1234567");
        assert_eq!(meeting.id, 0);
        assert_eq!(meeting.title, "");
        assert!(meeting.passcode().is_none());
        assert!(meeting.is_open());
    }

    #[test]
    fn meeting_null_numeric_id_is_rejected() {
        let result: Result<PersonalMeeting, _> =
            serde_json::from_str(r#"{"numericMeetingId":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn meeting_writes_null_schedule_fields_back() {
        let meeting: PersonalMeeting = serde_json::from_str(
            r#"{"numericMeetingId":"1","timezone":null,"start":null,"end":null}"#,
        )
        .unwrap();
        let written = serde_json::to_value(&meeting).unwrap();
        assert_eq!(written.get("timezone"), Some(&Value::Null));
        assert_eq!(written.get("start"), Some(&Value::Null));
        assert_eq!(written.get("end"), Some(&Value::Null));
    }
}
