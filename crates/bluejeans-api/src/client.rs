//! BlueJeans API client.
//!
//! Resolving a personal meeting takes three sequential calls:
//!
//! 1. `POST /oauth2/token?client` exchanges the client credentials for a
//!    bearer token and the enterprise id
//! 2. `GET /v1/enterprise/{enterprise}/users?emailId={user}` finds the user
//! 3. `GET {user uri}/personal_meeting` fetches the meeting
//!
//! The token is fetched for every lookup and dropped afterwards.

use reqwest::Method;
use tracing::debug;

use crate::config::BlueJeansConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::JsonTransport;
use crate::resolver::{BoxFuture, MeetingResolver};
use crate::types::{AccessToken, PersonalMeeting, UserList, UserRecord};

/// Token endpoint, relative to the API root.
pub const TOKEN_PATH: &str = "/oauth2/token?client";

/// Placeholder body type for requests without one.
type NoBody = ();

/// Client for the BlueJeans REST API.
///
/// Holds no mutable state; share it freely between tasks.
#[derive(Debug, Clone)]
pub struct BlueJeansClient {
    config: BlueJeansConfig,
    transport: JsonTransport,
}

impl BlueJeansClient {
    /// Creates a client. No network traffic happens here.
    pub fn new(config: BlueJeansConfig) -> ApiResult<Self> {
        let transport = JsonTransport::new(&config)?;
        Ok(Self { config, transport })
    }

    /// Shorthand for [`BlueJeansConfig::new`] followed by [`Self::new`].
    pub fn from_credentials(
        base_url: &str,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> ApiResult<Self> {
        let config = BlueJeansConfig::new(base_url, client_id, client_secret).map_err(|e| {
            ApiError::configuration(format!("invalid BlueJeans URL '{}': {}", base_url, e))
                .with_source(e)
        })?;
        Self::new(config)
    }

    pub fn config(&self) -> &BlueJeansConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    /// Exchanges the client credentials for an access token.
    pub async fn authenticate(&self) -> ApiResult<AccessToken> {
        debug!(client_id = %self.config.credentials.client_id, "requesting access token");

        let token: AccessToken = self
            .transport
            .send_json(Method::POST, TOKEN_PATH, Some(&self.config.credentials), None)
            .await?;

        debug!(
            enterprise = token.enterprise_id(),
            expires_in = token.expires_in,
            "obtained access token"
        );
        Ok(token)
    }

    /// Looks up a user of the token's enterprise by email.
    ///
    /// When the directory returns several users the first one is used.
    pub async fn find_user(&self, token: &AccessToken, user_id: &str) -> ApiResult<UserRecord> {
        let path = format!(
            "/v1/enterprise/{}/users?emailId={}",
            token.enterprise_id(),
            urlencoding::encode(user_id)
        );

        let list: UserList = self
            .transport
            .send_json(Method::GET, &path, None::<&NoBody>, Some(&token.access_token))
            .await?;

        if list.users.len() > 1 {
            debug!(user = %user_id, matches = list.users.len(), "several users matched, using the first");
        }

        list.users.into_iter().next().ok_or_else(|| {
            ApiError::not_found(format!("no BlueJeans user matches '{}'", user_id)).with_path(path)
        })
    }

    /// Fetches the personal meeting of a directory user.
    pub async fn fetch_personal_meeting(
        &self,
        token: &AccessToken,
        user: &UserRecord,
    ) -> ApiResult<PersonalMeeting> {
        let path = format!("{}/personal_meeting", user.uri.trim_end_matches('/'));

        let meeting: PersonalMeeting = self
            .transport
            .send_json(Method::GET, &path, None::<&NoBody>, Some(&token.access_token))
            .await?;

        debug!(user = user.id, meeting = %meeting.numeric_meeting_id, "fetched personal meeting");
        Ok(meeting)
    }

    /// Resolves the personal meeting of `user_id` (an email address).
    ///
    /// # Errors
    ///
    /// The first failing step aborts the lookup and its error is returned;
    /// later steps are not attempted.
    pub async fn resolve_personal_meeting(&self, user_id: &str) -> ApiResult<PersonalMeeting> {
        let token = self.authenticate().await?;
        let user = self.find_user(&token, user_id).await?;
        self.fetch_personal_meeting(&token, &user).await
    }
}

impl MeetingResolver for BlueJeansClient {
    fn name(&self) -> &str {
        "bluejeans"
    }

    fn resolve_meeting_id<'a>(&'a self, user_id: &'a str) -> BoxFuture<'a, ApiResult<String>> {
        Box::pin(async move {
            let meeting = self.resolve_personal_meeting(user_id).await?;
            Ok(meeting.numeric_meeting_id)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorCode;

    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TOKEN_BODY: &str = r#"{
        "access_token": "tok-abc",
        "expires_in": 3600,
        "scope": {"enterprise": 4242, "partitionName": "z2", "partition": {"id": 2}, "capabilities": []}
    }"#;

    const USERS_BODY: &str = r#"{
        "count": 1,
        "users": [{"id": 77, "uri": "/v1/user/77"}]
    }"#;

    const MEETING_BODY: &str = r#"{
        "id": 501,
        "title": "Personal Meeting Room",
        "numericMeetingId": "1234567",
        "attendeePasscode": "9876",
        "locked": false,
        "isExpired": false,
        "isPersonalMeeting": true,
        "endPointType": "WEB_APP"
    }"#;

    fn client_for(server: &MockServer) -> BlueJeansClient {
        BlueJeansClient::from_credentials(&server.uri(), "client-id", "client-secret").unwrap()
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({
                "grant_type": "client_credentials",
                "client_id": "client-id",
                "client_secret": "client-secret",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN_BODY))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_users(server: &MockServer, body: &str, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/enterprise/4242/users"))
            .and(query_param("emailId", "jane@example.com"))
            .and(header("authorization", "BEARER tok-abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(expected)
            .mount(server)
            .await;
    }

    async fn mount_meeting(server: &MockServer, response: ResponseTemplate, expected: u64) {
        Mock::given(method("GET"))
            .and(path("/v1/user/77/personal_meeting"))
            .and(header("authorization", "BEARER tok-abc"))
            .respond_with(response)
            .expect(expected)
            .mount(server)
            .await;
    }

    #[test]
    fn construction_does_not_touch_the_network() {
        let client = BlueJeansClient::from_credentials("", "id", "secret").unwrap();
        assert_eq!(client.base_url(), "https://api.bluejeans.com");
        assert_eq!(client.name(), "bluejeans");
    }

    #[test]
    fn invalid_base_url_is_a_configuration_error() {
        let err = BlueJeansClient::from_credentials("not a url", "id", "secret").unwrap_err();
        assert_eq!(err.code(), ApiErrorCode::Configuration);
    }

    #[tokio::test]
    async fn resolves_meeting_in_three_ordered_calls() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(&server, USERS_BODY, 1).await;
        mount_meeting(
            &server,
            ResponseTemplate::new(200).set_body_string(MEETING_BODY),
            1,
        )
        .await;

        let meeting = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap();

        assert_eq!(meeting.numeric_meeting_id, "1234567");
        assert_eq!(meeting.passcode(), Some("9876"));
        assert_eq!(meeting.extra["endPointType"], "WEB_APP");

        let requests = server.received_requests().await.unwrap();
        let seen: Vec<(String, String)> = requests
            .iter()
            .map(|r| (r.method.to_string(), r.url.path().to_string()))
            .collect();
        assert_eq!(
            seen,
            vec![
                ("POST".to_string(), "/oauth2/token".to_string()),
                ("GET".to_string(), "/v1/enterprise/4242/users".to_string()),
                ("GET".to_string(), "/v1/user/77/personal_meeting".to_string()),
            ]
        );

        assert!(requests[0].headers.get("authorization").is_none());
        for request in &requests[1..] {
            assert_eq!(
                request.headers.get("authorization").unwrap(),
                "BEARER tok-abc"
            );
        }
    }

    #[tokio::test]
    async fn resolver_returns_numeric_id() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(&server, USERS_BODY, 1).await;
        mount_meeting(
            &server,
            ResponseTemplate::new(200).set_body_string(MEETING_BODY),
            1,
        )
        .await;

        let client = client_for(&server);
        let resolver: &dyn MeetingResolver = &client;
        let id = resolver.resolve_meeting_id("jane@example.com").await.unwrap();
        assert_eq!(id, "1234567");
    }

    #[tokio::test]
    async fn lookup_key_is_percent_encoded() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("GET"))
            .and(path("/v1/enterprise/4242/users"))
            .and(query_param("emailId", "jane+bj@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(USERS_BODY))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let token = client.authenticate().await.unwrap();
        let user = client.find_user(&token, "jane+bj@example.com").await.unwrap();
        assert_eq!(user.uri, "/v1/user/77");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(
            requests[1].url.query(),
            Some("emailId=jane%2Bbj%40example.com")
        );
    }

    #[tokio::test]
    async fn unauthorized_token_call_stops_the_chain() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;
        mount_users(&server, USERS_BODY, 0).await;
        mount_meeting(&server, ResponseTemplate::new(200), 0).await;

        let err = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ApiErrorCode::Provider);
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.body(), Some(r#"{"error":"invalid_client"}"#));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn garbled_token_response_is_not_used() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"unexpected":true}"#))
            .mount(&server)
            .await;
        mount_users(&server, USERS_BODY, 0).await;

        let err = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ApiErrorCode::Decode);
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn empty_directory_is_not_found() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(&server, r#"{"count":0,"users":[]}"#, 1).await;
        mount_meeting(&server, ResponseTemplate::new(200), 0).await;

        let err = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(err.message().contains("jane@example.com"));
        assert_eq!(server.received_requests().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn first_of_several_users_is_used() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(
            &server,
            r#"{"count":2,"users":[{"id":77,"uri":"/v1/user/77"},{"id":78,"uri":"/v1/user/78"}]}"#,
            1,
        )
        .await;
        mount_meeting(
            &server,
            ResponseTemplate::new(200).set_body_string(MEETING_BODY),
            1,
        )
        .await;

        let meeting = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap();
        assert_eq!(meeting.id, 501);
    }

    #[tokio::test]
    async fn undecodable_meeting_is_a_decode_error() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(&server, USERS_BODY, 1).await;
        mount_meeting(
            &server,
            ResponseTemplate::new(200).set_body_string(r#"{"numericMeetingId": 1234567"#),
            1,
        )
        .await;

        let err = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ApiErrorCode::Decode);
        assert!(
            err.path()
                .unwrap()
                .ends_with("/v1/user/77/personal_meeting")
        );
    }

    #[tokio::test]
    async fn meeting_fetch_error_carries_status() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        mount_users(&server, USERS_BODY, 1).await;
        mount_meeting(
            &server,
            ResponseTemplate::new(404).set_body_string("no personal meeting"),
            1,
        )
        .await;

        let err = client_for(&server)
            .resolve_personal_meeting("jane@example.com")
            .await
            .unwrap_err();

        assert_eq!(err.code(), ApiErrorCode::Provider);
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.body(), Some("no personal meeting"));
    }

    #[tokio::test]
    async fn concurrent_lookups_fetch_their_own_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_string(TOKEN_BODY))
            .expect(2)
            .mount(&server)
            .await;
        mount_users(&server, USERS_BODY, 2).await;
        mount_meeting(
            &server,
            ResponseTemplate::new(200).set_body_string(MEETING_BODY),
            2,
        )
        .await;

        let client = client_for(&server);
        let (a, b) = tokio::join!(
            client.resolve_personal_meeting("jane@example.com"),
            client.resolve_personal_meeting("jane@example.com"),
        );
        assert_eq!(a.unwrap().numeric_meeting_id, "1234567");
        assert_eq!(b.unwrap().numeric_meeting_id, "1234567");
    }
}
