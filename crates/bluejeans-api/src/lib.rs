//! BlueJeans REST API client.
//!
//! - [`BlueJeansClient`] - authenticates and resolves personal meetings
//! - [`MeetingResolver`] - the trait the chat command layer depends on
//! - [`JsonTransport`] - the JSON request helper behind every call
//! - [`ApiError`] - typed failures (transport, provider, decode, not found)
//!
//! # Flow
//!
//! ```text
//!  resolve_personal_meeting("jane@example.com")
//!        │
//!        ├─ POST /oauth2/token?client            -> AccessToken
//!        ├─ GET  /v1/enterprise/{id}/users?emailId=…  -> UserRecord
//!        └─ GET  {user.uri}/personal_meeting     -> PersonalMeeting
//! ```
//!
//! # Example
//!
//! ```ignore
//! use bluejeans_api::BlueJeansClient;
//!
//! let client = BlueJeansClient::from_credentials("", client_id, client_secret)?;
//! let meeting = client.resolve_personal_meeting("jane@example.com").await?;
//! println!("{}", meeting.numeric_meeting_id);
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod resolver;
pub mod types;

pub use client::{BlueJeansClient, TOKEN_PATH};
pub use config::{BlueJeansConfig, Credentials, DEFAULT_BASE_URL, GRANT_TYPE};
pub use error::{ApiError, ApiErrorCode, ApiResult};
pub use request::JsonTransport;
pub use resolver::{BoxFuture, MeetingResolver};
pub use types::{AccessToken, PersonalMeeting, TokenScope, UserList, UserRecord};
