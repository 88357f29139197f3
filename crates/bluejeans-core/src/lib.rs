//! Shared pieces: tracing setup and meeting links

pub mod links;
pub mod tracing;

pub use links::{DEFAULT_JOIN_URL, meeting_id_from_link, meeting_link};
pub use tracing::{TracingConfig, TracingError, TracingOutputFormat, init_tracing};
