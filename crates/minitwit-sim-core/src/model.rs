// ABOUTME: Record types exchanged with the backend and with simulator clients.
// ABOUTME: Backend records use the backend's camelCase keys; wire records use the compliance contract's keys.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A message as the backend stores and returns it.
///
/// Built from a backend response and thrown away once translated; this layer
/// never owns messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default, deserialize_with = "opaque_id")]
    pub id: String,
    pub username: String,
    /// Epoch value in whatever unit the backend uses. Passed through untouched.
    pub insertion_date: i64,
    pub tweet: String,
    #[serde(default)]
    pub flagged: bool,
}

/// A message in the shape the simulator contract expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalMessage {
    pub content: String,
    pub pub_date: String,
    pub username: String,
}

impl From<&Message> for ExternalMessage {
    fn from(msg: &Message) -> Self {
        Self {
            content: msg.tweet.clone(),
            pub_date: msg.insertion_date.to_string(),
            username: msg.username.clone(),
        }
    }
}

/// The subset of the backend's user record this layer reads. Everything
/// else the backend sends is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BackendUser {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub following: Vec<String>,
}

/// Body of `POST /user/register` on the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendRegistration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

/// Body of `POST /tweet/add-tweet` on the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendNewTweet {
    pub username: String,
    pub tweet: String,
    pub insertion_date: DateTime<Utc>,
}

impl BackendNewTweet {
    /// Stamp a new tweet with the current UTC time.
    pub fn now(username: String, tweet: String) -> Self {
        Self {
            username,
            tweet,
            insertion_date: Utc::now(),
        }
    }
}

/// Body of `POST /user/follow` and `POST /user/unfollow` on the backend.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendFollowCommand {
    pub current_username: String,
    pub target_username: String,
}

/// `GET /latest` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestResponse {
    pub latest: i64,
}

/// `GET /fllws/{username}` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowsResponse {
    pub follows: Vec<String>,
}

/// Error payload shared by every non-empty error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: u16,
    pub error_msg: String,
}

impl ErrorBody {
    pub fn new(status: u16, error_msg: impl Into<String>) -> Self {
        Self {
            status,
            error_msg: error_msg.into(),
        }
    }
}

/// Accept the backend's identifier whether it arrives as a string or a number.
fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
