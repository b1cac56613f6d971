// ABOUTME: Inbound request bodies accepted by the simulator endpoints and their validation.
// ABOUTME: Missing keys decode as empty strings; validation decides what is acceptable.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Reasons an inbound body is refused before any backend call is made.
/// The display text is what the client sees in `error_msg`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("You have to enter a username")]
    MissingUsername,

    #[error("You have to enter a valid email address")]
    InvalidEmail,

    #[error("You have to enter a password")]
    MissingPassword,

    #[error("You have to specify either follow or unfollow")]
    MissingFollowTarget,

    #[error("You can not follow and unfollow in the same request")]
    AmbiguousFollowTarget,

    #[error("Malformed request body")]
    MalformedBody,
}

/// `POST /register` body. The harness sends the password as `pwd`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "pwd", alias = "password")]
    pub password: String,
}

impl RegistrationRequest {
    /// Check the fields in contract order; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.username.is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        if self.password.is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        Ok(())
    }
}

/// `POST /msgs/{username}` body. The `username` key is accepted but the
/// path parameter is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TweetBody {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub content: String,
}

/// `POST /fllws/{username}` body, exactly one key expected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FollowBody {
    #[serde(default)]
    pub follow: Option<String>,
    #[serde(default)]
    pub unfollow: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    Follow,
    Unfollow,
}

impl FollowAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::Unfollow => "unfollow",
        }
    }
}

/// A validated follow or unfollow command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FollowRequest {
    pub current_username: String,
    pub target_username: String,
    pub action: FollowAction,
}

impl FollowBody {
    /// Resolve the body into a single command issued by `current_username`.
    /// Empty strings count as absent.
    pub fn into_request(self, current_username: &str) -> Result<FollowRequest, ValidationError> {
        let follow = self.follow.filter(|t| !t.is_empty());
        let unfollow = self.unfollow.filter(|t| !t.is_empty());

        let (target_username, action) = match (follow, unfollow) {
            (Some(target), None) => (target, FollowAction::Follow),
            (None, Some(target)) => (target, FollowAction::Unfollow),
            (Some(_), Some(_)) => return Err(ValidationError::AmbiguousFollowTarget),
            (None, None) => return Err(ValidationError::MissingFollowTarget),
        };

        Ok(FollowRequest {
            current_username: current_username.to_string(),
            target_username,
            action,
        })
    }
}

/// Decode a request body, treating an empty body as `T::default()`.
pub fn decode_body<T>(body: &[u8]) -> Result<T, ValidationError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|_| ValidationError::MalformedBody)
}
