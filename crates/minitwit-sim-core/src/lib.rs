// ABOUTME: Schema crate for the MiniTwit simulator API, free of any I/O.
// ABOUTME: Backend records, external wire records, inbound request validation, query parsing and translation.

pub mod model;
pub mod query;
pub mod request;
pub mod translate;

pub use model::{
    BackendFollowCommand, BackendNewTweet, BackendRegistration, BackendUser, ErrorBody,
    ExternalMessage, FollowsResponse, LatestResponse, Message,
};
pub use query::{DEFAULT_RESULT_COUNT, parse_latest, parse_result_count};
pub use request::{
    FollowAction, FollowBody, FollowRequest, RegistrationRequest, TweetBody, ValidationError,
    decode_body,
};
pub use translate::{translate, truncate_follows};
