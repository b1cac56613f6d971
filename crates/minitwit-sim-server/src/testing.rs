// ABOUTME: Test utilities for minitwit-sim-server, including an in-memory stand-in for the backend.
// ABOUTME: Usable directly as a BackendClient or served over HTTP as an axum Router.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::http::Uri;
use chrono::{DateTime, Utc};
use http::{Method, StatusCode};
use minitwit_sim_core::{BackendNewTweet, Message};
use serde::Deserialize;

use crate::backend::{BackendClient, BackendError, BackendResponse};
use crate::config::BACKEND_BASE_PATH;

/// One call the fake received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
}

#[derive(Debug, Default)]
struct FakeUser {
    email: String,
    following: Vec<String>,
}

#[derive(Debug, Default)]
struct FakeState {
    users: BTreeMap<String, FakeUser>,
    /// Oldest first.
    messages: Vec<Message>,
    calls: Vec<RecordedCall>,
    overrides: HashMap<String, (StatusCode, Bytes)>,
    unreachable: bool,
    next_id: u64,
}

/// Minimal in-memory implementation of the backend endpoints this service
/// calls. Feeds are returned newest first and exclude flagged messages.
#[derive(Debug, Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTweetBody {
    username: String,
    tweet: String,
    insertion_date: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FollowCommandBody {
    current_username: String,
    target_username: String,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: register `username` up front.
    pub fn with_user(self, username: &str) -> Self {
        self.lock().users.insert(
            username.to_string(),
            FakeUser {
                email: format!("{username}@example.org"),
                following: Vec::new(),
            },
        );
        self
    }

    pub fn has_user(&self, username: &str) -> bool {
        self.lock().users.contains_key(username)
    }

    pub fn add_message(&self, username: &str, text: &str) {
        let tweet = BackendNewTweet::now(username.to_string(), text.to_string());
        let mut state = self.lock();
        state.insert_message(tweet.username, tweet.tweet, tweet.insertion_date.timestamp());
    }

    /// Flag the most recent message so feeds stop returning it.
    pub fn flag_latest_message(&self) {
        if let Some(msg) = self.lock().messages.last_mut() {
            msg.flagged = true;
        }
    }

    pub fn follow(&self, who: &str, whom: &str) {
        if let Some(user) = self.lock().users.get_mut(who) {
            if !user.following.iter().any(|f| f == whom) {
                user.following.push(whom.to_string());
            }
        }
    }

    pub fn following(&self, username: &str) -> Vec<String> {
        self.lock()
            .users
            .get(username)
            .map(|u| u.following.clone())
            .unwrap_or_default()
    }

    /// All stored messages, oldest first.
    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn message_count(&self) -> usize {
        self.lock().messages.len()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    /// Answer `path` with `status` and an empty body from now on.
    pub fn fail_path(&self, path: &str, status: StatusCode) {
        self.override_path(path, status, "");
    }

    /// Answer `path` with a fixed status and body from now on.
    pub fn override_path(&self, path: &str, status: StatusCode, body: &'static str) {
        self.lock()
            .overrides
            .insert(path.to_string(), (status, Bytes::from_static(body.as_bytes())));
    }

    /// Make every call fail as if the backend could not be reached.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.lock().unreachable = unreachable;
    }

    /// Serve the fake over HTTP under the backend base path, for tests that
    /// exercise the real reqwest client.
    pub fn into_router(self: Arc<Self>) -> Router {
        Router::new().fallback(move |method: Method, uri: Uri, body: Bytes| {
            let fake = Arc::clone(&self);
            async move {
                let path = uri
                    .path()
                    .strip_prefix(BACKEND_BASE_PATH)
                    .unwrap_or(uri.path())
                    .to_string();
                let resp = fake.handle(method, &path, &body);
                (resp.status, resp.body)
            }
        })
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Route one backend call.
    pub fn handle(&self, method: Method, path: &str, body: &[u8]) -> BackendResponse {
        let mut state = self.lock();
        state.calls.push(RecordedCall {
            method: method.clone(),
            path: path.to_string(),
        });

        if let Some((status, body)) = state.overrides.get(path) {
            return BackendResponse::new(*status, body.clone());
        }

        let segments: Vec<String> = path
            .trim_start_matches('/')
            .split('/')
            .map(|s| {
                urlencoding::decode(s)
                    .map(|d| d.into_owned())
                    .unwrap_or_else(|_| s.to_string())
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match (method, segments.as_slice()) {
            (Method::GET, ["user", "get-user", name]) => state.get_user(name),
            (Method::POST, ["user", "register"]) => state.register(body),
            (Method::GET, ["tweet", "get-all-tweets", n, "0"]) => state.all_tweets(n),
            (Method::GET, ["tweet", "get-user-tweets", name]) => state.user_tweets(name),
            (Method::POST, ["tweet", "add-tweet"]) => state.add_tweet(body),
            (Method::POST, ["user", "follow"]) => state.change_follow(body, true),
            (Method::POST, ["user", "unfollow"]) => state.change_follow(body, false),
            _ => status_only(StatusCode::NOT_FOUND),
        }
    }
}

#[async_trait]
impl BackendClient for FakeBackend {
    async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<BackendResponse, BackendError> {
        if self.lock().unreachable {
            return Err(BackendError::Transport("connection refused".to_string()));
        }
        Ok(self.handle(method, path, body.as_deref().unwrap_or_default()))
    }
}

fn status_only(status: StatusCode) -> BackendResponse {
    BackendResponse::new(status, Bytes::new())
}

fn json_response<T: serde::Serialize>(value: &T) -> BackendResponse {
    match serde_json::to_vec(value) {
        Ok(bytes) => BackendResponse::new(StatusCode::OK, bytes),
        Err(_) => status_only(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

impl FakeState {
    fn insert_message(&mut self, username: String, tweet: String, insertion_date: i64) {
        self.next_id += 1;
        self.messages.push(Message {
            id: format!("msg-{}", self.next_id),
            username,
            insertion_date,
            tweet,
            flagged: false,
        });
    }

    fn visible_newest_first<'a>(
        &'a self,
        author: Option<&'a str>,
    ) -> impl Iterator<Item = &'a Message> {
        self.messages
            .iter()
            .rev()
            .filter(|m| !m.flagged)
            .filter(move |m| author.is_none_or(|a| m.username == a))
    }

    fn get_user(&self, name: &str) -> BackendResponse {
        match self.users.get(name) {
            Some(user) => json_response(&serde_json::json!({
                "username": name,
                "email": user.email,
                "following": user.following,
            })),
            None => status_only(StatusCode::NOT_FOUND),
        }
    }

    fn register(&mut self, body: &[u8]) -> BackendResponse {
        let Ok(req) = serde_json::from_slice::<RegisterBody>(body) else {
            return status_only(StatusCode::BAD_REQUEST);
        };
        if req.username.is_empty() || self.users.contains_key(&req.username) {
            return status_only(StatusCode::BAD_REQUEST);
        }
        self.users.insert(
            req.username,
            FakeUser {
                email: req.email,
                following: Vec::new(),
            },
        );
        status_only(StatusCode::OK)
    }

    fn all_tweets(&self, n: &str) -> BackendResponse {
        let Ok(n) = n.parse::<usize>() else {
            return status_only(StatusCode::BAD_REQUEST);
        };
        let feed: Vec<&Message> = self.visible_newest_first(None).take(n).collect();
        json_response(&feed)
    }

    fn user_tweets(&self, name: &str) -> BackendResponse {
        if !self.users.contains_key(name) {
            return status_only(StatusCode::NOT_FOUND);
        }
        let feed: Vec<&Message> = self.visible_newest_first(Some(name)).collect();
        json_response(&feed)
    }

    fn add_tweet(&mut self, body: &[u8]) -> BackendResponse {
        let Ok(req) = serde_json::from_slice::<AddTweetBody>(body) else {
            return status_only(StatusCode::BAD_REQUEST);
        };
        if !self.users.contains_key(&req.username) {
            return status_only(StatusCode::NOT_FOUND);
        }
        self.insert_message(req.username, req.tweet, req.insertion_date.timestamp());
        status_only(StatusCode::OK)
    }

    fn change_follow(&mut self, body: &[u8], follow: bool) -> BackendResponse {
        let Ok(req) = serde_json::from_slice::<FollowCommandBody>(body) else {
            return status_only(StatusCode::BAD_REQUEST);
        };
        if !self.users.contains_key(&req.target_username) {
            return status_only(StatusCode::NOT_FOUND);
        }
        let Some(user) = self.users.get_mut(&req.current_username) else {
            return status_only(StatusCode::NOT_FOUND);
        };

        let already = user.following.iter().any(|f| *f == req.target_username);
        if follow && !already {
            user.following.push(req.target_username);
        } else if !follow {
            user.following.retain(|f| *f != req.target_username);
        }
        status_only(StatusCode::OK)
    }
}
