#![allow(dead_code)]

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reply::Response;
use warp::{Filter, Reply};

use socialapp_client::api_methods::ApiMethods;
use socialapp_client::app::App;
use socialapp_client::model::{Comment, NewContent, Post};
use socialapp_client::notifier::recording::RecordingNotifier;
use socialapp_client::storage::interface::SessionStorage;
use socialapp_client::storage::memory::MemoryStorage;

/// Base url nothing listens on.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

pub const MAX_CONTENT_CHARS: usize = 2000;

/// How `GET /posts` answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Listing {
    #[default]
    Normal,
    ServerError,
    Malformed,
}

/// In-memory stand-in for the social backend.
#[derive(Default)]
pub struct BackendState {
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub likes: HashSet<(String, String)>,
    pub requests: Vec<String>,
    pub healthy: bool,
    pub listing: Listing,
    next_id: u64,
}

impl BackendState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }

    fn post_mut(&mut self, post_id: &str) -> Option<&mut Post> {
        self.posts.iter_mut().find(|post| post.id == post_id)
    }
}

pub type SharedState = Arc<Mutex<BackendState>>;

#[derive(Deserialize)]
struct LikeQuery {
    username: String,
}

fn error_reply(status: StatusCode, code: &str, message: &str) -> Response {
    warp::reply::with_status(
        warp::reply::json(&json!({ "error": code, "message": message })),
        status,
    )
    .into_response()
}

fn json_reply<T: Serialize>(value: &T) -> Response {
    warp::reply::json(value).into_response()
}

fn not_found() -> Response {
    error_reply(StatusCode::NOT_FOUND, "NOT_FOUND", "Post not found")
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: SharedState,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: SharedState = Arc::new(Mutex::new(BackendState {
            healthy: true,
            ..Default::default()
        }));

        let with_state = {
            let state = state.clone();
            warp::any().map(move || state.clone())
        };

        let record = {
            let state = state.clone();
            warp::method()
                .and(warp::path::full())
                .map(move |method: Method, path: FullPath| {
                    state
                        .lock()
                        .unwrap()
                        .requests
                        .push(format!("{} {}", method, path.as_str()));
                })
                .untuple_one()
        };

        let health = warp::path!("health")
            .and(warp::get())
            .and(with_state.clone())
            .map(|state: SharedState| {
                if state.lock().unwrap().healthy {
                    json_reply(&json!({ "status": "healthy" }))
                } else {
                    error_reply(
                        StatusCode::SERVICE_UNAVAILABLE,
                        "UNAVAILABLE",
                        "down for maintenance",
                    )
                }
            });

        let list_posts = warp::path!("posts")
            .and(warp::get())
            .and(with_state.clone())
            .map(|state: SharedState| {
                let state = state.lock().unwrap();
                match state.listing {
                    Listing::Normal => json_reply(&state.posts),
                    Listing::ServerError => error_reply(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "database unavailable",
                    ),
                    Listing::Malformed => warp::reply::with_header(
                        "[{\"id\": ",
                        "content-type",
                        "application/json",
                    )
                    .into_response(),
                }
            });

        let create_post = warp::path!("posts")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|body: NewContent, state: SharedState| {
                if body.content.trim().is_empty() {
                    return error_reply(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "content must not be empty",
                    );
                }
                if body.content.chars().count() > MAX_CONTENT_CHARS {
                    return error_reply(
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "content must be at most 2000 characters",
                    );
                }

                let mut state = state.lock().unwrap();
                let now = Utc::now();
                let post = Post {
                    id: state.next_id("post"),
                    username: body.username,
                    content: body.content,
                    created_at: now,
                    updated_at: now,
                    likes_count: 0,
                    comments_count: 0,
                };
                state.posts.insert(0, post.clone());
                json_reply(&post)
            });

        let get_post = warp::path!("posts" / String)
            .and(warp::get())
            .and(with_state.clone())
            .map(|post_id: String, state: SharedState| {
                let state = state.lock().unwrap();
                match state.posts.iter().find(|post| post.id == post_id) {
                    Some(post) => json_reply(post),
                    None => not_found(),
                }
            });

        let delete_post = warp::path!("posts" / String)
            .and(warp::delete())
            .and(with_state.clone())
            .map(|post_id: String, state: SharedState| {
                let mut state = state.lock().unwrap();
                let before = state.posts.len();
                state.posts.retain(|post| post.id != post_id);
                if state.posts.len() == before {
                    return not_found();
                }

                state
                    .comments
                    .retain(|c| c.post_id.as_deref() != Some(post_id.as_str()));
                state.likes.retain(|(id, _)| *id != post_id);
                json_reply(&json!({ "message": "Post deleted successfully" }))
            });

        let list_comments = warp::path!("posts" / String / "comments")
            .and(warp::get())
            .and(with_state.clone())
            .map(|post_id: String, state: SharedState| {
                let state = state.lock().unwrap();
                if !state.posts.iter().any(|post| post.id == post_id) {
                    return not_found();
                }

                let comments: Vec<&Comment> = state
                    .comments
                    .iter()
                    .filter(|c| c.post_id.as_deref() == Some(post_id.as_str()))
                    .collect();
                json_reply(&comments)
            });

        let create_comment = warp::path!("posts" / String / "comments")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|post_id: String, body: NewContent, state: SharedState| {
                let mut state = state.lock().unwrap();
                let now = Utc::now();
                match state.post_mut(&post_id) {
                    Some(post) => {
                        post.comments_count += 1;
                        post.updated_at = now;
                    }
                    None => return not_found(),
                }

                let comment = Comment {
                    id: state.next_id("comment"),
                    post_id: Some(post_id),
                    username: body.username,
                    content: body.content,
                    created_at: now,
                    updated_at: Some(now),
                };
                state.comments.insert(0, comment.clone());
                json_reply(&comment)
            });

        let like = warp::path!("posts" / String / "like")
            .and(warp::post())
            .and(warp::query::<LikeQuery>())
            .and(with_state.clone())
            .map(|post_id: String, query: LikeQuery, state: SharedState| {
                let mut state = state.lock().unwrap();
                if state.post_mut(&post_id).is_none() {
                    return not_found();
                }
                if !state.likes.insert((post_id.clone(), query.username)) {
                    return error_reply(
                        StatusCode::BAD_REQUEST,
                        "BAD_REQUEST",
                        "Already liked this post",
                    );
                }

                if let Some(post) = state.post_mut(&post_id) {
                    post.likes_count += 1;
                }
                json_reply(&json!({ "message": "Post liked successfully" }))
            });

        let unlike = warp::path!("posts" / String / "like")
            .and(warp::delete())
            .and(warp::query::<LikeQuery>())
            .and(with_state.clone())
            .map(|post_id: String, query: LikeQuery, state: SharedState| {
                let mut state = state.lock().unwrap();
                if !state.likes.remove(&(post_id.clone(), query.username)) {
                    return error_reply(
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        "Like not found",
                    );
                }

                if let Some(post) = state.post_mut(&post_id) {
                    post.likes_count = post.likes_count.saturating_sub(1);
                }
                json_reply(&json!({ "message": "Post unliked successfully" }))
            });

        let api = health
            .or(list_posts)
            .unify()
            .or(create_post)
            .unify()
            .or(get_post)
            .unify()
            .or(delete_post)
            .unify()
            .or(list_comments)
            .unify()
            .or(create_comment)
            .unify()
            .or(like)
            .unify()
            .or(unlike)
            .unify();

        let (addr, server) =
            warp::serve(record.and(api)).bind_ephemeral(([127, 0, 0, 1], 0));
        tokio::spawn(server);

        FakeBackend {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Inserts a post directly, as if another client had created it.
    pub fn seed_post(&self, username: &str, content: &str, likes: u64) -> Post {
        let mut state = self.state.lock().unwrap();
        let now = Utc::now();
        let post = Post {
            id: state.next_id("post"),
            username: username.to_string(),
            content: content.to_string(),
            created_at: now,
            updated_at: now,
            likes_count: likes,
            comments_count: 0,
        };
        state.posts.insert(0, post.clone());
        post
    }

    pub fn post(&self, post_id: &str) -> Option<Post> {
        let state = self.state.lock().unwrap();
        state.posts.iter().find(|post| post.id == post_id).cloned()
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unwrap().healthy = healthy;
    }

    pub fn set_listing(&self, listing: Listing) {
        self.state.lock().unwrap().listing = listing;
    }

    pub fn api(&self) -> ApiMethods {
        ApiMethods::new(&self.base_url).unwrap()
    }
}

pub struct TestApp {
    pub app: App,
    pub notifier: RecordingNotifier,
    pub storage: MemoryStorage,
}

impl TestApp {
    /// Launched app with `username` already entered.
    pub async fn new(base_url: &str, username: Option<&str>) -> Self {
        Self::with_confirm(base_url, username, true).await
    }

    pub async fn with_confirm(
        base_url: &str,
        username: Option<&str>,
        confirm: bool,
    ) -> Self {
        let storage = MemoryStorage::new();
        let notifier = RecordingNotifier::new(confirm);
        let mut app = App::new(
            ApiMethods::new(base_url).unwrap(),
            Box::new(storage.clone()) as Box<dyn SessionStorage>,
            Arc::new(notifier.clone()),
        );

        app.launch().await;
        if let Some(name) = username {
            assert!(app.enter_name(name));
        }

        TestApp {
            app,
            notifier,
            storage,
        }
    }
}

pub fn temp_session_file() -> PathBuf {
    std::env::temp_dir()
        .join(format!("socialapp-session-{}.json", uuid::Uuid::new_v4()))
}
