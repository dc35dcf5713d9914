use std::collections::HashSet;
use std::sync::Arc;

use crate::api_methods::{ApiMethods, RequestError};
use crate::feed::{DetailView, Feed};
use crate::model::{fallback_posts, Comment, NewContent, Post, PostId};
use crate::notifier::interface::Notifier;
use crate::session::{Session, SessionError};
use crate::storage::interface::SessionStorage;

pub const PREVIEW_LIMIT: usize = 5;
pub const PREVIEW_CHARS: usize = 50;

const DELETE_CONFIRMATION: &str = "Are you sure you want to delete this post?";

/// Owns all client-side view state and applies the operations that keep it
/// in step with the backend. Local state only changes after the matching
/// request has succeeded.
pub struct App {
    api: ApiMethods,
    notifier: Arc<dyn Notifier>,
    session: Session,
    feed: Feed,
    detail: Option<DetailView>,
    search_query: String,
    loading: bool,
    // transient per-row liked flags of the feed view
    liked: HashSet<PostId>,
}

impl App {
    pub fn new(
        api: ApiMethods,
        storage: Box<dyn SessionStorage>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        App {
            api,
            notifier,
            session: Session::restore(storage),
            feed: Feed::default(),
            detail: None,
            search_query: String::new(),
            loading: false,
            liked: HashSet::new(),
        }
    }

    /// Initial load. The session was already restored in `new`.
    pub async fn launch(&mut self) {
        self.refresh_feed().await;
    }

    pub fn api(&self) -> &ApiMethods {
        &self.api
    }

    pub fn username(&self) -> Option<&str> {
        self.session.username()
    }

    pub fn needs_name_prompt(&self) -> bool {
        self.session.needs_name_prompt()
    }

    pub fn feed(&self) -> &Feed {
        &self.feed
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn set_search_query(&mut self, query: &str) {
        self.search_query = query.to_string();
    }

    /// Feed after applying the current search query.
    pub fn visible_posts(&self) -> Vec<&Post> {
        self.feed.filter(&self.search_query)
    }

    /// Sidebar preview: first few visible posts with shortened content.
    pub fn preview_posts(&self) -> Vec<(&Post, String)> {
        self.visible_posts()
            .into_iter()
            .take(PREVIEW_LIMIT)
            .map(|post| (post, preview_text(&post.content)))
            .collect()
    }

    pub fn can_modify(&self, post: &Post) -> bool {
        self.session
            .username()
            .map_or(false, |name| post.is_owned_by(name))
    }

    pub fn is_liked(&self, post_id: &str) -> bool {
        match &self.detail {
            Some(detail) if detail.shows(post_id) => detail.liked,
            _ => self.liked.contains(post_id),
        }
    }

    pub fn enter_name(&mut self, name: &str) -> bool {
        match self.session.set_username(name) {
            Ok(()) => {
                ::log::info!("session started for {}", name);
                true
            }
            Err(err) => {
                self.notifier.alert(&err.to_string());
                false
            }
        }
    }

    pub fn logout(&mut self) {
        ::log::info!("logging out");
        self.session.logout();
    }

    pub async fn refresh_feed(&mut self) {
        self.loading = true;

        match self.api.get_posts().await {
            Ok(posts) => {
                ::log::info!("loaded {} posts", posts.len());
                self.feed.replace(posts);
            }
            Err(err) => {
                ::log::error!("Error fetching posts: {}", err);
                self.feed.replace(fallback_posts());
            }
        }

        self.liked.clear();
        self.loading = false;
    }

    fn require_username(&self) -> Option<String> {
        let username = self.session.username().map(str::to_string);
        if username.is_none() {
            self.notifier.alert(&SessionError::EmptyName.to_string());
        }
        username
    }

    pub async fn create_post(&mut self, content: &str) -> Option<Post> {
        let username = self.require_username()?;
        if content.trim().is_empty() {
            self.notifier.alert("Post content cannot be empty");
            return None;
        }

        let body = NewContent {
            username,
            content: content.to_string(),
        };

        match self.api.post_post(&body).await {
            Ok(post) => {
                ::log::info!("created post {}", post.id);
                self.feed.prepend(post.clone());
                self.notifier.alert("Post created successfully!");

                self.refresh_feed().await;
                Some(post)
            }
            Err(err) => {
                ::log::error!("Error creating post: {}", err);
                self.notifier.alert(&format!(
                    "Failed to create post: {}",
                    err.server_message().unwrap_or("Failed to create post")
                ));
                None
            }
        }
    }

    /// Returns true if the post was removed.
    pub async fn delete_post(&mut self, post_id: &str) -> bool {
        if !self.notifier.confirm(DELETE_CONFIRMATION).await {
            return false;
        }

        match self.api.delete_post(post_id).await {
            Ok(()) => {
                ::log::info!("deleted post {}", post_id);
                self.feed.remove(post_id);
                self.liked.remove(post_id);
                if self.detail.as_ref().map_or(false, |d| d.shows(post_id)) {
                    self.detail = None;
                }

                self.notifier.alert("Post deleted successfully!");
                true
            }
            Err(err) => {
                ::log::error!("Error deleting post: {}", err);
                self.notifier.alert("Failed to delete post");
                false
            }
        }
    }

    /// There is no update endpoint, so an edit deletes the post and creates
    /// a new one. The id, timestamps, likes and comments of the old post are
    /// lost.
    pub async fn edit_post(
        &mut self,
        post_id: &str,
        content: &str,
    ) -> Option<Post> {
        if !self.delete_post(post_id).await {
            return None;
        }

        self.create_post(content).await
    }

    /// Opens the detail view. Falls back to the feed's copy of the post if
    /// the detail request fails.
    pub async fn select_post(&mut self, post_id: &str) -> bool {
        let summary = self.feed.get(post_id).cloned();
        let (post, comments) = ::futures::future::join(
            self.api.get_post(post_id),
            self.api.get_comments(post_id),
        )
        .await;

        let view = match post {
            Ok(post) => {
                let comments = comments.unwrap_or_else(|err| {
                    ::log::error!("Error fetching comments: {}", err);
                    Vec::new()
                });
                DetailView::new(post, comments)
            }
            Err(err) => {
                ::log::error!("Error fetching post details: {}", err);
                match summary {
                    Some(summary) => DetailView::new(summary, Vec::new()),
                    None => {
                        self.notifier.alert("Failed to load post");
                        return false;
                    }
                }
            }
        };

        self.detail = Some(view);
        self.liked.clear();
        true
    }

    pub fn back(&mut self) {
        self.detail = None;
        self.liked.clear();
    }

    fn apply_like_delta(&mut self, post_id: &str, delta: i64) {
        self.feed.add_likes(post_id, delta);
        if let Some(detail) = self.detail.as_mut().filter(|d| d.shows(post_id)) {
            detail.add_likes(delta);
        }
    }

    fn report_like_failure(&self, err: RequestError, message: &str) {
        match err {
            RequestError::Status { .. } => {
                ::log::warn!("{}: {}", message, err);
            }
            _ => {
                ::log::error!("{}: {}", message, err);
                self.notifier.alert(message);
            }
        }
    }

    /// Returns true if the backend accepted the like.
    pub async fn like(&mut self, post_id: &str) -> bool {
        let Some(username) = self.require_username() else {
            return false;
        };

        match self.api.post_like(post_id, &username).await {
            Ok(()) => {
                self.apply_like_delta(post_id, 1);
                true
            }
            Err(err) => {
                self.report_like_failure(err, "Failed to like post");
                false
            }
        }
    }

    /// Returns true if the backend accepted the unlike.
    pub async fn unlike(&mut self, post_id: &str) -> bool {
        let Some(username) = self.require_username() else {
            return false;
        };

        match self.api.delete_like(post_id, &username).await {
            Ok(()) => {
                self.apply_like_delta(post_id, -1);
                true
            }
            Err(err) => {
                self.report_like_failure(err, "Failed to unlike post");
                false
            }
        }
    }

    /// Likes or unlikes depending on the transient flag, then flips the flag
    /// whatever the request outcome was.
    pub async fn toggle_like(&mut self, post_id: &str) {
        let liked = self.is_liked(post_id);
        if liked {
            self.unlike(post_id).await;
        } else {
            self.like(post_id).await;
        }

        match self.detail.as_mut().filter(|d| d.shows(post_id)) {
            Some(detail) => detail.liked = !liked,
            None if liked => {
                self.liked.remove(post_id);
            }
            None => {
                self.liked.insert(post_id.to_string());
            }
        }
    }

    pub async fn add_comment(
        &mut self,
        post_id: &str,
        content: &str,
    ) -> Option<Comment> {
        let username = self.require_username()?;
        if content.trim().is_empty() {
            self.notifier.alert("Comment cannot be empty");
            return None;
        }

        let body = NewContent {
            username,
            content: content.to_string(),
        };

        match self.api.post_comment(post_id, &body).await {
            Ok(comment) => {
                ::log::info!("added comment {} to post {}", comment.id, post_id);
                if let Some(detail) =
                    self.detail.as_mut().filter(|d| d.shows(post_id))
                {
                    detail.push_comment(comment.clone());
                }
                self.feed.add_comments(post_id, 1);

                self.notifier.alert("Comment added successfully!");
                Some(comment)
            }
            Err(err) => {
                ::log::error!("Error adding comment: {}", err);
                self.notifier.alert("Failed to add comment");
                None
            }
        }
    }
}

pub fn preview_text(content: &str) -> String {
    if content.chars().count() > PREVIEW_CHARS {
        let head: String = content.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
