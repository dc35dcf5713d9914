use crate::model::{Comment, Post};

/// Ordered feed of post summaries, newest first as delivered by the backend.
#[derive(Debug, Default, Clone)]
pub struct Feed {
    posts: Vec<Post>,
}

impl Feed {
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn get(&self, post_id: &str) -> Option<&Post> {
        self.posts.iter().find(|post| post.id == post_id)
    }

    pub fn replace(&mut self, posts: Vec<Post>) {
        self.posts = posts;
    }

    pub fn prepend(&mut self, post: Post) {
        self.posts.insert(0, post);
    }

    pub fn remove(&mut self, post_id: &str) -> Option<Post> {
        let index = self.posts.iter().position(|post| post.id == post_id)?;
        Some(self.posts.remove(index))
    }

    pub fn add_likes(&mut self, post_id: &str, delta: i64) {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
            post.add_likes(delta);
        }
    }

    pub fn add_comments(&mut self, post_id: &str, delta: i64) {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == post_id) {
            post.add_comments(delta);
        }
    }

    /// Case-insensitive substring match on content or username. An empty
    /// query returns the feed unchanged.
    pub fn filter(&self, query: &str) -> Vec<&Post> {
        filter_posts(&self.posts, query)
    }
}

pub fn filter_posts<'a>(posts: &'a [Post], query: &str) -> Vec<&'a Post> {
    if query.is_empty() {
        return posts.iter().collect();
    }

    let query = query.to_lowercase();
    posts
        .iter()
        .filter(|post| {
            post.content.to_lowercase().contains(&query)
                || post.username.to_lowercase().contains(&query)
        })
        .collect()
}

/// The selected post together with its comments. Holds its own copy of the
/// post, independent of the feed entry.
#[derive(Debug, Clone)]
pub struct DetailView {
    pub post: Post,
    pub comments: Vec<Comment>,
    /// Transient "liked by me" flag. Not read from the backend and reset
    /// whenever the view is rebuilt.
    pub liked: bool,
}

impl DetailView {
    pub fn new(post: Post, comments: Vec<Comment>) -> Self {
        DetailView {
            post,
            comments,
            liked: false,
        }
    }

    pub fn shows(&self, post_id: &str) -> bool {
        self.post.id == post_id
    }

    pub fn add_likes(&mut self, delta: i64) {
        self.post.add_likes(delta);
    }

    pub fn push_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
        self.post.add_comments(1);
    }
}
