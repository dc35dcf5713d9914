use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::model::{ApiErrorBody, Comment, NewContent, Post};

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{name} failed with status code {status}")]
    Status {
        name: &'static str,
        status: StatusCode,
        body: Option<ApiErrorBody>,
    },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl RequestError {
    /// Message supplied by the backend in its error document, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            RequestError::Status {
                body: Some(body), ..
            } => body.message(),
            _ => None,
        }
    }
}

pub type Result<T> = ::std::result::Result<T, RequestError>;

/// Typed access to the social backend's REST surface.
#[derive(Clone)]
pub struct ApiMethods {
    user_agent: String,
    base_url: Url,
    client: Client,
}

impl ApiMethods {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(ApiMethods {
            user_agent: format!(
                "socialapp-client-{}",
                env!("CARGO_PKG_VERSION")
            ),
            base_url: Url::parse(base_url)?,
            client: Client::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn like_endpoint(&self, post_id: &str, username: &str) -> Result<Url> {
        let mut url = self.endpoint(&["posts", post_id, "like"])?;
        url.query_pairs_mut().append_pair("username", username);
        Ok(url)
    }

    fn request_builder(
        &self,
        method: reqwest::Method,
        url: Url,
    ) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("x-socialapp-user-agent", &self.user_agent)
    }

    async fn check_response(
        name: &'static str,
        response: Response,
    ) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ApiErrorBody>(&bytes).ok());

        ::log::debug!("{} returned {} with body {:?}", name, status, body);

        Err(RequestError::Status { name, status, body })
    }

    async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T> {
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub async fn get_health(&self) -> Result<StatusCode> {
        let url = self.endpoint(&["health"])?;
        let response =
            self.request_builder(reqwest::Method::GET, url).send().await?;

        Ok(Self::check_response("getHealth", response).await?.status())
    }

    pub async fn get_posts(&self) -> Result<Vec<Post>> {
        let url = self.endpoint(&["posts"])?;
        let response =
            self.request_builder(reqwest::Method::GET, url).send().await?;
        let response = Self::check_response("getPosts", response).await?;

        Self::parse_body(response).await
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Post> {
        let url = self.endpoint(&["posts", post_id])?;
        let response =
            self.request_builder(reqwest::Method::GET, url).send().await?;
        let response = Self::check_response("getPost", response).await?;

        Self::parse_body(response).await
    }

    pub async fn get_comments(&self, post_id: &str) -> Result<Vec<Comment>> {
        let url = self.endpoint(&["posts", post_id, "comments"])?;
        let response =
            self.request_builder(reqwest::Method::GET, url).send().await?;
        let response = Self::check_response("getComments", response).await?;

        Self::parse_body(response).await
    }

    pub async fn post_post(&self, body: &NewContent) -> Result<Post> {
        let url = self.endpoint(&["posts"])?;
        let response = self
            .request_builder(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response("postPost", response).await?;

        Self::parse_body(response).await
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        let url = self.endpoint(&["posts", post_id])?;
        let response = self
            .request_builder(reqwest::Method::DELETE, url)
            .send()
            .await?;

        Self::check_response("deletePost", response).await?;
        Ok(())
    }

    pub async fn post_like(&self, post_id: &str, username: &str) -> Result<()> {
        let url = self.like_endpoint(post_id, username)?;
        let response = self
            .request_builder(reqwest::Method::POST, url)
            .send()
            .await?;

        Self::check_response("postLike", response).await?;
        Ok(())
    }

    pub async fn delete_like(
        &self,
        post_id: &str,
        username: &str,
    ) -> Result<()> {
        let url = self.like_endpoint(post_id, username)?;
        let response = self
            .request_builder(reqwest::Method::DELETE, url)
            .send()
            .await?;

        Self::check_response("deleteLike", response).await?;
        Ok(())
    }

    pub async fn post_comment(
        &self,
        post_id: &str,
        body: &NewContent,
    ) -> Result<Comment> {
        let url = self.endpoint(&["posts", post_id, "comments"])?;
        let response = self
            .request_builder(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await?;
        let response = Self::check_response("postComment", response).await?;

        Self::parse_body(response).await
    }
}
