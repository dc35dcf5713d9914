use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

pub type PostId = String;
pub type CommentId = String;

/// Post summary as listed in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub username: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub likes_count: u64,
    #[serde(default)]
    pub comments_count: u64,
}

impl Post {
    /// Edit and delete controls are only offered to the author. This is a
    /// display rule, the backend does not check it.
    pub fn is_owned_by(&self, username: &str) -> bool {
        !username.is_empty() && self.username == username
    }

    pub(crate) fn add_likes(&mut self, delta: i64) {
        self.likes_count = apply_delta(self.likes_count, delta);
    }

    pub(crate) fn add_comments(&mut self, delta: i64) {
        self.comments_count = apply_delta(self.comments_count, delta);
    }
}

fn apply_delta(value: u64, delta: i64) -> u64 {
    if delta >= 0 {
        value.saturating_add(delta.unsigned_abs())
    } else {
        value.saturating_sub(delta.unsigned_abs())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<PostId>,
    pub username: String,
    pub content: String,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body shared by post and comment creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewContent {
    pub username: String,
    pub content: String,
}

/// Error document returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Vec<String>>,
}

impl ApiErrorBody {
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|message| !message.is_empty())
    }
}

/// Accepts RFC 3339 as well as the zone-less ISO-8601 form the reference
/// backend writes. Zone-less values are read as UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_timestamp<'de, D>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;

    parse_timestamp(&s).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid timestamp: {}", s))
    })
}

fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse_timestamp(&s).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp: {}", s))
        }),
        None => Ok(None),
    }
}

fn sample_post(
    id: &str,
    username: &str,
    content: &str,
    timestamp: &str,
    likes_count: u64,
    comments_count: u64,
) -> Post {
    let at = parse_timestamp(timestamp).unwrap_or_default();

    Post {
        id: id.to_string(),
        username: username.to_string(),
        content: content.to_string(),
        created_at: at,
        updated_at: at,
        likes_count,
        comments_count,
    }
}

/// Feed shown when the backend cannot be reached.
pub fn fallback_posts() -> Vec<Post> {
    vec![
        sample_post(
            "1",
            "john_doe",
            "Hello everyone! Just joined this awesome platform!",
            "2024-01-15T10:30:00Z",
            15,
            3,
        ),
        sample_post(
            "2",
            "jane_smith",
            "Working on my new React project. So excited!",
            "2024-01-14T14:20:00Z",
            28,
            5,
        ),
        sample_post(
            "3",
            "alex_wong",
            "Just deployed my first full-stack application!",
            "2024-01-13T09:15:00Z",
            42,
            7,
        ),
    ]
}
