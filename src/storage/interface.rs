use ::anyhow::Result;

/// Key the display name is stored under.
pub const USERNAME_KEY: &str = "socialMediaUser";

/// Durable key/value storage for the session.
pub trait SessionStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
    fn get_name(&self) -> &str;
}
