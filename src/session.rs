use crate::storage::interface::{SessionStorage, USERNAME_KEY};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Please enter your username!")]
    EmptyName,
}

/// Active display name, mirrored into durable storage.
pub struct Session {
    username: Option<String>,
    storage: Box<dyn SessionStorage>,
}

impl Session {
    /// Restores a previously saved name, if any.
    pub fn restore(storage: Box<dyn SessionStorage>) -> Self {
        let username = match storage.get_item(USERNAME_KEY) {
            Ok(Some(name)) if !name.is_empty() => Some(name),
            Ok(_) => None,
            Err(err) => {
                ::log::error!(
                    "failed to read session from {} storage: {:#}",
                    storage.get_name(),
                    err
                );
                None
            }
        };

        if let Some(name) = &username {
            ::log::info!("restored session for {}", name);
        }

        Session { username, storage }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn needs_name_prompt(&self) -> bool {
        self.username.is_none()
    }

    pub fn set_username(&mut self, name: &str) -> Result<(), SessionError> {
        if name.trim().is_empty() {
            return Err(SessionError::EmptyName);
        }

        if let Err(err) = self.storage.set_item(USERNAME_KEY, name) {
            ::log::error!("failed to persist session: {:#}", err);
        }

        self.username = Some(name.to_string());
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Err(err) = self.storage.remove_item(USERNAME_KEY) {
            ::log::error!("failed to clear persisted session: {:#}", err);
        }

        self.username = None;
    }
}
