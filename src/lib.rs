pub mod api_methods;
pub mod app;
pub mod config;
pub mod feed;
pub mod health;
pub mod model;
pub mod notifier;
pub mod session;
pub mod storage;

pub use api_methods::{ApiMethods, RequestError};
pub use app::App;
pub use model::{Comment, Post};
