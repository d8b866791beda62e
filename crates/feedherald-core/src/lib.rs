pub mod config;
pub mod error;
pub mod feed;
pub mod notify;
pub mod watcher;

pub use config::BotConfig;
pub use error::{Error, Result};
