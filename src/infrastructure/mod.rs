//! Infrastructure layer - External I/O, configuration and delivery

pub mod api;
pub mod config;
pub mod notifier;

pub use api::ApiClient;
pub use config::Config;
pub use notifier::NotificationSender;
