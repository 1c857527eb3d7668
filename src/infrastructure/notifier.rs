//! Notification delivery

use crate::domain::{EmailRequest, EmailResponse};
use crate::error::Result;
use async_trait::async_trait;

/// Delivers composed reminder emails.
///
/// Implemented by [`ApiClient`](crate::infrastructure::ApiClient); tests swap in
/// recording doubles.
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Deliver one email (POST /email/send)
    async fn send_email(&self, email: EmailRequest) -> Result<EmailResponse>;
}
