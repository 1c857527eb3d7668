//! Release reminder email composition

use crate::domain::template::{load_template, ReminderContext};
use crate::error::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Payload accepted by the API's email endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Reply from the API's email endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub success: bool,
}

/// Subject line of a release reminder
pub fn reminder_subject(title: &str) -> String {
    format!("🎬 Lembrete: {} estreia hoje!", title)
}

/// Build the reminder email for a movie released on `release_date`
pub fn compose_release_reminder(
    to: &str,
    title: &str,
    release_date: NaiveDate,
    image_url: Option<&str>,
    templates_dir: Option<&Path>,
) -> Result<EmailRequest> {
    let ctx = ReminderContext {
        title,
        release_date,
        image_url,
    };

    let html = load_template(templates_dir, "reminder.html")?.render(&ctx);
    let text = load_template(templates_dir, "reminder.txt")?.render(&ctx);

    Ok(EmailRequest {
        to: to.to_string(),
        subject: reminder_subject(title),
        html,
        text,
    })
}
