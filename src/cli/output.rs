//! Output formatting utilities

use crate::application::{ReleaseReport, ReminderOutcome, ReminderPlan, ReminderPreview};
use crate::infrastructure::Config;
use serde_json::json;

/// Format a release report for display
pub fn format_report(report: &ReleaseReport) -> String {
    let decision = &report.decision;
    let mut output = String::new();

    output.push_str(&format!(
        "Release date:  {} ({})\n",
        decision.release_date.format("%Y-%m-%d"),
        report.long_date
    ));
    output.push_str(&format!("Status:        {}\n", report.status()));
    output.push_str(&format!(
        "Days until:    {}\n",
        decision.days_until_release
    ));
    output.push_str(&format!(
        "Send today:    {}\n",
        if decision.is_today { "yes" } else { "no" }
    ));
    match report.send_at {
        Some(send_at) => output.push_str(&format!("Reminder at:   {}\n", send_at.to_rfc3339())),
        None => output.push_str("Reminder at:   -\n"),
    }
    output.push_str(&format!("Delay:         {} ms\n", report.delay.as_millis()));

    output
}

/// Format a release report as JSON
pub fn format_report_json(report: &ReleaseReport) -> String {
    let decision = &report.decision;
    json!({
        "input": report.input.to_string(),
        "releaseDate": decision.release_date.format("%Y-%m-%d").to_string(),
        "daysUntilRelease": decision.days_until_release,
        "isToday": decision.is_today,
        "shouldSendReminder": decision.should_send_reminder,
        "delayMs": report.delay.as_millis() as u64,
        "sendAt": report.send_at.map(|t| t.to_rfc3339()),
        "releaseDateLong": report.long_date,
    })
    .to_string()
}

/// Describe a reminder outcome that needs no further waiting
pub fn format_outcome(outcome: &ReminderOutcome) -> String {
    match outcome {
        ReminderOutcome::Sent(response) => {
            if response.message.is_empty() {
                "Reminder sent".to_string()
            } else {
                format!("Reminder sent: {}", response.message)
            }
        }
        ReminderOutcome::Scheduled(scheduled) => format!(
            "Reminder scheduled for {} (in {} ms)",
            scheduled.fire_at().to_rfc3339(),
            scheduled.delay().as_millis()
        ),
        ReminderOutcome::Skipped { days_ago } => format!(
            "Release was {} day{} ago, no reminder sent",
            days_ago,
            if *days_ago == 1 { "" } else { "s" }
        ),
    }
}

/// Describe a dry run: what would happen and the email that would go out
pub fn format_preview(preview: &ReminderPreview) -> String {
    let mut output = match (preview.plan, preview.fire_at) {
        (ReminderPlan::Schedule(delay), Some(fire_at)) => format!(
            "Would schedule reminder for {} (in {} ms)\n",
            fire_at.to_rfc3339(),
            delay.as_millis()
        ),
        (ReminderPlan::Skip { days_ago }, _) => {
            return format!("{}\n", format_outcome(&ReminderOutcome::Skipped { days_ago }));
        }
        _ => "Would send reminder now\n".to_string(),
    };

    if let Some(email) = &preview.email {
        output.push_str(&format!("To: {}\n", email.to));
        output.push_str(&format!("Subject: {}\n\n", email.subject));
        output.push_str(&email.text);
        if !email.text.ends_with('\n') {
            output.push('\n');
        }
    }
    output
}

/// Format config as key = value lines; unset values are omitted
pub fn format_config(config: &Config) -> String {
    let mut lines = vec![
        format!("api_base_url = {}", config.api_base_url),
        format!("api_timeout_ms = {}", config.api_timeout_ms),
    ];
    if config.api_token.is_some() {
        lines.push("api_token = ********".to_string());
    }
    if let Some(tz) = &config.timezone {
        lines.push(format!("timezone = {}", tz));
    }
    lines.push(format!("send_time = {}", config.send_time));
    if let Some(recipient) = &config.recipient {
        lines.push(format!("recipient = {}", recipient));
    }
    if let Some(dir) = &config.templates_dir {
        lines.push(format!("templates_dir = {}", dir.display()));
    }

    let mut output = lines.join("\n");
    output.push('\n');
    output
}
