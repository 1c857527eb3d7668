//! Application layer - Use cases and orchestration

pub mod check_release;
pub mod manage_config;
pub mod send_reminder;

pub use check_release::{CheckReleaseService, ReleaseReport};
pub use manage_config::ConfigService;
pub use send_reminder::{
    ReminderOutcome, ReminderPlan, ReminderPreview, ReminderRequest, ReminderService,
    ScheduledReminder,
};
