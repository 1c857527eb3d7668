//! Check release date use case

use crate::domain::{
    format_date_to_portuguese, Clock, ReleaseDateInput, ReminderDecision, ReminderScheduler,
};
use crate::error::Result;
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// Everything known about a release date's reminder
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseReport {
    pub input: ReleaseDateInput,
    pub decision: ReminderDecision,
    pub delay: Duration,
    /// When a future reminder would fire; None when it is sent now or never
    pub send_at: Option<DateTime<FixedOffset>>,
    pub long_date: String,
}

impl ReleaseReport {
    /// Short status word for display
    pub fn status(&self) -> &'static str {
        if self.decision.is_today {
            "today"
        } else if self.decision.should_send_reminder {
            "upcoming"
        } else {
            "released"
        }
    }
}

/// Service for evaluating a release date
pub struct CheckReleaseService<'a, C: Clock> {
    scheduler: &'a ReminderScheduler<C>,
}

impl<'a, C: Clock> CheckReleaseService<'a, C> {
    pub fn new(scheduler: &'a ReminderScheduler<C>) -> Self {
        CheckReleaseService { scheduler }
    }

    pub fn execute(&self, release_date: &str) -> Result<ReleaseReport> {
        let input = ReleaseDateInput::parse(release_date)?;
        let (decision, delay) = self.scheduler.evaluate(&input);

        let send_at = (decision.should_send_reminder && !decision.is_today).then(|| {
            self.scheduler
                .send_instant(decision.release_date)
                .fixed_offset()
        });

        Ok(ReleaseReport {
            input,
            decision,
            delay,
            send_at,
            long_date: format_date_to_portuguese(decision.release_date),
        })
    }
}
