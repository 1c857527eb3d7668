//! Release reminder use case
//!
//! Turns a reminder decision into an action: skip a past release, send right
//! away on release day, or arm a one-shot timer that sends at the configured
//! local time on the release day. Timers live only in this process.

use crate::domain::{
    compose_release_reminder, Clock, EmailRequest, EmailResponse, Movie, ReleaseDateInput,
    ReminderDecision, ReminderScheduler,
};
use crate::error::{EstreiaError, Result};
use crate::infrastructure::{ApiClient, NotificationSender};
use chrono::{DateTime, FixedOffset, NaiveDate};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};

/// What to do about a release date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReminderPlan {
    /// Release is today
    SendNow,
    /// Release is upcoming; wait this long
    Schedule(Duration),
    /// Release already happened
    Skip { days_ago: i64 },
}

impl ReminderPlan {
    pub fn from_decision(decision: &ReminderDecision, delay: Duration) -> Self {
        if !decision.should_send_reminder {
            ReminderPlan::Skip {
                days_ago: -decision.days_until_release,
            }
        } else if decision.is_today {
            ReminderPlan::SendNow
        } else {
            ReminderPlan::Schedule(delay)
        }
    }
}

/// Who to remind about which movie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub to: String,
    pub title: String,
    pub release_date: String,
    pub image_url: Option<String>,
}

impl ReminderRequest {
    pub fn for_movie(movie: &Movie, to: &str) -> Self {
        ReminderRequest {
            to: to.to_string(),
            title: movie.title.clone(),
            release_date: movie.release_date.clone(),
            image_url: movie.image().map(str::to_string),
        }
    }
}

/// What a reminder request would do, with the email it would send
#[derive(Debug, Clone, PartialEq)]
pub struct ReminderPreview {
    pub decision: ReminderDecision,
    pub plan: ReminderPlan,
    /// Set only for scheduled reminders
    pub fire_at: Option<DateTime<FixedOffset>>,
    /// None when the release already happened
    pub email: Option<EmailRequest>,
}

/// Handle to a pending one-shot reminder.
///
/// Dropping the handle leaves the timer running; call [`cancel`](Self::cancel)
/// to stop it.
#[derive(Debug)]
pub struct ScheduledReminder {
    fire_at: DateTime<FixedOffset>,
    delay: Duration,
    handle: JoinHandle<Result<EmailResponse>>,
}

impl ScheduledReminder {
    pub fn fire_at(&self) -> DateTime<FixedOffset> {
        self.fire_at
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Stop the timer; no email is sent if it has not fired yet
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Detached canceller, usable while [`wait`](Self::wait) holds the handle
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the timer. Returns None if it was cancelled.
    pub async fn wait(self) -> Result<Option<EmailResponse>> {
        match self.handle.await {
            Ok(result) => result.map(Some),
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => Err(EstreiaError::Reminder(format!(
                "Reminder task failed: {}",
                e
            ))),
        }
    }
}

/// Result of handling a reminder request
#[derive(Debug)]
pub enum ReminderOutcome {
    Sent(EmailResponse),
    Scheduled(ScheduledReminder),
    Skipped { days_ago: i64 },
}

/// Service for sending and scheduling release reminders
pub struct ReminderService<C: Clock, S: NotificationSender + ?Sized> {
    scheduler: ReminderScheduler<C>,
    sender: Arc<S>,
    templates_dir: Option<PathBuf>,
}

impl<C, S> ReminderService<C, S>
where
    C: Clock,
    S: NotificationSender + ?Sized + 'static,
{
    pub fn new(scheduler: ReminderScheduler<C>, sender: Arc<S>) -> Self {
        ReminderService {
            scheduler,
            sender,
            templates_dir: None,
        }
    }

    /// Render emails with templates from this directory when present
    pub fn with_templates_dir(mut self, templates_dir: Option<PathBuf>) -> Self {
        self.templates_dir = templates_dir;
        self
    }

    pub fn scheduler(&self) -> &ReminderScheduler<C> {
        &self.scheduler
    }

    /// Decide what would happen for a release date, without acting
    pub fn plan(&self, release_date: &str) -> Result<(ReminderDecision, ReminderPlan)> {
        let input = ReleaseDateInput::parse(release_date)?;
        let (decision, delay) = self.scheduler.evaluate(&input);
        Ok((decision, ReminderPlan::from_decision(&decision, delay)))
    }

    /// Work out the plan and compose the email without sending or scheduling
    pub fn preview(&self, request: &ReminderRequest) -> Result<ReminderPreview> {
        let input = ReleaseDateInput::parse(&request.release_date)?;
        let (decision, delay) = self.scheduler.evaluate(&input);
        let plan = ReminderPlan::from_decision(&decision, delay);

        let fire_at = matches!(plan, ReminderPlan::Schedule(_)).then(|| {
            self.scheduler
                .send_instant(decision.release_date)
                .fixed_offset()
        });
        let email = match plan {
            ReminderPlan::Skip { .. } => None,
            _ => Some(compose_release_reminder(
                &request.to,
                &request.title,
                decision.release_date,
                request.image_url.as_deref(),
                self.templates_dir.as_deref(),
            )?),
        };

        Ok(ReminderPreview {
            decision,
            plan,
            fire_at,
            email,
        })
    }

    /// Compose and send a reminder immediately
    pub async fn send_release_reminder(
        &self,
        to: &str,
        title: &str,
        release_date: NaiveDate,
        image_url: Option<&str>,
    ) -> Result<EmailResponse> {
        let email = compose_release_reminder(
            to,
            title,
            release_date,
            image_url,
            self.templates_dir.as_deref(),
        )?;
        tracing::info!(%to, %title, %release_date, "sending release reminder");
        self.sender.send_email(email).await
    }

    /// Skip, send now, or arm a timer, depending on the release date
    pub async fn schedule(&self, request: &ReminderRequest) -> Result<ReminderOutcome> {
        let input = ReleaseDateInput::parse(&request.release_date)?;
        let (decision, delay) = self.scheduler.evaluate(&input);

        match ReminderPlan::from_decision(&decision, delay) {
            ReminderPlan::Skip { days_ago } => {
                tracing::info!(title = %request.title, days_ago, "release already happened, no reminder");
                Ok(ReminderOutcome::Skipped { days_ago })
            }
            ReminderPlan::SendNow => {
                let response = self
                    .send_release_reminder(
                        &request.to,
                        &request.title,
                        decision.release_date,
                        request.image_url.as_deref(),
                    )
                    .await?;
                Ok(ReminderOutcome::Sent(response))
            }
            ReminderPlan::Schedule(delay) => {
                // Compose now so template problems surface before the wait
                let email = compose_release_reminder(
                    &request.to,
                    &request.title,
                    decision.release_date,
                    request.image_url.as_deref(),
                    self.templates_dir.as_deref(),
                )?;
                let fire_at = self
                    .scheduler
                    .send_instant(decision.release_date)
                    .fixed_offset();

                tracing::info!(
                    title = %request.title,
                    %fire_at,
                    delay_ms = delay.as_millis() as u64,
                    "reminder scheduled"
                );

                let sender = Arc::clone(&self.sender);
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(delay).await;
                    let result = sender.send_email(email).await;
                    if let Err(e) = &result {
                        tracing::warn!(error = %e, "scheduled reminder failed");
                    }
                    result
                });

                Ok(ReminderOutcome::Scheduled(ScheduledReminder {
                    fire_at,
                    delay,
                    handle,
                }))
            }
        }
    }

    /// Fetch a movie from the API and handle its reminder
    pub async fn remind_movie(&self, api: &ApiClient, id: u64, to: &str) -> Result<ReminderOutcome> {
        let movie = api.get_movie(id).await?;
        tracing::debug!(id, title = %movie.title, release_date = %movie.release_date, "movie loaded");
        self.schedule(&ReminderRequest::for_movie(&movie, to)).await
    }
}
