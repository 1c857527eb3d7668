//! Release reminder decisions and scheduling delays
//!
//! Every computation reads "now" once from the injected [`Clock`] and works on
//! calendar days in the clock's zone, so a release date never shifts by a day
//! because of the UTC offset it is evaluated in.

use crate::domain::clock::Clock;
use crate::domain::release_date::ReleaseDateInput;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use serde::Serialize;
use std::time::Duration;

/// Outcome of evaluating a release date against today
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDecision {
    /// Release date as a local calendar day
    pub release_date: NaiveDate,
    /// Whole days from today to the release; negative once it has passed
    pub days_until_release: i64,
    /// The release is today
    pub is_today: bool,
    /// The release is today or later
    pub should_send_reminder: bool,
}

impl ReminderDecision {
    fn new(release_date: NaiveDate, today: NaiveDate) -> Self {
        let days_until_release = release_date.signed_duration_since(today).num_days();
        ReminderDecision {
            release_date,
            days_until_release,
            is_today: days_until_release == 0,
            should_send_reminder: days_until_release >= 0,
        }
    }
}

/// Default local time at which future reminders fire (09:00)
pub fn default_send_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

/// Evaluates release dates against a clock
#[derive(Debug, Clone)]
pub struct ReminderScheduler<C: Clock> {
    clock: C,
    send_time: NaiveTime,
}

impl<C: Clock> ReminderScheduler<C> {
    /// Create a scheduler firing at the default send time
    pub fn new(clock: C) -> Self {
        ReminderScheduler {
            clock,
            send_time: default_send_time(),
        }
    }

    /// Use a different local send time for future reminders
    pub fn with_send_time(mut self, send_time: NaiveTime) -> Self {
        self.send_time = send_time;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn send_time(&self) -> NaiveTime {
        self.send_time
    }

    /// Decide reminder eligibility for an already parsed release date
    pub fn decide(&self, input: &ReleaseDateInput) -> ReminderDecision {
        let now = self.clock.now();
        Self::decide_at(input, &now)
    }

    fn decide_at(input: &ReleaseDateInput, now: &DateTime<C::Tz>) -> ReminderDecision {
        let release_date = input.local_date(&now.timezone());
        ReminderDecision::new(release_date, now.date_naive())
    }

    /// Parse `release_date` and decide reminder eligibility
    pub fn compute_reminder_decision(&self, release_date: &str) -> Result<ReminderDecision> {
        let input = ReleaseDateInput::parse(release_date)?;
        Ok(self.decide(&input))
    }

    /// True only when the release is today
    pub fn should_send_reminder_today(&self, release_date: &str) -> Result<bool> {
        Ok(self.compute_reminder_decision(release_date)?.is_today)
    }

    /// True when the release is today or later
    pub fn is_future_release(&self, release_date: &str) -> Result<bool> {
        Ok(self.compute_reminder_decision(release_date)?.should_send_reminder)
    }

    /// Time to wait before sending the reminder.
    ///
    /// Zero when the release already passed or is today (send right away);
    /// otherwise the span from now until the send time on the release day.
    pub fn calculate_reminder_delay(&self, release_date: &str) -> Result<Duration> {
        let input = ReleaseDateInput::parse(release_date)?;
        Ok(self.delay_for(&input))
    }

    /// Delay for an already parsed release date
    pub fn delay_for(&self, input: &ReleaseDateInput) -> Duration {
        self.evaluate(input).1
    }

    /// Decision and delay, both taken from a single reading of the clock
    pub fn evaluate(&self, input: &ReleaseDateInput) -> (ReminderDecision, Duration) {
        let now = self.clock.now();
        let decision = Self::decide_at(input, &now);

        if !decision.should_send_reminder || decision.is_today {
            return (decision, Duration::ZERO);
        }

        let delay = self
            .send_instant(decision.release_date)
            .signed_duration_since(now)
            .to_std()
            .unwrap_or(Duration::ZERO);
        (decision, delay)
    }

    /// Instant of the send time on `date` in the clock's zone
    pub fn send_instant(&self, date: NaiveDate) -> DateTime<C::Tz> {
        resolve_local(&self.clock.timezone(), date.and_time(self.send_time))
    }
}

/// Map a local wall-clock time to an instant.
///
/// Ambiguous times (clocks turned back) take the earlier instant; times inside
/// a gap (clocks turned forward) move to the first valid quarter hour after it.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    (0..=96)
        .map(|step| naive + chrono::Duration::minutes(15 * step))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::{FixedClock, SteppingClock};
    use chrono::{Duration as ChronoDuration, FixedOffset, Timelike, Utc};
    use chrono_tz::Tz;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Scheduler frozen at 2025-06-10 14:30 in the given zone
    fn scheduler_in(tz: Tz) -> ReminderScheduler<FixedClock<Tz>> {
        let now = tz.with_ymd_and_hms(2025, 6, 10, 14, 30, 0).unwrap();
        ReminderScheduler::new(FixedClock::new(now))
    }

    fn sao_paulo() -> ReminderScheduler<FixedClock<Tz>> {
        scheduler_in(chrono_tz::America::Sao_Paulo)
    }

    #[test]
    fn test_release_today() {
        let scheduler = sao_paulo();
        let decision = scheduler.compute_reminder_decision("2025-06-10").unwrap();

        assert_eq!(decision.release_date, ymd(2025, 6, 10));
        assert_eq!(decision.days_until_release, 0);
        assert!(decision.is_today);
        assert!(decision.should_send_reminder);
        assert!(scheduler.should_send_reminder_today("2025-06-10").unwrap());
        assert_eq!(
            scheduler.calculate_reminder_delay("2025-06-10").unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_release_tomorrow() {
        let scheduler = sao_paulo();
        let decision = scheduler.compute_reminder_decision("2025-06-11").unwrap();

        assert_eq!(decision.days_until_release, 1);
        assert!(!decision.is_today);
        assert!(decision.should_send_reminder);
        assert!(scheduler.is_future_release("2025-06-11").unwrap());
        assert!(!scheduler.should_send_reminder_today("2025-06-11").unwrap());

        // 14:30 today -> 09:00 tomorrow
        let delay = scheduler.calculate_reminder_delay("2025-06-11").unwrap();
        assert_eq!(delay, Duration::from_secs((18 * 60 + 30) * 60));
    }

    #[test]
    fn test_release_in_past() {
        let scheduler = sao_paulo();
        let decision = scheduler.compute_reminder_decision("2025-01-01").unwrap();

        assert!(decision.days_until_release < 0);
        assert!(!decision.is_today);
        assert!(!decision.should_send_reminder);
        assert!(!scheduler.is_future_release("2025-01-01").unwrap());
        assert_eq!(
            scheduler.calculate_reminder_delay("2025-01-01").unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_yesterday_is_past() {
        let scheduler = sao_paulo();
        let decision = scheduler.compute_reminder_decision("2025-06-09").unwrap();
        assert_eq!(decision.days_until_release, -1);
        assert!(!decision.should_send_reminder);
    }

    #[test]
    fn test_days_until_release_counts_whole_days() {
        let scheduler = sao_paulo();
        let days = |s: &str| {
            scheduler
                .compute_reminder_decision(s)
                .unwrap()
                .days_until_release
        };
        assert_eq!(days("2025-06-11"), 1);
        assert_eq!(days("2025-06-12"), 2);
        assert_eq!(days("2025-07-10"), 30);
        assert_eq!(days("2026-06-10"), 365);
    }

    #[test]
    fn test_future_delay_lands_on_send_time() {
        let scheduler = sao_paulo();
        let now = scheduler.clock().now();

        for date in ["2025-06-11", "2025-06-30", "2025-12-25", "2026-02-28"] {
            let delay = scheduler.calculate_reminder_delay(date).unwrap();
            assert!(delay > Duration::ZERO, "delay for {} should be positive", date);

            let fire = now + ChronoDuration::from_std(delay).unwrap();
            let expected: NaiveDate = date.parse().unwrap();
            assert_eq!(fire.date_naive(), expected);
            assert_eq!((fire.hour(), fire.minute(), fire.second()), (9, 0, 0));
        }
    }

    #[test]
    fn test_calendar_date_is_zone_independent() {
        let zones = [
            chrono_tz::Pacific::Kiritimati,
            chrono_tz::Asia::Tokyo,
            chrono_tz::UTC,
            chrono_tz::America::Sao_Paulo,
            chrono_tz::Pacific::Pago_Pago,
        ];
        for tz in zones {
            let decision = scheduler_in(tz)
                .compute_reminder_decision("2025-12-25")
                .unwrap();
            assert_eq!(decision.release_date, ymd(2025, 12, 25), "zone {}", tz);
        }
    }

    #[test]
    fn test_near_midnight_no_day_shift() {
        // 23:59 local; UTC has already rolled into the next day
        let tz = chrono_tz::America::Sao_Paulo;
        let now = tz.with_ymd_and_hms(2025, 6, 10, 23, 59, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now));

        let decision = scheduler.compute_reminder_decision("2025-06-10").unwrap();
        assert!(decision.is_today);

        let next = scheduler.compute_reminder_decision("2025-06-11").unwrap();
        assert_eq!(next.days_until_release, 1);

        // Just after local midnight, yesterday is past
        let now = tz.with_ymd_and_hms(2025, 6, 11, 0, 1, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now));
        let decision = scheduler.compute_reminder_decision("2025-06-10").unwrap();
        assert!(!decision.should_send_reminder);
    }

    #[test]
    fn test_instant_input_uses_local_day() {
        // 2025-06-11T02:00Z is still June 10 in São Paulo
        let scheduler = sao_paulo();
        let decision = scheduler
            .compute_reminder_decision("2025-06-11T02:00:00.000Z")
            .unwrap();
        assert_eq!(decision.release_date, ymd(2025, 6, 10));
        assert!(decision.is_today);
        assert_eq!(
            scheduler
                .calculate_reminder_delay("2025-06-11T02:00:00.000Z")
                .unwrap(),
            Duration::ZERO
        );
    }

    #[test]
    fn test_instant_input_future_fires_at_local_send_time() {
        let scheduler = sao_paulo();
        let decision = scheduler
            .compute_reminder_decision("2025-12-25T00:00:00.000Z")
            .unwrap();
        // Midnight UTC on Christmas is the evening of the 24th locally
        assert_eq!(decision.release_date, ymd(2025, 12, 24));
        assert!(decision.should_send_reminder);

        let fire = scheduler.send_instant(decision.release_date);
        assert_eq!(fire.date_naive(), ymd(2025, 12, 24));
        assert_eq!(fire.hour(), 9);
    }

    #[test]
    fn test_local_date_time_input() {
        let scheduler = sao_paulo();
        let decision = scheduler
            .compute_reminder_decision("2025-06-12T23:30:00")
            .unwrap();
        assert_eq!(decision.release_date, ymd(2025, 6, 12));
        assert_eq!(decision.days_until_release, 2);
    }

    #[test]
    fn test_invalid_input_is_an_error() {
        let scheduler = sao_paulo();
        assert!(scheduler.compute_reminder_decision("").is_err());
        assert!(scheduler.compute_reminder_decision("abc").is_err());
        assert!(scheduler.should_send_reminder_today("2025-13-01").is_err());
        assert!(scheduler.is_future_release("soon").is_err());
        assert!(scheduler.calculate_reminder_delay("").is_err());
    }

    #[test]
    fn test_repeated_decisions_are_identical() {
        let scheduler = sao_paulo();
        let first = scheduler.compute_reminder_decision("2025-08-01").unwrap();
        let second = scheduler.compute_reminder_decision("2025-08-01").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_reads_clock_once_across_midnight() {
        let tz = chrono_tz::America::Sao_Paulo;
        let clock = SteppingClock::new(vec![
            tz.with_ymd_and_hms(2025, 6, 10, 23, 59, 59).unwrap(),
            tz.with_ymd_and_hms(2025, 6, 11, 0, 0, 1).unwrap(),
        ]);
        let scheduler = ReminderScheduler::new(&clock);
        let input = ReleaseDateInput::parse("2025-06-11").unwrap();

        let (decision, delay) = scheduler.evaluate(&input);
        assert_eq!(clock.reads(), 1);
        assert_eq!(decision.days_until_release, 1);
        // 23:59:59 -> 09:00 the next day
        assert_eq!(delay, Duration::from_secs(9 * 3600 + 1));
    }

    #[test]
    fn test_custom_send_time() {
        let scheduler = sao_paulo().with_send_time(NaiveTime::from_hms_opt(18, 0, 0).unwrap());
        assert_eq!(scheduler.send_time().hour(), 18);

        // 14:30 today -> 18:00 tomorrow
        let delay = scheduler.calculate_reminder_delay("2025-06-11").unwrap();
        assert_eq!(delay, Duration::from_secs((27 * 60 + 30) * 60));
    }

    #[test]
    fn test_delay_across_dst_start() {
        // New York springs forward on 2025-03-09; that day is 23 hours long
        let tz = chrono_tz::America::New_York;
        let now = tz.with_ymd_and_hms(2025, 3, 8, 9, 0, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now));

        let delay = scheduler.calculate_reminder_delay("2025-03-09").unwrap();
        assert_eq!(delay, Duration::from_secs(23 * 3600));
    }

    #[test]
    fn test_send_time_inside_dst_gap_moves_forward() {
        let tz = chrono_tz::America::New_York;
        let now = tz.with_ymd_and_hms(2025, 3, 8, 12, 0, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now))
            .with_send_time(NaiveTime::from_hms_opt(2, 30, 0).unwrap());

        // 02:30 does not exist on 2025-03-09; first valid quarter hour is 03:00
        let fire = scheduler.send_instant(ymd(2025, 3, 9));
        assert_eq!((fire.hour(), fire.minute()), (3, 0));
    }

    #[test]
    fn test_send_time_ambiguous_takes_earliest() {
        // New York falls back on 2025-11-02; 01:30 happens twice
        let tz = chrono_tz::America::New_York;
        let now = tz.with_ymd_and_hms(2025, 11, 1, 12, 0, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now))
            .with_send_time(NaiveTime::from_hms_opt(1, 30, 0).unwrap());

        let fire = scheduler.send_instant(ymd(2025, 11, 2));
        // Earliest 01:30 is still EDT (UTC-4)
        assert_eq!(fire.with_timezone(&Utc).hour(), 5);
    }

    #[test]
    fn test_fixed_offset_clock() {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = offset.with_ymd_and_hms(2025, 6, 10, 8, 0, 0).unwrap();
        let scheduler = ReminderScheduler::new(FixedClock::new(now));

        let delay = scheduler.calculate_reminder_delay("2025-06-11").unwrap();
        assert_eq!(delay, Duration::from_secs(25 * 3600));
    }

    #[test]
    fn test_decision_serializes_camel_case() {
        let decision = sao_paulo().compute_reminder_decision("2025-06-11").unwrap();
        let json = serde_json::to_value(decision).unwrap();
        assert_eq!(json["releaseDate"], "2025-06-11");
        assert_eq!(json["daysUntilRelease"], 1);
        assert_eq!(json["isToday"], false);
        assert_eq!(json["shouldSendReminder"], true);
    }
}
