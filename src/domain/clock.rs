//! Wall-clock abstraction

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};

/// Source of the current instant, expressed in the zone reminders are computed in.
pub trait Clock {
    type Tz: TimeZone;

    /// Current instant in this clock's zone
    fn now(&self) -> DateTime<Self::Tz>;

    /// This clock's zone
    fn timezone(&self) -> Self::Tz {
        self.now().timezone()
    }

    /// Current local calendar day
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Real time, observed in a chosen zone
#[derive(Debug, Clone)]
pub struct SystemClock<Tz: TimeZone> {
    tz: Tz,
}

impl<Tz: TimeZone> SystemClock<Tz> {
    pub fn new(tz: Tz) -> Self {
        SystemClock { tz }
    }
}

impl SystemClock<Local> {
    /// Real time in the process's local zone
    pub fn local() -> Self {
        SystemClock { tz: Local }
    }
}

impl<Tz: TimeZone> Clock for SystemClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    fn timezone(&self) -> Tz {
        self.tz.clone()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    instant: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(instant: DateTime<Tz>) -> Self {
        FixedClock { instant }
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.instant.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Tz = C::Tz;

    fn now(&self) -> DateTime<C::Tz> {
        (**self).now()
    }

    fn timezone(&self) -> C::Tz {
        (**self).timezone()
    }
}

/// Hands out the given instants one per read, then repeats the last one
#[cfg(test)]
pub(crate) struct SteppingClock<Tz: TimeZone> {
    instants: Vec<DateTime<Tz>>,
    reads: std::cell::Cell<usize>,
}

#[cfg(test)]
impl<Tz: TimeZone> SteppingClock<Tz> {
    pub(crate) fn new(instants: Vec<DateTime<Tz>>) -> Self {
        assert!(!instants.is_empty());
        SteppingClock {
            instants,
            reads: std::cell::Cell::new(0),
        }
    }

    pub(crate) fn reads(&self) -> usize {
        self.reads.get()
    }
}

#[cfg(test)]
impl<Tz: TimeZone> Clock for SteppingClock<Tz> {
    type Tz = Tz;

    fn now(&self) -> DateTime<Tz> {
        let read = self.reads.get();
        self.reads.set(read + 1);
        self.instants[read.min(self.instants.len() - 1)].clone()
    }

    fn timezone(&self) -> Tz {
        self.instants[0].timezone()
    }
}
