//! Domain layer - Business logic and domain models

pub mod clock;
pub mod email;
pub mod locale;
pub mod movie;
pub mod release_date;
pub mod reminder;
pub mod template;

pub use clock::{Clock, FixedClock, SystemClock};
pub use email::{compose_release_reminder, EmailRequest, EmailResponse};
pub use locale::{format_date_to_portuguese, format_short_date};
pub use movie::Movie;
pub use release_date::ReleaseDateInput;
pub use reminder::{ReminderDecision, ReminderScheduler};
pub use template::{load_template, Template};
