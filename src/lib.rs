//! estreia - Movie release reminders
//!
//! Decides whether a movie's release-day reminder should go out today, later,
//! or not at all, and computes how long to wait until the configured local
//! send time on the release day.

pub mod application;
pub mod cli;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use error::EstreiaError;
