// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid weekday: {0} (expected Sun, Mon, Tue, Wed, Thu, Fri or Sat)")]
    InvalidWeekday(String),

    #[error("Invalid time of day: {0} (expected HH:MM or HH:MM:SS)")]
    InvalidTimeOfDay(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
