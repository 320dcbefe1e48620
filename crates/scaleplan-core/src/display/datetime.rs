//! Timestamp formatting in the system time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a timestamp as `YYYY-MM-DD HH:MM:SS TZ` in the system time zone.
/// An absent timestamp renders as `never`.
pub struct LocalDateTime<'a>(pub Option<&'a Timestamp>);

impl<'a> From<&'a Timestamp> for LocalDateTime<'a> {
    fn from(timestamp: &'a Timestamp) -> Self {
        Self(Some(timestamp))
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(timestamp) => write!(
                f,
                "{}",
                timestamp
                    .to_zoned(TimeZone::system())
                    .strftime("%Y-%m-%d %H:%M:%S %Z")
            ),
            None => write!(f, "never"),
        }
    }
}
