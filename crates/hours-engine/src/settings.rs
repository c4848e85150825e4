//! Runtime settings shared by the service and its front ends.

use std::time::Duration;

use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{HoursError, Result};

pub const DEFAULT_BOOKING_LENGTH_MINUTES: i64 = 15;
pub const MAX_BOOKING_LENGTH_MINUTES: i64 = 24 * 60;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length of one booking slot.
    pub booking_length_minutes: i64,
    /// IANA timezone the waitlist's hours are expressed in.
    pub timezone: String,
    /// How long fetched hours stay cached.
    pub cache_ttl_secs: u64,
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            booking_length_minutes: DEFAULT_BOOKING_LENGTH_MINUTES,
            timezone: "UTC".to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    /// Parse the configured timezone.
    ///
    /// # Errors
    /// Returns `HoursError::InvalidConfiguration` for an unknown IANA name.
    pub fn tz(&self) -> Result<Tz> {
        self.timezone.parse().map_err(|_| {
            HoursError::InvalidConfiguration(format!("unknown timezone '{}'", self.timezone))
        })
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Check the values that cannot be caught by deserialization alone.
    ///
    /// # Errors
    /// Returns `HoursError::InvalidConfiguration` describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_BOOKING_LENGTH_MINUTES).contains(&self.booking_length_minutes) {
            return Err(HoursError::InvalidConfiguration(format!(
                "booking_length_minutes must be between 1 and {}, got {}",
                MAX_BOOKING_LENGTH_MINUTES, self.booking_length_minutes
            )));
        }
        self.tz()?;
        Ok(())
    }
}
