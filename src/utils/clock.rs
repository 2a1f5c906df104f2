use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Source of "today" for resolving date ranges.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Current calendar day in the user's timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    timezone: Tz,
}

impl SystemClock {
    pub fn new(timezone: Tz) -> Self {
        SystemClock { timezone }
    }

    /// Parses an IANA timezone name, falling back to UTC when it is not recognised.
    pub fn from_name(name: &str) -> Self {
        let timezone = name.parse().unwrap_or_else(|_| {
            tracing::warn!("[CLOCK] Unknown timezone '{}', using UTC", name);
            chrono_tz::UTC
        });
        SystemClock { timezone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        SystemClock::new(chrono_tz::UTC)
    }
}

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// Always reports the same day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_date() {
        let day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(FixedClock(day).today(), day);
    }

    #[test]
    fn unknown_timezone_falls_back_to_utc() {
        let clock = SystemClock::from_name("Mars/Olympus_Mons");
        assert_eq!(clock.timezone, chrono_tz::UTC);

        let clock = SystemClock::from_name("Europe/Rome");
        assert_eq!(clock.timezone, chrono_tz::Europe::Rome);
    }
}
