//! Uptime tracking.

use std::fmt;
use std::time::Instant;

/// Start mark captured once when the shell is constructed.
#[derive(Debug, Clone, Copy)]
pub struct Uptime {
    started: Instant,
}

impl Uptime {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Whole seconds since the mark.
    pub fn elapsed_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed::from_secs(self.elapsed_secs())
    }
}

/// Elapsed time broken into days, hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Elapsed {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Elapsed {
    pub fn from_secs(total: u64) -> Self {
        let (hours, remainder) = (total / 3600, total % 3600);
        let (minutes, seconds) = (remainder / 60, remainder % 60);
        let (days, hours) = (hours / 24, hours % 24);

        Self {
            days,
            hours,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for Elapsed {
    /// The day component is left out while it is zero.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{} days, ", self.days)?;
        }
        write!(
            f,
            "{} hours, {} minutes, and {} seconds",
            self.hours, self.minutes, self.seconds
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_secs() {
        assert_eq!(
            Elapsed::from_secs(90_000),
            Elapsed {
                days: 1,
                hours: 1,
                minutes: 0,
                seconds: 0
            }
        );
        assert_eq!(
            Elapsed::from_secs(3661),
            Elapsed {
                days: 0,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn test_format_with_days() {
        assert_eq!(
            Elapsed::from_secs(90_000).to_string(),
            "1 days, 1 hours, 0 minutes, and 0 seconds"
        );
    }

    #[test]
    fn test_format_without_days() {
        assert_eq!(
            Elapsed::from_secs(3661).to_string(),
            "1 hours, 1 minutes, and 1 seconds"
        );
        assert_eq!(
            Elapsed::from_secs(0).to_string(),
            "0 hours, 0 minutes, and 0 seconds"
        );
    }

    #[test]
    fn test_fresh_mark() {
        let uptime = Uptime::start();
        assert_eq!(uptime.elapsed().days, 0);
        assert!(uptime.elapsed_secs() < 5);
    }
}
