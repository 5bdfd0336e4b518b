//! A single position reading from the device sensor

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A single sensor reading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationFix {
    /// Reported position
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters
    pub accuracy_m: f64,
    /// When the sensor produced the reading
    pub timestamp: DateTime<Utc>,
}

impl LocationFix {
    /// Create a new fix
    #[must_use]
    pub const fn new(coordinate: Coordinate, accuracy_m: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            coordinate,
            accuracy_m,
            timestamp,
        }
    }

    /// Age of the reading relative to `now` (zero for readings from the future)
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        (now - self.timestamp).to_std().unwrap_or(Duration::ZERO)
    }

    /// Whether the reading is at most `max_age` old
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) <= max_age
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn fix_at(timestamp: DateTime<Utc>) -> LocationFix {
        LocationFix::new(Coordinate::lahore(), 12.0, timestamp)
    }

    #[test]
    fn age_of_past_reading() {
        let now = Utc::now();
        let fix = fix_at(now - TimeDelta::seconds(30));
        assert_eq!(fix.age(now), Duration::from_secs(30));
    }

    #[test]
    fn future_reading_has_zero_age() {
        let now = Utc::now();
        let fix = fix_at(now + TimeDelta::seconds(5));
        assert_eq!(fix.age(now), Duration::ZERO);
    }

    #[test]
    fn freshness_is_inclusive() {
        let now = Utc::now();
        let fix = fix_at(now - TimeDelta::seconds(60));
        assert!(fix.is_fresh(now, Duration::from_secs(60)));
        assert!(!fix.is_fresh(now, Duration::from_secs(59)));
    }
}
