//! Clock implementations

use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};

use chrono::{DateTime, Duration, Utc};
use contracts::Clock;

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for deterministic runs
///
/// Cloning shares the underlying time, so a test can keep a handle and advance the
/// clock seen by the code under test.
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Microseconds since UNIX epoch
    micros: Arc<AtomicI64>,
}

impl ManualClock {
    /// Start at the given instant
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            micros: Arc::new(AtomicI64::new(start.timestamp_micros())),
        }
    }

    /// Move the clock forward; negative durations are ignored
    ///
    /// Saturates at the latest representable instant instead of wrapping.
    pub fn advance(&self, by: Duration) {
        let delta = by.num_microseconds().unwrap_or(i64::MAX).max(0);
        let max = DateTime::<Utc>::MAX_UTC.timestamp_micros();
        let _ = self
            .micros
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |micros| {
                Some(micros.saturating_add(delta).min(max))
            });
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::starting_at(DateTime::<Utc>::UNIX_EPOCH)
    }
}

impl Clock for ManualClock {
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_micros(self.micros.load(Ordering::Acquire))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_manual_clock_advance_is_shared() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);
        let handle = clock.clone();

        handle.advance(Duration::milliseconds(1500));
        assert_eq!(clock.now_utc(), start + Duration::milliseconds(1500));
    }

    #[test]
    fn test_manual_clock_ignores_negative_advance() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);
        clock.advance(Duration::seconds(-10));
        assert_eq!(clock.now_utc(), start);
    }

    #[test]
    fn test_manual_clock_never_moves_backwards() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let clock = ManualClock::starting_at(start);

        clock.advance(Duration::days(365 * 1000));
        let far = clock.now_utc();
        assert!(far > start);

        clock.advance(Duration::MAX);
        let saturated = clock.now_utc();
        assert!(saturated >= far);
        assert_eq!(saturated.timestamp_micros(), DateTime::<Utc>::MAX_UTC.timestamp_micros());

        clock.advance(Duration::seconds(1));
        assert_eq!(clock.now_utc(), saturated);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let a = clock.now_utc();
        let b = clock.now_utc();
        assert!(b >= a);
    }
}
