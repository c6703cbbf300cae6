//! Replay clock: wall-clock time to historical race time.
//!
//! The clock is a single linear time-dilation map. Game time advances
//! `historical_span / game_duration` times faster than wall time:
//!
//! ```text
//! elapsed = clamp(now - game_start, 0, game_duration)
//! t       = historical_start + historical_span * elapsed / game_duration
//! ```
//!
//! Once the timer lapses the mapping stays at `historical_end`: the replay
//! freezes on the complete dataset instead of extrapolating past it.
//!
//! All state is fixed at construction, so a clock can be shared by any
//! number of concurrent readers without synchronization.
//!
//! ## Usage Example
//!
//! ```rust
//! use regatta::ReplayClock;
//! use regatta::types::parse_timestamp;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let start = parse_timestamp("2024-11-10 00:00:00").unwrap();
//! let end = parse_timestamp("2024-11-10 10:00:00").unwrap();
//! let game_start = Instant::now();
//!
//! let clock = ReplayClock::new(game_start, Duration::from_secs(3600), start, end).unwrap();
//! let half_time = clock.equivalent_historical_time(game_start + Duration::from_secs(1800));
//! assert_eq!(half_time, parse_timestamp("2024-11-10 05:00:00").unwrap());
//! ```

use std::time::Duration;

use chrono::TimeDelta;
use tokio::time::Instant;
use tracing::info;

use crate::store::TimelineStore;
use crate::types::{Timestamp, truncate_to_second};
use crate::{ReplayError, Result};

/// Immutable mapping from wall-clock instants to historical timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayClock {
    game_start: Instant,
    game_duration: Duration,
    historical_start: Timestamp,
    historical_end: Timestamp,
}

impl ReplayClock {
    /// Create a clock from explicit bounds.
    ///
    /// Both historical bounds are truncated to whole seconds.
    ///
    /// # Errors
    ///
    /// [`ReplayError::InvalidConfiguration`] if `game_duration` is zero or if
    /// `historical_end` precedes `historical_start`.
    pub fn new(
        game_start: Instant,
        game_duration: Duration,
        historical_start: Timestamp,
        historical_end: Timestamp,
    ) -> Result<Self> {
        if game_duration.is_zero() {
            return Err(ReplayError::invalid_configuration(
                "game duration must be greater than zero",
            ));
        }

        let historical_start = truncate_to_second(historical_start);
        let historical_end = truncate_to_second(historical_end);
        if historical_end < historical_start {
            return Err(ReplayError::invalid_configuration(format!(
                "historical end {historical_end} precedes historical start {historical_start}"
            )));
        }

        Ok(Self { game_start, game_duration, historical_start, historical_end })
    }

    /// Initialize a clock from the dataset's historical span.
    ///
    /// The game starts the moment the span has been read, i.e. when the
    /// service becomes ready.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::InvalidConfiguration`] for a zero game duration
    /// - [`ReplayError::EmptyDataset`] propagated from the store
    pub async fn from_store<S>(store: &S, game_duration: Duration) -> Result<Self>
    where
        S: TimelineStore + ?Sized,
    {
        if game_duration.is_zero() {
            return Err(ReplayError::invalid_configuration(
                "game duration must be greater than zero",
            ));
        }

        let historical_start = store.min_timestamp().await?;
        let historical_end = store.max_timestamp().await?;
        let clock = Self::new(Instant::now(), game_duration, historical_start, historical_end)?;

        info!(
            historical_start = %clock.historical_start,
            historical_end = %clock.historical_end,
            game_duration = ?clock.game_duration,
            dilation = clock.dilation_factor(),
            "Replay clock initialized"
        );

        Ok(clock)
    }

    /// Historical timestamp equivalent to `now`, at second precision.
    ///
    /// Total over every instant: instants before `game_start` map to
    /// `historical_start`, instants after the timer map to `historical_end`.
    pub fn equivalent_historical_time(&self, now: Instant) -> Timestamp {
        let span_secs = self.historical_span().num_seconds();
        if span_secs == 0 {
            return self.historical_start;
        }

        let elapsed = self.elapsed(now);
        if elapsed == self.game_duration {
            return self.historical_end;
        }

        // Exact integer arithmetic; truncation toward the past keeps the
        // result at or below the true instant.
        let offset = span_secs as i128 * elapsed.as_nanos() as i128
            / self.game_duration.as_nanos() as i128;

        self.historical_start + TimeDelta::seconds(offset as i64)
    }

    /// Fraction of the replay completed at `now`, in `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        self.elapsed(now).as_secs_f64() / self.game_duration.as_secs_f64()
    }

    /// Whether the timer has run out and the feed is frozen.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.elapsed(now) >= self.game_duration
    }

    /// Wall-clock time left before the replay reaches `historical_end`.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.game_duration - self.elapsed(now)
    }

    /// Historical seconds replayed per wall-clock second.
    ///
    /// Zero when the dataset spans a single instant.
    pub fn dilation_factor(&self) -> f64 {
        self.historical_span().num_seconds() as f64 / self.game_duration.as_secs_f64()
    }

    /// Wall-clock instant the game started.
    pub fn game_start(&self) -> Instant {
        self.game_start
    }

    /// Total wall-clock duration of one full replay.
    pub fn game_duration(&self) -> Duration {
        self.game_duration
    }

    /// Earliest historical timestamp.
    pub fn historical_start(&self) -> Timestamp {
        self.historical_start
    }

    /// Latest historical timestamp.
    pub fn historical_end(&self) -> Timestamp {
        self.historical_end
    }

    /// `historical_end - historical_start`, never negative.
    pub fn historical_span(&self) -> TimeDelta {
        self.historical_end - self.historical_start
    }

    fn elapsed(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.game_start).min(self.game_duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ts;
    use proptest::prelude::*;

    const HOUR: Duration = Duration::from_secs(3600);

    fn scenario_clock(game_start: Instant) -> ReplayClock {
        ReplayClock::new(game_start, HOUR, ts("2024-11-10 00:00:00"), ts("2024-11-10 10:00:00"))
            .unwrap()
    }

    fn minutes(m: u64) -> Duration {
        Duration::from_secs(m * 60)
    }

    #[test]
    fn half_elapsed_maps_to_mid_span() {
        let t0 = Instant::now();
        let clock = scenario_clock(t0);
        assert_eq!(clock.equivalent_historical_time(t0 + minutes(30)), ts("2024-11-10 05:00:00"));
    }

    #[test]
    fn game_start_maps_to_historical_start() {
        let t0 = Instant::now();
        let clock = scenario_clock(t0);
        assert_eq!(clock.equivalent_historical_time(t0), ts("2024-11-10 00:00:00"));
        assert_eq!(clock.progress(t0), 0.0);
    }

    #[test]
    fn instants_before_start_are_clamped() {
        let t0 = Instant::now() + HOUR;
        let clock = scenario_clock(t0);
        assert_eq!(clock.equivalent_historical_time(t0 - minutes(5)), ts("2024-11-10 00:00:00"));
    }

    #[test]
    fn replay_freezes_after_expiry() {
        let t0 = Instant::now();
        let clock = scenario_clock(t0);

        let at_61 = clock.equivalent_historical_time(t0 + minutes(61));
        let at_90 = clock.equivalent_historical_time(t0 + minutes(90));
        assert_eq!(at_61, ts("2024-11-10 10:00:00"));
        assert_eq!(at_90, at_61);
        assert!(clock.is_finished(t0 + minutes(60)));
        assert!(!clock.is_finished(t0 + minutes(59)));
        assert_eq!(clock.progress(t0 + minutes(90)), 1.0);
        assert_eq!(clock.remaining(t0 + minutes(90)), Duration::ZERO);
    }

    #[test]
    fn single_instant_dataset_never_moves() {
        let t0 = Instant::now();
        let instant = ts("2024-11-10 12:00:00");
        let clock = ReplayClock::new(t0, HOUR, instant, instant).unwrap();

        for m in [0, 1, 30, 60, 600] {
            assert_eq!(clock.equivalent_historical_time(t0 + minutes(m)), instant);
        }
        assert_eq!(clock.dilation_factor(), 0.0);
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = ReplayClock::new(
            Instant::now(),
            Duration::ZERO,
            ts("2024-11-10 00:00:00"),
            ts("2024-11-10 10:00:00"),
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidConfiguration { .. }));
    }

    #[test]
    fn reversed_span_is_rejected() {
        let err = ReplayClock::new(
            Instant::now(),
            HOUR,
            ts("2024-11-10 10:00:00"),
            ts("2024-11-10 00:00:00"),
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::InvalidConfiguration { .. }));
    }

    #[test]
    fn dilation_matches_span_over_duration() {
        let clock = scenario_clock(Instant::now());
        assert_eq!(clock.dilation_factor(), 10.0);
        assert_eq!(clock.historical_span(), TimeDelta::hours(10));
    }

    #[tokio::test]
    async fn from_store_reads_dataset_bounds() {
        let store = crate::test_utils::scenario_timeline();
        let before = Instant::now();
        let clock = ReplayClock::from_store(&store, HOUR).await.unwrap();
        assert_eq!(clock.historical_start(), ts("2024-11-10 00:00:00"));
        assert_eq!(clock.historical_end(), ts("2024-11-10 10:00:00"));
        assert!(clock.game_start() >= before);
        assert!(clock.game_start() <= Instant::now());
    }

    #[tokio::test]
    async fn from_store_propagates_empty_dataset() {
        let store = crate::store::InMemoryTimeline::new(vec![], vec![]).unwrap();
        let err = ReplayClock::from_store(&store, HOUR).await.unwrap_err();
        assert!(matches!(err, ReplayError::EmptyDataset));
    }

    #[tokio::test]
    async fn from_store_checks_duration_before_querying() {
        let store = crate::store::InMemoryTimeline::new(vec![], vec![]).unwrap();
        let err = ReplayClock::from_store(&store, Duration::ZERO).await.unwrap_err();
        assert!(matches!(err, ReplayError::InvalidConfiguration { .. }));
    }

    proptest! {
        #[test]
        fn prop_interior_samples_follow_closed_form(
            span_secs in 0i64..60 * 86_400,
            duration_secs in 1u64..7_200,
            elapsed_millis in 0u64..7_200_000,
        ) {
            let t0 = Instant::now();
            let start = ts("2024-11-10 00:00:00");
            let end = start + TimeDelta::seconds(span_secs);
            let duration = Duration::from_secs(duration_secs);
            let clock = ReplayClock::new(t0, duration, start, end).unwrap();

            let elapsed = Duration::from_millis(elapsed_millis).min(duration);
            let got = clock.equivalent_historical_time(t0 + Duration::from_millis(elapsed_millis));

            let expected = span_secs as i128 * elapsed.as_millis() as i128
                / duration.as_millis() as i128;
            prop_assert_eq!((got - start).num_seconds() as i128, expected);
            prop_assert!(got >= start && got <= end);
        }

        #[test]
        fn prop_mapping_is_monotonic(
            span_secs in 0i64..60 * 86_400,
            a_millis in 0u64..10_000_000,
            b_millis in 0u64..10_000_000,
        ) {
            let t0 = Instant::now();
            let start = ts("2024-11-10 00:00:00");
            let clock = ReplayClock::new(t0, HOUR, start, start + TimeDelta::seconds(span_secs)).unwrap();

            let (lo, hi) = if a_millis <= b_millis { (a_millis, b_millis) } else { (b_millis, a_millis) };
            let t_lo = clock.equivalent_historical_time(t0 + Duration::from_millis(lo));
            let t_hi = clock.equivalent_historical_time(t0 + Duration::from_millis(hi));
            prop_assert!(t_lo <= t_hi);
        }
    }
}
