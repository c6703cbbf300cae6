//! In-memory timeline indexed by historical time

use std::collections::HashSet;

use tracing::{debug, info};

use super::TimelineStore;
use crate::types::{Boat, RaceObservation, Timestamp, truncate_to_second};
use crate::{ReplayError, Result};

/// Immutable in-memory timeline.
///
/// Observations are sorted once by `(date_time, id)` at construction, so
/// every at-or-before query is a binary search plus a prefix copy. Nothing
/// is mutated afterwards and concurrent readers need no locking.
#[derive(Debug, Clone)]
pub struct InMemoryTimeline {
    boats: Vec<Boat>,
    observations: Vec<RaceObservation>,
}

impl InMemoryTimeline {
    /// Build a timeline, enforcing roster integrity.
    ///
    /// # Errors
    ///
    /// - [`ReplayError::DuplicateBoat`] if two boats share a registration code
    /// - [`ReplayError::UnknownBoat`] if an observation references a code
    ///   missing from the roster
    ///
    /// Observation times are truncated to whole seconds, the resolution of
    /// the replay clock, so the dataset bounds line up with the clock's.
    ///
    /// An empty observation set is accepted here; it is rejected when a
    /// replay clock is initialized from the store.
    pub fn new(mut boats: Vec<Boat>, mut observations: Vec<RaceObservation>) -> Result<Self> {
        let mut codes = HashSet::with_capacity(boats.len());
        for boat in &boats {
            if !codes.insert(boat.nat_voile.as_str()) {
                return Err(ReplayError::DuplicateBoat { nat_voile: boat.nat_voile.clone() });
            }
        }

        if let Some(orphan) = observations.iter().find(|o| !codes.contains(o.nat_voile.as_str())) {
            return Err(ReplayError::UnknownBoat {
                nat_voile: orphan.nat_voile.clone(),
                observation_id: orphan.id,
            });
        }

        for obs in &mut observations {
            obs.date_time = truncate_to_second(obs.date_time);
        }

        boats.sort_by(|a, b| a.nat_voile.cmp(&b.nat_voile));
        // Stable sort keeps input order for exact key duplicates.
        observations.sort_by_key(RaceObservation::timeline_key);

        info!(
            boats = boats.len(),
            observations = observations.len(),
            first = ?observations.first().map(|o| o.date_time),
            last = ?observations.last().map(|o| o.date_time),
            "Timeline loaded"
        );

        Ok(Self { boats, observations })
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Whether the timeline has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Count of observations with `date_time <= t`.
    pub fn count_at_or_before(&self, t: Timestamp) -> usize {
        self.observations.partition_point(|o| o.date_time <= t)
    }

    /// Borrowed view of the observations with `date_time <= t`.
    pub fn slice_at_or_before(&self, t: Timestamp) -> &[RaceObservation] {
        &self.observations[..self.count_at_or_before(t)]
    }

    /// Number of distinct timestamps, i.e. reveal steps of a full replay.
    pub fn distinct_timestamps(&self) -> usize {
        let mut count = 0;
        let mut previous = None;
        for obs in &self.observations {
            if previous != Some(obs.date_time) {
                count += 1;
                previous = Some(obs.date_time);
            }
        }
        count
    }
}

#[async_trait::async_trait]
impl TimelineStore for InMemoryTimeline {
    async fn min_timestamp(&self) -> Result<Timestamp> {
        self.observations.first().map(|o| o.date_time).ok_or(ReplayError::EmptyDataset)
    }

    async fn max_timestamp(&self) -> Result<Timestamp> {
        self.observations.last().map(|o| o.date_time).ok_or(ReplayError::EmptyDataset)
    }

    async fn observations_at_or_before(&self, t: Timestamp) -> Result<Vec<RaceObservation>> {
        let visible = self.slice_at_or_before(t);
        debug!(at = %t, visible = visible.len(), "At-or-before query");
        Ok(visible.to_vec())
    }

    async fn all_boats(&self) -> Result<Vec<Boat>> {
        Ok(self.boats.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{boat, observation, ts};

    fn timeline() -> InMemoryTimeline {
        InMemoryTimeline::new(
            vec![boat("GBR99"), boat("FRA79")],
            vec![
                observation(3, "FRA79", "2024-11-10 04:00:00"),
                observation(1, "FRA79", "2024-11-10 00:00:00"),
                observation(2, "GBR99", "2024-11-10 00:00:00"),
                observation(5, "GBR99", "2024-11-10 04:00:00"),
                observation(4, "GBR99", "2024-11-10 02:00:00"),
            ],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn min_and_max_span_the_dataset() {
        let store = timeline();
        assert_eq!(store.min_timestamp().await.unwrap(), ts("2024-11-10 00:00:00"));
        assert_eq!(store.max_timestamp().await.unwrap(), ts("2024-11-10 04:00:00"));
    }

    #[tokio::test]
    async fn empty_store_reports_empty_dataset() {
        let store = InMemoryTimeline::new(vec![boat("FRA79")], vec![]).unwrap();
        assert!(matches!(store.min_timestamp().await, Err(ReplayError::EmptyDataset)));
        assert!(matches!(store.max_timestamp().await, Err(ReplayError::EmptyDataset)));
        assert!(store.observations_at_or_before(ts("2024-11-10 00:00:00")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn at_or_before_is_inclusive_and_ordered() {
        let store = timeline();
        let visible = store.observations_at_or_before(ts("2024-11-10 02:00:00")).await.unwrap();
        let ids: Vec<i64> = visible.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let all = store.observations_at_or_before(ts("2024-11-10 04:00:00")).await.unwrap();
        let ids: Vec<i64> = all.iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 4, 3, 5]);
    }

    #[tokio::test]
    async fn query_before_first_sample_is_empty() {
        let store = timeline();
        let visible = store.observations_at_or_before(ts("2024-11-09 23:59:59")).await.unwrap();
        assert!(visible.is_empty());
    }

    #[tokio::test]
    async fn boats_are_returned_in_stable_order() {
        let store = timeline();
        let first: Vec<String> =
            store.all_boats().await.unwrap().into_iter().map(|b| b.nat_voile).collect();
        let second: Vec<String> =
            store.all_boats().await.unwrap().into_iter().map(|b| b.nat_voile).collect();
        assert_eq!(first, vec!["FRA79", "GBR99"]);
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_boat_is_rejected() {
        let err = InMemoryTimeline::new(
            vec![boat("FRA79")],
            vec![observation(7, "ITA34", "2024-11-10 00:00:00")],
        )
        .unwrap_err();
        match err {
            ReplayError::UnknownBoat { nat_voile, observation_id } => {
                assert_eq!(nat_voile, "ITA34");
                assert_eq!(observation_id, 7);
            }
            other => panic!("Expected UnknownBoat, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_boat_is_rejected() {
        let err = InMemoryTimeline::new(vec![boat("FRA79"), boat("FRA79")], vec![]).unwrap_err();
        assert!(matches!(err, ReplayError::DuplicateBoat { .. }));
    }

    #[test]
    fn distinct_timestamps_counts_reveal_steps() {
        assert_eq!(timeline().distinct_timestamps(), 3);
        assert_eq!(timeline().len(), 5);
    }

    #[tokio::test]
    async fn sub_second_times_are_truncated() {
        let mut late = observation(2, "FRA79", "2024-11-10 10:00:00");
        late.date_time += chrono::TimeDelta::milliseconds(500);
        let store = InMemoryTimeline::new(
            vec![boat("FRA79")],
            vec![observation(1, "FRA79", "2024-11-10 00:00:00"), late],
        )
        .unwrap();

        assert_eq!(store.max_timestamp().await.unwrap(), ts("2024-11-10 10:00:00"));
        assert_eq!(store.count_at_or_before(ts("2024-11-10 10:00:00")), 2);
    }
}
