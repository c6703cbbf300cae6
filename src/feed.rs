//! Visibility filter: what a client sees of the race right now.
//!
//! [`RaceFeed`] pairs a [`TimelineStore`] with a [`ReplayClock`]. Every read
//! recomputes the equivalent historical time from the wall clock and returns
//! the observations at or before it, so there is no shared counter to drift
//! and nothing to lock. Once revealed, an observation stays revealed.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::Stream;
use serde::Serialize;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval};
use tracing::{debug, info, trace};

use crate::clock::ReplayClock;
use crate::config::GameConfig;
use crate::store::TimelineStore;
use crate::types::{Boat, RaceObservation, Timestamp};
use crate::Result;

/// Snapshot of the visible race at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceView {
    /// Equivalent historical time of the snapshot
    pub as_of: Timestamp,
    /// Fraction of the replay completed, in `[0, 1]`
    pub progress: f64,
    /// Whether the timer has expired and the view is final
    pub finished: bool,
    /// Visible observations ordered by `(date_time, id)`
    pub observations: Vec<RaceObservation>,
}

/// Incremental update produced by [`RaceFeed::updates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaceUpdate {
    /// Equivalent historical time of the update
    pub as_of: Timestamp,
    /// Fraction of the replay completed, in `[0, 1]`
    pub progress: f64,
    /// Whether this is the final update of the replay
    pub finished: bool,
    /// Total observations visible after this update
    pub total_visible: usize,
    /// Observations revealed since the previous update
    pub observations: Vec<RaceObservation>,
}

/// Read surface of a running replay.
pub struct RaceFeed<S: TimelineStore + ?Sized> {
    store: Arc<S>,
    clock: ReplayClock,
}

impl<S: TimelineStore + ?Sized> Clone for RaceFeed<S> {
    fn clone(&self) -> Self {
        Self { store: Arc::clone(&self.store), clock: self.clock }
    }
}

impl<S: TimelineStore + ?Sized> RaceFeed<S> {
    /// Start a replay over `store`.
    ///
    /// The game clock starts once the historical span has been read.
    /// See [`ReplayClock::from_store`].
    ///
    /// # Errors
    ///
    /// Startup errors only: [`ReplayError::EmptyDataset`](crate::ReplayError::EmptyDataset)
    /// or [`ReplayError::InvalidConfiguration`](crate::ReplayError::InvalidConfiguration).
    pub async fn open(store: Arc<S>, config: &GameConfig) -> Result<Self> {
        let clock = ReplayClock::from_store(store.as_ref(), config.game_duration()).await?;
        info!(timer_minutes = config.timer, "Race feed started");

        Ok(Self { store, clock })
    }

    /// Build a feed around an existing clock.
    pub fn with_clock(store: Arc<S>, clock: ReplayClock) -> Self {
        Self { store, clock }
    }

    /// The replay clock.
    pub fn clock(&self) -> &ReplayClock {
        &self.clock
    }

    /// The backing store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Observations visible at `now`, ordered by `(date_time, id)`.
    ///
    /// Only fails if the store itself fails.
    pub async fn currently_visible_race(&self, now: Instant) -> Result<Vec<RaceObservation>> {
        let as_of = self.clock.equivalent_historical_time(now);
        let visible = self.store.observations_at_or_before(as_of).await?;
        trace!(as_of = %as_of, visible = visible.len(), "Visible race computed");
        Ok(visible)
    }

    /// Observations visible right now.
    pub async fn current_race(&self) -> Result<Vec<RaceObservation>> {
        self.currently_visible_race(Instant::now()).await
    }

    /// Static roster, served alongside the race data.
    pub async fn all_boats(&self) -> Result<Vec<Boat>> {
        self.store.all_boats().await
    }

    /// Visible observations bundled with the equivalent time.
    pub async fn race_view(&self, now: Instant) -> Result<RaceView> {
        let as_of = self.clock.equivalent_historical_time(now);
        let observations = self.store.observations_at_or_before(as_of).await?;
        Ok(RaceView {
            as_of,
            progress: self.clock.progress(now),
            finished: self.clock.is_finished(now),
            observations,
        })
    }

    /// Most recent visible observation of each boat, ordered by rank.
    ///
    /// Boats with no visible observation yet are absent.
    pub async fn latest_positions(&self, now: Instant) -> Result<Vec<RaceObservation>> {
        let visible = self.currently_visible_race(now).await?;

        let mut latest: HashMap<String, RaceObservation> = HashMap::new();
        for obs in visible {
            latest.insert(obs.nat_voile.clone(), obs);
        }

        let mut positions: Vec<RaceObservation> = latest.into_values().collect();
        positions.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.nat_voile.cmp(&b.nat_voile)));
        Ok(positions)
    }

    /// Stream of newly revealed observations, polled every `poll_every`.
    ///
    /// Each poll recomputes the equivalent time from the wall clock. Polls
    /// that reveal nothing are skipped. The first item carries everything
    /// visible at subscription time; the stream ends after the item with
    /// `finished == true`. Store failures are yielded and the stream keeps
    /// polling.
    ///
    /// The stream must be polled inside a Tokio runtime; the poll timer is
    /// created on first poll.
    pub fn updates(
        &self,
        poll_every: Duration,
    ) -> impl Stream<Item = Result<RaceUpdate>> + Send + 'static + use<S> {
        let cursor = UpdateCursor {
            feed: self.clone(),
            period: poll_every.max(Duration::from_millis(1)),
            ticker: None,
            revealed: 0,
        };

        futures::stream::unfold(Some(cursor), |cursor| async move {
            let Some(mut cursor) = cursor else {
                return None;
            };
            loop {
                let period = cursor.period;
                let ticker = cursor.ticker.get_or_insert_with(|| {
                    let mut ticker = interval(period);
                    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                    ticker
                });
                ticker.tick().await;
                let now = Instant::now();
                let as_of = cursor.feed.clock.equivalent_historical_time(now);
                let finished = cursor.feed.clock.is_finished(now);

                let visible = match cursor.feed.store.observations_at_or_before(as_of).await {
                    Ok(visible) => visible,
                    Err(e) => {
                        debug!("Update poll failed: {}", e);
                        return Some((Err(e), Some(cursor)));
                    }
                };

                let total_visible = visible.len();
                if total_visible <= cursor.revealed && !finished {
                    continue;
                }

                let observations: Vec<RaceObservation> =
                    visible.into_iter().skip(cursor.revealed).collect();
                trace!(as_of = %as_of, revealed = observations.len(), "Race update");

                let update = RaceUpdate {
                    as_of,
                    progress: cursor.feed.clock.progress(now),
                    finished,
                    total_visible,
                    observations,
                };

                if finished {
                    info!(total_visible, "Replay timer expired, feed frozen");
                    return Some((Ok(update), None));
                }

                cursor.revealed = total_visible;
                return Some((Ok(update), Some(cursor)));
            }
        })
    }
}

struct UpdateCursor<S: TimelineStore + ?Sized> {
    feed: RaceFeed<S>,
    period: Duration,
    // Created on first poll, inside the runtime.
    ticker: Option<Interval>,
    revealed: usize,
}
