//! Time-compressed replay of historical ocean-race telemetry.
//!
//! Regatta takes a race recorded over weeks of real time and replays it as a
//! live feed squeezed into a short game timer. A client observing the feed
//! sees the whole race unfold in miniature: boats appear at the start line,
//! positions fill in as the timer runs, and once the timer expires the feed
//! freezes on the complete dataset.
//!
//! # Architecture
//!
//! - [`store::TimelineStore`]: read-only access to boats and observations,
//!   with [`InMemoryTimeline`] as the indexed implementation
//! - [`ReplayClock`]: maps a wall-clock instant to the equivalent historical
//!   timestamp
//! - [`RaceFeed`]: applies the clock to the store and returns what is
//!   visible "as of" now
//!
//! Everything is computed on demand from the wall clock. There is no
//! background task and no mutable shared state once a feed is open.
//!
//! ## Example
//!
//! ```rust,no_run
//! use regatta::{GameConfig, Regatta};
//!
//! #[tokio::main]
//! async fn main() -> regatta::Result<()> {
//!     let config = GameConfig::load("config.yaml")?;
//!     let feed = Regatta::open("data/vendee", &config).await?;
//!
//!     let boats = feed.all_boats().await?;
//!     let race = feed.current_race().await?;
//!     println!("{} boats, {} observations visible", boats.len(), race.len());
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
mod error;
pub mod feed;
pub mod store;
#[cfg(any(test, feature = "benchmark"))]
pub mod test_utils;
pub mod types;

pub use clock::ReplayClock;
pub use config::GameConfig;
pub use error::*;
pub use feed::{RaceFeed, RaceUpdate, RaceView};
pub use store::{InMemoryTimeline, TimelineStore};
pub use types::{Boat, MotionMetrics, RaceObservation, Timestamp};

use std::path::Path;
use std::sync::Arc;

/// Unified entry point for starting a replay.
pub struct Regatta;

impl Regatta {
    /// Load a CSV dataset directory and start the game clock.
    ///
    /// The directory must contain `boats.csv` and `race.csv` (see
    /// [`store::loader`]).
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A dataset file is missing or malformed
    /// - An observation references a boat missing from the roster
    /// - The dataset has no observations
    ///
    /// All of these are startup failures; no feed is returned.
    pub async fn open<P: AsRef<Path>>(
        dataset_dir: P,
        config: &GameConfig,
    ) -> Result<RaceFeed<InMemoryTimeline>> {
        let store = store::loader::load_dataset(dataset_dir)?;
        RaceFeed::open(Arc::new(store), config).await
    }

    /// Start the game clock over an already-populated store.
    pub async fn from_store<S: TimelineStore>(store: S, config: &GameConfig) -> Result<RaceFeed<S>> {
        RaceFeed::open(Arc::new(store), config).await
    }
}
