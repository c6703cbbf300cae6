//! Race timeline storage
//!
//! The replay core reads the dataset through [`TimelineStore`]; it never
//! writes to it. [`InMemoryTimeline`] is the indexed implementation used by
//! [`Regatta::open`](crate::Regatta::open), fed by the CSV [`loader`].

pub mod loader;
mod memory;

pub use memory::InMemoryTimeline;

use crate::Result;
use crate::types::{Boat, RaceObservation, Timestamp};

/// Read-only contract over whatever backs the race dataset.
///
/// Implementations may be slow external stores; their own latency and retry
/// policy stay behind this trait. Failures surface as
/// [`ReplayError::Storage`](crate::ReplayError::Storage).
#[async_trait::async_trait]
pub trait TimelineStore: Send + Sync + 'static {
    /// Earliest observation timestamp.
    ///
    /// Returns [`ReplayError::EmptyDataset`](crate::ReplayError::EmptyDataset)
    /// when there are no observations.
    async fn min_timestamp(&self) -> Result<Timestamp>;

    /// Latest observation timestamp. Same failure mode as `min_timestamp`.
    async fn max_timestamp(&self) -> Result<Timestamp>;

    /// All observations with `date_time <= t`, ordered by `(date_time, id)`.
    ///
    /// Empty, not an error, when `t` precedes the first observation.
    async fn observations_at_or_before(&self, t: Timestamp) -> Result<Vec<RaceObservation>>;

    /// Every boat, in an order that is stable for the lifetime of the store.
    async fn all_boats(&self) -> Result<Vec<Boat>>;
}
