//! Core types for race replay data.
//!
//! - [`Boat`] is the static roster entry, keyed by its sail registration code
//! - [`RaceObservation`] is one recorded sample of one boat, with motion
//!   metrics grouped per trailing window in [`MotionMetrics`]
//! - [`Timestamp`] is the naive, second-precision historical time
//!
//! ## Usage Example
//!
//! ```rust
//! use regatta::types::parse_timestamp;
//!
//! let ts = parse_timestamp("2024-11-10 05:00:00").unwrap();
//! assert_eq!(ts.to_string(), "2024-11-10 05:00:00");
//! ```

mod boat;
mod observation;
pub(crate) mod timestamp;

pub use boat::Boat;
pub(crate) use observation::ObservationRecord;
pub use observation::{MotionMetrics, RaceObservation};
pub use timestamp::{TIMESTAMP_FORMAT, Timestamp, parse_timestamp, truncate_to_second};
