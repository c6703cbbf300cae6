//! Race observations

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Motion metrics over one trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionMetrics {
    /// Heading (degrees)
    pub heading: f64,
    /// Speed (knots)
    pub speed: f64,
    /// Velocity made good (knots)
    pub vmg: f64,
    /// Distance covered (nm)
    pub distance: f64,
}

/// One recorded sample of one boat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceObservation {
    /// Arrival identifier, strictly increasing in ingestion order
    pub id: i64,
    /// Rank at the time of the sample
    pub rank: u32,
    /// Registration code of the observed boat
    pub nat_voile: String,
    /// Historical time of the sample
    pub date_time: Timestamp,
    /// Latitude (decimal degrees, north positive)
    pub latitude: f64,
    /// Longitude (decimal degrees, east positive)
    pub longitude: f64,
    /// Metrics over the last 30 minutes
    pub last_30min: MotionMetrics,
    /// Metrics since the previous sample
    pub since_last: MotionMetrics,
    /// Metrics over the last 24 hours
    pub last_24h: MotionMetrics,
    /// Distance to the finish line (nm)
    pub distance_to_finish: f64,
    /// Distance to the race leader (nm)
    pub distance_to_leader: f64,
}

impl RaceObservation {
    /// Sort key used by every read path: timestamp, then arrival order.
    pub fn timeline_key(&self) -> (Timestamp, i64) {
        (self.date_time, self.id)
    }
}

/// Flat row layout of the race table.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ObservationRecord {
    id: i64,
    rank: u32,
    nat_voile: String,
    #[serde(deserialize_with = "super::timestamp::deserialize")]
    date_time: Timestamp,
    latitude: f64,
    longitude: f64,
    heading_30min: f64,
    speed_30min: f64,
    vmg_30min: f64,
    distance_30min: f64,
    heading_last: f64,
    speed_last: f64,
    #[serde(rename = "VMG_last", alias = "vmg_last")]
    vmg_last: f64,
    distance_last: f64,
    heading_24h: f64,
    speed_24h: f64,
    vmg_24h: f64,
    distance_24h: f64,
    distance_to_finish: f64,
    distance_to_leader: f64,
}

impl From<ObservationRecord> for RaceObservation {
    fn from(r: ObservationRecord) -> Self {
        RaceObservation {
            id: r.id,
            rank: r.rank,
            nat_voile: r.nat_voile,
            date_time: r.date_time,
            latitude: r.latitude,
            longitude: r.longitude,
            last_30min: MotionMetrics {
                heading: r.heading_30min,
                speed: r.speed_30min,
                vmg: r.vmg_30min,
                distance: r.distance_30min,
            },
            since_last: MotionMetrics {
                heading: r.heading_last,
                speed: r.speed_last,
                vmg: r.vmg_last,
                distance: r.distance_last,
            },
            last_24h: MotionMetrics {
                heading: r.heading_24h,
                speed: r.speed_24h,
                vmg: r.vmg_24h,
                distance: r.distance_24h,
            },
            distance_to_finish: r.distance_to_finish,
            distance_to_leader: r.distance_to_leader,
        }
    }
}
