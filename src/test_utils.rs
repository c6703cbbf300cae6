//! Test utilities: fixture builders
//!
//! Builders produce small, fully-populated boats and observations so tests
//! only spell out the fields they care about.

#![cfg(any(test, feature = "benchmark"))]

use chrono::TimeDelta;

use crate::store::InMemoryTimeline;
use crate::types::{Boat, MotionMetrics, RaceObservation, Timestamp, parse_timestamp};

/// Parse a `YYYY-MM-DD HH:MM:SS` literal.
///
/// # Panics
///
/// Panics on a malformed literal.
pub fn ts(value: &str) -> Timestamp {
    parse_timestamp(value).expect("valid timestamp literal")
}

/// A boat with every measurement known.
pub fn boat(nat_voile: &str) -> Boat {
    Boat {
        nat_voile: nat_voile.to_string(),
        name: format!("Boat {nat_voile}"),
        color: "#636efa".to_string(),
        skipper_first_name: "Skipper".to_string(),
        skipper_last_name: nat_voile.to_string(),
        length: Some(18.28),
        width: Some(5.85),
        mast_height: Some(29.0),
        upwind_sail_area: Some(320.0),
        downwind_sail_area: Some(600.0),
        gender: 0,
        age: 40,
        n_participations: 1,
        foil: true,
        year: 2019,
    }
}

/// An observation with plausible motion metrics.
pub fn observation(id: i64, nat_voile: &str, date_time: &str) -> RaceObservation {
    observation_at(id, nat_voile, ts(date_time), 1)
}

fn observation_at(id: i64, nat_voile: &str, date_time: Timestamp, rank: u32) -> RaceObservation {
    let metrics = MotionMetrics { heading: 225.0, speed: 14.2, vmg: 13.1, distance: 7.1 };
    RaceObservation {
        id,
        rank,
        nat_voile: nat_voile.to_string(),
        date_time,
        latitude: 46.47 - id as f64 * 0.01,
        longitude: -1.79 - id as f64 * 0.01,
        last_30min: metrics,
        since_last: MotionMetrics { distance: 56.8, ..metrics },
        last_24h: MotionMetrics { distance: 340.8, ..metrics },
        distance_to_finish: 24_000.0 - id as f64,
        distance_to_leader: if rank == 1 { 0.0 } else { 1.5 },
    }
}

/// Two boats sampled every hour from `2024-11-10 00:00:00` to `10:00:00`.
///
/// The boats swap the lead at 05:00.
pub fn scenario_timeline() -> InMemoryTimeline {
    let start = ts("2024-11-10 00:00:00");
    let mut observations = Vec::new();
    let mut id = 0;
    for hour in 0..=10 {
        let at = start + TimeDelta::hours(hour);
        let fra_leads = hour < 5;
        for (code, leads) in [("FRA79", fra_leads), ("GBR99", !fra_leads)] {
            id += 1;
            observations.push(observation_at(id, code, at, if leads { 1 } else { 2 }));
        }
    }

    InMemoryTimeline::new(vec![boat("FRA79"), boat("GBR99")], observations)
        .expect("scenario fixture is consistent")
}

/// `boats` boats sampled every 30 minutes for `days` days.
pub fn synthetic_timeline(boats: usize, days: i64) -> InMemoryTimeline {
    let start = ts("2024-11-10 13:02:00");
    let codes: Vec<String> = (0..boats).map(|i| format!("FRA{}", i + 1)).collect();
    let samples = days * 48;

    let mut observations = Vec::with_capacity(boats * samples as usize);
    let mut id = 0;
    for sample in 0..samples {
        let at = start + TimeDelta::minutes(30 * sample);
        for (rank, code) in codes.iter().enumerate() {
            id += 1;
            observations.push(observation_at(id, code, at, rank as u32 + 1));
        }
    }

    InMemoryTimeline::new(codes.iter().map(|c| boat(c)).collect(), observations)
        .expect("synthetic fixture is consistent")
}
