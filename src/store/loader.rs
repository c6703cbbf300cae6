//! CSV dataset loader
//!
//! Reads a normalized dataset directory:
//!
//! ```text
//! <dataset>/
//!   boats.csv   one row per boat
//!   race.csv    one row per observation, flat metric columns
//! ```
//!
//! Empty cells in optional boat measurements load as `None`. Timestamps use
//! `YYYY-MM-DD HH:MM:SS`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use super::InMemoryTimeline;
use crate::types::{Boat, ObservationRecord, RaceObservation};
use crate::{ReplayError, Result};

/// Roster file name inside a dataset directory.
pub const BOATS_FILE: &str = "boats.csv";

/// Observation file name inside a dataset directory.
pub const RACE_FILE: &str = "race.csv";

/// Load both dataset files from `dir` into an [`InMemoryTimeline`].
pub fn load_dataset<P: AsRef<Path>>(dir: P) -> Result<InMemoryTimeline> {
    let dir = dir.as_ref();
    info!("Loading race dataset from {}", dir.display());

    let boats = read_boats(File::open(dir.join(BOATS_FILE)).map_err(|e| {
        ReplayError::file_error(dir.join(BOATS_FILE), e)
    })?)?;
    let observations = read_observations(File::open(dir.join(RACE_FILE)).map_err(|e| {
        ReplayError::file_error(dir.join(RACE_FILE), e)
    })?)?;

    InMemoryTimeline::new(boats, observations)
}

/// Parse a boat roster from CSV.
pub fn read_boats<R: Read>(reader: R) -> Result<Vec<Boat>> {
    read_rows(reader, BOATS_FILE)
}

/// Parse race observations from CSV.
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<RaceObservation>> {
    let records: Vec<ObservationRecord> = read_rows(reader, RACE_FILE)?;
    Ok(records.into_iter().map(RaceObservation::from).collect())
}

fn read_rows<R: Read, T: DeserializeOwned>(reader: R, file: &str) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: T = result.map_err(|e| match ReplayError::from(e) {
            ReplayError::Parse { context, details } => {
                ReplayError::parse_error(format!("{file}: {context}"), details)
            }
            other => other,
        })?;
        rows.push(row);
    }

    info!(file, rows = rows.len(), "Parsed dataset file");
    Ok(rows)
}
