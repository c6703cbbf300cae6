//! Boat and skipper roster

use serde::{Deserialize, Deserializer, Serialize};

/// Static boat record, loaded once and never mutated.
///
/// Physical measurements are genuinely unknown for some boats; those fields
/// stay `None` rather than defaulting to zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boat {
    /// Unique sail registration code (e.g. `FRA79`)
    pub nat_voile: String,
    /// Boat name
    pub name: String,
    /// Display color assigned to the boat
    pub color: String,
    /// Skipper first name
    pub skipper_first_name: String,
    /// Skipper last name
    pub skipper_last_name: String,
    /// Hull length (m)
    pub length: Option<f64>,
    /// Beam (m)
    pub width: Option<f64>,
    /// Mast height (m)
    pub mast_height: Option<f64>,
    /// Upwind sail area (m²)
    pub upwind_sail_area: Option<f64>,
    /// Downwind sail area (m²)
    pub downwind_sail_area: Option<f64>,
    /// Skipper gender code
    pub gender: u8,
    /// Skipper age
    pub age: u32,
    /// Number of previous participations of the skipper
    pub n_participations: u32,
    /// Whether the boat sails on foils
    #[serde(deserialize_with = "deserialize_flag")]
    pub foil: bool,
    /// Year of construction
    pub year: i32,
}

impl Boat {
    /// Full skipper name.
    pub fn skipper(&self) -> String {
        format!("{} {}", self.skipper_first_name, self.skipper_last_name)
    }
}

/// Accepts `0`/`1` as stored in the dataset as well as `true`/`false`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(serde::de::Error::custom(format!("invalid flag value {other}"))),
        Flag::Text(s) => match s.trim() {
            "0" | "false" => Ok(false),
            "1" | "true" => Ok(true),
            other => Err(serde::de::Error::custom(format!("invalid flag value '{other}'"))),
        },
    }
}
