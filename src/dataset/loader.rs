//! Dataset file loading.
//!
//! The backing file is a JSON array of state objects using the upstream
//! key names: "state", "districts", "district", "subDistricts",
//! "subDistrict", "villages". A missing or unparseable file degrades to
//! an empty dataset so the process always starts; individual records
//! without a usable name are skipped.

use super::types::{Block, District, State};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the dataset location.
pub const DATA_PATH_ENV: &str = "GRAM_ATLAS_DATA";

// ─── Raw wire format ─────────────────────────────────────────────

#[derive(Deserialize)]
struct RawState {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    districts: Vec<RawDistrict>,
}

#[derive(Deserialize)]
struct RawDistrict {
    #[serde(default)]
    district: Option<String>,
    #[serde(default, rename = "subDistricts")]
    sub_districts: Vec<RawBlock>,
}

#[derive(Deserialize)]
struct RawBlock {
    #[serde(default, rename = "subDistrict")]
    sub_district: Option<String>,
    #[serde(default)]
    villages: Vec<String>,
}

// ─── Errors ──────────────────────────────────────────────────────

/// Why a dataset file could not be loaded.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read dataset file: {}", e),
            Self::Parse(e) => write!(f, "invalid dataset JSON: {}", e),
        }
    }
}

impl std::error::Error for LoadError {}

// ─── Loading ─────────────────────────────────────────────────────

/// Load and convert the dataset file at `path`.
pub fn load_from_path(path: &Path) -> Result<Vec<State>, LoadError> {
    let raw = fs::read_to_string(path).map_err(LoadError::Io)?;
    let states: Vec<RawState> = serde_json::from_str(&raw).map_err(LoadError::Parse)?;
    Ok(states.into_iter().filter_map(convert_state).collect())
}

/// Load the dataset, degrading to an empty list on any failure.
///
/// Load failures are an operator concern, not a caller error: the
/// process starts regardless and every lookup then returns empty.
pub fn load_or_empty(path: &Path) -> Vec<State> {
    match load_from_path(path) {
        Ok(states) => states,
        Err(e) => {
            eprintln!(
                "Warning: {} ({}); starting with an empty dataset",
                e,
                path.display()
            );
            Vec::new()
        }
    }
}

/// Resolve the dataset path: `$GRAM_ATLAS_DATA`, then
/// `./data/locations.json`, then the per-user data directory.
pub fn default_data_path() -> PathBuf {
    if let Ok(p) = std::env::var(DATA_PATH_ENV) {
        if !p.trim().is_empty() {
            return PathBuf::from(p);
        }
    }

    let local = PathBuf::from("data").join("locations.json");
    if local.exists() {
        return local;
    }

    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("gram-atlas")
        .join("locations.json")
}

fn convert_state(raw: RawState) -> Option<State> {
    let name = nonempty(raw.state)?;
    Some(State {
        name,
        districts: raw
            .districts
            .into_iter()
            .filter_map(convert_district)
            .collect(),
    })
}

fn convert_district(raw: RawDistrict) -> Option<District> {
    let name = nonempty(raw.district)?;
    Some(District {
        name,
        blocks: raw
            .sub_districts
            .into_iter()
            .filter_map(convert_block)
            .collect(),
    })
}

fn convert_block(raw: RawBlock) -> Option<Block> {
    let name = nonempty(raw.sub_district)?;
    Some(Block {
        name,
        villages: raw.villages,
    })
}

fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
