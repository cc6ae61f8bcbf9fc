//! Read-only lookups over the loaded location tree.
//!
//! Matching is uniform at every level: trim both sides, compare
//! case-insensitively, first match in stored order wins. A miss at any
//! level yields an empty vector, never an error, which is
//! indistinguishable from a match whose children are empty.

use super::types::{Block, District, State};

/// The in-memory location store. Immutable after construction, so it is
/// shared across request tasks without locking.
pub struct LocationStore {
    states: Vec<State>,
}

impl LocationStore {
    pub fn new(states: Vec<State>) -> Self {
        Self { states }
    }

    /// A store with no data. Every lookup returns an empty vector.
    pub fn empty() -> Self {
        Self { states: Vec::new() }
    }

    /// Number of top-level states.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// All state names in dataset order.
    pub fn states(&self) -> Vec<String> {
        self.states.iter().map(|s| s.name.clone()).collect()
    }

    /// District names of the named state, in dataset order.
    pub fn districts(&self, state: &str) -> Vec<String> {
        self.find_state(state)
            .map(|s| s.districts.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Block names of the named district within the named state.
    pub fn blocks(&self, state: &str, district: &str) -> Vec<String> {
        self.find_district(state, district)
            .map(|d| d.blocks.iter().map(|b| b.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Village names of the named block.
    pub fn villages(&self, state: &str, district: &str, block: &str) -> Vec<String> {
        self.find_block(state, district, block)
            .map(|b| b.villages.clone())
            .unwrap_or_default()
    }

    fn find_state(&self, name: &str) -> Option<&State> {
        let wanted = norm(name);
        self.states.iter().find(|s| norm(&s.name) == wanted)
    }

    fn find_district(&self, state: &str, district: &str) -> Option<&District> {
        let wanted = norm(district);
        self.find_state(state)?
            .districts
            .iter()
            .find(|d| norm(&d.name) == wanted)
    }

    fn find_block(&self, state: &str, district: &str, block: &str) -> Option<&Block> {
        let wanted = norm(block);
        self.find_district(state, district)?
            .blocks
            .iter()
            .find(|b| norm(&b.name) == wanted)
    }
}

fn norm(s: &str) -> String {
    s.trim().to_lowercase()
}
