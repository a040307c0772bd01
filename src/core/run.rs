use crate::core::time::RunTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// Stable identifier of a submitter, independent of any display name.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contributor(String);

// Normalized game title, the catalog key.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameTitle(String);

/// One timed submission. `placement` is derived state, recomputed by the
/// store after every mutation of the game it belongs to.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Run {
    pub time: RunTime,
    pub contributor: Contributor,
    pub placement: usize,
}

impl Contributor {
    pub fn new(id: impl Into<String>) -> Self {
        Contributor(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Contributor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl GameTitle {
    /// Trim, lower-case, then capitalize the first character ASCII-style:
    /// " MARIO kart " and "mario kart" both become "Mario kart".
    pub fn normalize(input: &str) -> Self {
        let lowered = input.trim().to_lowercase();
        let mut chars = lowered.chars();
        let title = match chars.next() {
            Some(first) => std::iter::once(first.to_ascii_uppercase()).chain(chars).collect(),
            None => String::new(),
        };
        GameTitle(title)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for GameTitle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Run {
    pub fn new(time: RunTime, contributor: Contributor) -> Self {
        // Placement is assigned once the run is ranked within its board.
        Run {
            time,
            contributor,
            placement: 0,
        }
    }
}
