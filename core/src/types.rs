//! Shared primitive types used across the entire simulation.

use serde::{Deserialize, Serialize};

/// A stable, unique identifier for a postcard.
pub type PostcardId = String;

/// Lifecycle status of a postcard.
///
/// Only `traveling` postcards are eligible for drift. `collected` is
/// terminal and set by the collection flow, never by this engine; the
/// repository query excludes non-traveling rows before a cycle ever
/// sees them.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TravelStatus {
    Traveling,
    Stopped,
    Collected,
}

impl TravelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Traveling => "traveling",
            Self::Stopped   => "stopped",
            Self::Collected => "collected",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "traveling" => Some(Self::Traveling),
            "stopped"   => Some(Self::Stopped),
            "collected" => Some(Self::Collected),
            _           => None,
        }
    }
}
