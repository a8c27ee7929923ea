//! Ladder configuration.
//!
//! The rank table is loaded once at process start, usually from YAML.

use serde::{Deserialize, Serialize};

use crate::registry::{LadderError, RankLadder};
use crate::standard;
use crate::types::RankDefinition;

/// Serializable form of a rank ladder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LadderConfig {
    /// Rank downline members must hold to count toward structure gates
    pub reference_rank: String,
    /// Rank definitions, in any order
    pub ranks: Vec<RankDefinition>,
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            reference_rank: standard::MANAGER.to_string(),
            ranks: standard::standard_ranks(),
        }
    }
}

impl LadderConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Validate and build the ladder.
    pub fn into_ladder(self) -> Result<RankLadder, LadderError> {
        RankLadder::new(self.ranks, &self.reference_rank)
    }

    /// Parse YAML and build the ladder in one step.
    pub fn load(yaml: &str) -> Result<RankLadder, LadderError> {
        Self::from_yaml(yaml)?.into_ladder()
    }
}
