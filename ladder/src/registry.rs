//! Rank ladder registry.
//!
//! The ladder is a single chain of ranks from the entry rank to the terminal
//! rank. It is validated once when built and is immutable afterwards, so a
//! single instance can be shared freely between callers.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::LadderConfig;
use crate::types::RankDefinition;

/// Error types for ladder construction and lookup.
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    /// Rank identifier has no definition
    #[error("Unknown rank: {0}")]
    UnknownRank(String),

    /// No ranks were supplied
    #[error("Ladder has no ranks")]
    Empty,

    /// Two definitions share an identifier
    #[error("Duplicate rank definition: {0}")]
    DuplicateRank(String),

    /// A rank points at a successor that is not defined
    #[error("Rank {rank} points to undefined next rank {next}")]
    DanglingNextRank { rank: String, next: String },

    /// Two ranks point at the same successor
    #[error("Rank {0} is the successor of more than one rank")]
    SharedSuccessor(String),

    /// Every rank is some other rank's successor
    #[error("Ladder has no entry rank")]
    NoEntryRank,

    /// More than one rank has no predecessor
    #[error("Ladder has multiple entry ranks: {0:?}")]
    MultipleEntryRanks(Vec<String>),

    /// Rank sits on a cycle unreachable from the entry rank
    #[error("Rank {0} is part of a cycle")]
    Cycle(String),

    /// Volume target is negative or not finite
    #[error("Rank {rank} has invalid volume target {target}")]
    InvalidTarget { rank: String, target: f64 },

    /// Configuration could not be parsed
    #[error("Invalid ladder configuration: {0}")]
    Config(#[from] serde_yaml::Error),
}

/// The validated compensation ladder.
#[derive(Debug, Clone)]
pub struct RankLadder {
    /// Definitions in chain order, entry rank first
    ranks: Vec<RankDefinition>,
    /// Chain position by rank identifier
    positions: HashMap<String, usize>,
    /// Position of the rank downline members must hold for structure gates
    reference_rank: usize,
    /// Hash of the ladder for audit purposes
    fingerprint: String,
}

impl RankLadder {
    /// Build a ladder from unordered definitions.
    ///
    /// Validates that the definitions form exactly one chain without cycles
    /// and that `reference_rank_id` names one of them.
    pub fn new(
        definitions: Vec<RankDefinition>,
        reference_rank_id: &str,
    ) -> Result<Self, LadderError> {
        if definitions.is_empty() {
            return Err(LadderError::Empty);
        }

        let mut by_id: HashMap<String, RankDefinition> = HashMap::new();
        for def in definitions {
            if !def.volume_target.is_finite() || def.volume_target < 0.0 {
                return Err(LadderError::InvalidTarget {
                    rank: def.id,
                    target: def.volume_target,
                });
            }
            if by_id.contains_key(&def.id) {
                return Err(LadderError::DuplicateRank(def.id));
            }
            by_id.insert(def.id.clone(), def);
        }

        let mut successors: HashSet<&str> = HashSet::new();
        for def in by_id.values() {
            if let Some(next) = def.next_rank_id.as_deref() {
                if !by_id.contains_key(next) {
                    return Err(LadderError::DanglingNextRank {
                        rank: def.id.clone(),
                        next: next.to_string(),
                    });
                }
                if !successors.insert(next) {
                    return Err(LadderError::SharedSuccessor(next.to_string()));
                }
            }
        }

        let mut entries: Vec<String> = by_id
            .keys()
            .filter(|id| !successors.contains(id.as_str()))
            .cloned()
            .collect();
        let entry = match entries.len() {
            0 => return Err(LadderError::NoEntryRank),
            1 => entries.remove(0),
            _ => {
                entries.sort();
                return Err(LadderError::MultipleEntryRanks(entries));
            }
        };

        // Walk the chain from the entry rank.
        let mut ordered_ids = Vec::with_capacity(by_id.len());
        let mut seen: HashSet<String> = HashSet::new();
        let mut cursor = Some(entry);
        while let Some(id) = cursor {
            if !seen.insert(id.clone()) {
                return Err(LadderError::Cycle(id));
            }
            cursor = by_id.get(&id).and_then(|def| def.next_rank_id.clone());
            ordered_ids.push(id);
        }

        if ordered_ids.len() < by_id.len() {
            let mut stranded: Vec<&String> = by_id.keys().filter(|id| !seen.contains(*id)).collect();
            stranded.sort();
            let id = stranded.first().map(|id| id.to_string()).unwrap_or_default();
            return Err(LadderError::Cycle(id));
        }

        let ranks: Vec<RankDefinition> = ordered_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();
        let positions: HashMap<String, usize> = ranks
            .iter()
            .enumerate()
            .map(|(position, def)| (def.id.clone(), position))
            .collect();

        let reference_rank = *positions
            .get(reference_rank_id)
            .ok_or_else(|| LadderError::UnknownRank(reference_rank_id.to_string()))?;

        let fingerprint = Self::compute_fingerprint(&ranks, reference_rank_id);

        Ok(Self {
            ranks,
            positions,
            reference_rank,
            fingerprint,
        })
    }

    /// Build the built-in standard ladder.
    pub fn standard() -> Result<Self, LadderError> {
        LadderConfig::default().into_ladder()
    }

    /// Look up a rank definition.
    pub fn get(&self, rank_id: &str) -> Result<&RankDefinition, LadderError> {
        self.positions
            .get(rank_id)
            .map(|&position| &self.ranks[position])
            .ok_or_else(|| LadderError::UnknownRank(rank_id.to_string()))
    }

    /// Whether a rank identifier is defined.
    pub fn contains(&self, rank_id: &str) -> bool {
        self.positions.contains_key(rank_id)
    }

    /// The entry rank new members start at.
    pub fn lowest(&self) -> &RankDefinition {
        &self.ranks[0]
    }

    /// The terminal rank.
    pub fn highest(&self) -> &RankDefinition {
        &self.ranks[self.ranks.len() - 1]
    }

    /// The rank following `rank`, if any.
    pub fn next_of(&self, rank: &RankDefinition) -> Option<&RankDefinition> {
        rank.next_rank_id
            .as_deref()
            .and_then(|next| self.get(next).ok())
    }

    /// The rank downline members must hold to count toward structure gates.
    pub fn reference_rank(&self) -> &RankDefinition {
        &self.ranks[self.reference_rank]
    }

    /// Position in the chain, 0 for the entry rank.
    pub fn position(&self, rank_id: &str) -> Option<usize> {
        self.positions.get(rank_id).copied()
    }

    /// Whether rank `a` is at or above rank `b`.
    ///
    /// Returns `false` when either rank is unknown. That is a data-integrity
    /// problem rather than a comparison result; use [`compare`](Self::compare)
    /// to tell the two apart.
    pub fn is_at_or_above(&self, a: &str, b: &str) -> bool {
        match self.compare(a, b) {
            Ok(ordering) => ordering != Ordering::Less,
            Err(err) => {
                warn!(a = %a, b = %b, error = %err, "Rank comparison with unknown rank");
                false
            }
        }
    }

    /// Compare two ranks by chain position.
    pub fn compare(&self, a: &str, b: &str) -> Result<Ordering, LadderError> {
        let a = self
            .position(a)
            .ok_or_else(|| LadderError::UnknownRank(a.to_string()))?;
        let b = self
            .position(b)
            .ok_or_else(|| LadderError::UnknownRank(b.to_string()))?;
        Ok(a.cmp(&b))
    }

    /// All ranks in chain order, entry rank first.
    pub fn iter(&self) -> impl Iterator<Item = &RankDefinition> {
        self.ranks.iter()
    }

    /// Number of ranks.
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// Always false for a built ladder.
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Hash of the ladder for audit purposes.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Export the ladder back into configuration form.
    pub fn to_config(&self) -> LadderConfig {
        LadderConfig {
            reference_rank: self.reference_rank().id.clone(),
            ranks: self.ranks.clone(),
        }
    }

    fn compute_fingerprint(ranks: &[RankDefinition], reference_rank_id: &str) -> String {
        let mut hasher = Sha256::new();

        for rank in ranks {
            hasher.update(rank.id.as_bytes());
            hasher.update(rank.volume_target.to_bits().to_be_bytes());
            hasher.update(rank.required_downline_count.to_be_bytes());
            hasher.update([u8::from(rank.escalates_role)]);
        }
        hasher.update(reference_rank_id.as_bytes());

        hex::encode(hasher.finalize())
    }
}
