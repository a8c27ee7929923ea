//! Core types for rank progression.
//!
//! Member records use camelCase field names so they round-trip with the
//! portal's JSON store. With the `typescript` feature enabled, they can be
//! exported to TypeScript using ts-rs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rank_ladder::{AccountRole, LadderError, RankDefinition};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// Error types for rank progression.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    /// Volume increment was negative or not finite
    #[error("Invalid sale volume: {0} (must be finite and non-negative)")]
    InvalidVolume(f64),

    /// Ladder could not be built or queried
    #[error(transparent)]
    Ladder(#[from] LadderError),
}

/// Result type for progression operations.
pub type Result<T> = std::result::Result<T, ProgressionError>;

/// A validated, non-negative volume increment.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct SaleVolume(f64);

impl SaleVolume {
    /// No volume; used for structure re-checks.
    pub const ZERO: Self = Self(0.0);

    /// Validate a raw volume.
    pub fn new(volume: f64) -> Result<Self> {
        if !volume.is_finite() || volume < 0.0 {
            return Err(ProgressionError::InvalidVolume(volume));
        }
        Ok(Self(volume))
    }

    /// The raw value.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whether this increment adds nothing.
    pub fn is_zero(self) -> bool {
        self.0 == 0.0
    }
}

impl TryFrom<f64> for SaleVolume {
    type Error = ProgressionError;

    fn try_from(volume: f64) -> Result<Self> {
        Self::new(volume)
    }
}

impl From<SaleVolume> for f64 {
    fn from(volume: SaleVolume) -> Self {
        volume.0
    }
}

/// One promotion in a member's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RankAchievement {
    /// Rank whose cycle was completed
    pub rank_id: String,
    /// When the promotion was granted
    pub achieved_at: DateTime<Utc>,
    /// Lifetime volume at the moment of promotion
    pub lifetime_volume_at_achievement: f64,
}

/// A member's position on the ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct RankProgress {
    /// Current rank identifier
    pub current_rank_id: String,
    /// Volume accumulated since the last promotion
    #[serde(default)]
    pub current_cycle_volume: f64,
    /// Threshold this member is working toward
    #[serde(default)]
    pub target_volume: f64,
    /// When the current cycle began
    pub cycle_start: DateTime<Utc>,
    /// Append-only promotion history, oldest first
    #[serde(default)]
    pub history: Vec<RankAchievement>,
}

impl RankProgress {
    /// Fresh progress at the start of `rank`.
    pub fn starting_at(rank: &RankDefinition, now: DateTime<Utc>) -> Self {
        Self {
            current_rank_id: rank.id.clone(),
            current_cycle_volume: 0.0,
            target_volume: rank.volume_target,
            cycle_start: now,
            history: Vec::new(),
        }
    }

    /// Volume still missing to reach the target, never negative.
    pub fn remaining_volume(&self) -> f64 {
        (self.target_volume - self.current_cycle_volume).max(0.0)
    }

    /// Share of the target reached, clamped to `[0, 1]`.
    ///
    /// Always 0 when there is no volume target (structure-gated ranks).
    pub fn completion_ratio(&self) -> f64 {
        if self.target_volume <= 0.0 {
            return 0.0;
        }
        (self.current_cycle_volume / self.target_volume).clamp(0.0, 1.0)
    }

    /// The most recent promotion.
    pub fn latest_achievement(&self) -> Option<&RankAchievement> {
        self.history.last()
    }
}

/// The member fields rank progression reads and writes.
///
/// Everything except `lifetime_volume`, `role` and `rank_progress` is carried
/// through evaluation untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Unique member identifier
    pub identifier: String,
    /// Identifier of the sponsoring member
    #[serde(default)]
    pub sponsor_id: Option<String>,
    /// Name shown in the portal
    #[serde(default)]
    pub display_name: String,
    /// Total volume ever credited
    #[serde(default)]
    pub lifetime_volume: f64,
    /// Account classification
    #[serde(default)]
    pub role: AccountRole,
    /// Ladder position, absent until the first evaluation
    #[serde(default)]
    pub rank_progress: Option<RankProgress>,
    /// When the member joined
    pub joined_at: DateTime<Utc>,
    /// Last portal login
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl Member {
    /// Create a new member with no volume and no rank progress.
    pub fn new(
        identifier: impl Into<String>,
        display_name: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            sponsor_id: None,
            display_name: display_name.into(),
            lifetime_volume: 0.0,
            role: AccountRole::default(),
            rank_progress: None,
            joined_at,
            last_login_at: None,
        }
    }

    /// Builder: set the sponsor.
    pub fn sponsored_by(mut self, sponsor_id: impl Into<String>) -> Self {
        self.sponsor_id = Some(sponsor_id.into());
        self
    }

    /// Builder: set the rank progress.
    pub fn with_progress(mut self, progress: RankProgress) -> Self {
        self.rank_progress = Some(progress);
        self
    }

    /// Whether `sponsor_id` sponsored this member.
    pub fn is_sponsored_by(&self, sponsor_id: &str) -> bool {
        self.sponsor_id.as_deref() == Some(sponsor_id)
    }

    /// Current rank, if progress has been initialized.
    pub fn current_rank_id(&self) -> Option<&str> {
        self.rank_progress
            .as_ref()
            .map(|p| p.current_rank_id.as_str())
    }
}

/// What an evaluation did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    /// Member advanced one rank
    Promoted {
        from: String,
        to: String,
        role_escalated: bool,
    },
    /// Volumes updated, promotion condition not met
    Unchanged,
    /// Member is at the top of the ladder; volumes updated only
    TerminalRank,
    /// Member's rank is not on the ladder; member returned as-is
    UnknownRank { rank_id: String },
}

/// Result of a single evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// The updated member snapshot
    pub member: Member,
    /// What happened
    pub outcome: EvaluationOutcome,
    /// Fingerprint of the ladder used
    pub ladder_fingerprint: String,
}

impl Evaluation {
    /// Whether the member was promoted.
    pub fn is_promoted(&self) -> bool {
        matches!(self.outcome, EvaluationOutcome::Promoted { .. })
    }

    /// Take the updated member.
    pub fn into_member(self) -> Member {
        self.member
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn joined() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 9, 0, 0).unwrap()
    }

    #[test]
    fn test_sale_volume_validation() {
        assert!(SaleVolume::new(0.0).unwrap().is_zero());
        assert_eq!(SaleVolume::new(2.5).unwrap().value(), 2.5);
        assert!(matches!(
            SaleVolume::new(-0.5),
            Err(ProgressionError::InvalidVolume(_))
        ));
        assert!(SaleVolume::new(f64::NAN).is_err());
        assert!(SaleVolume::new(f64::INFINITY).is_err());

        assert!(serde_json::from_str::<SaleVolume>("-1.0").is_err());
        assert_eq!(serde_json::from_str::<SaleVolume>("3.0").unwrap().value(), 3.0);
    }

    #[test]
    fn test_progress_display_helpers() {
        let rank = RankDefinition::volume_gated("NOVUS", 2.0);
        let mut progress = RankProgress::starting_at(&rank, joined());
        assert_eq!(progress.remaining_volume(), 2.0);
        assert_eq!(progress.completion_ratio(), 0.0);

        progress.current_cycle_volume = 1.5;
        assert_eq!(progress.remaining_volume(), 0.5);
        assert_eq!(progress.completion_ratio(), 0.75);

        progress.current_cycle_volume = 3.0;
        assert_eq!(progress.remaining_volume(), 0.0);
        assert_eq!(progress.completion_ratio(), 1.0);

        let director = RankDefinition::structure_gated("DIRECTOR", 3);
        let progress = RankProgress::starting_at(&director, joined());
        assert_eq!(progress.completion_ratio(), 0.0);
        assert!(progress.latest_achievement().is_none());
    }

    #[test]
    fn test_member_json_uses_portal_field_names() {
        let member = Member::new("m-1", "Ana", joined()).sponsored_by("m-0");
        let json = serde_json::to_value(&member).unwrap();

        assert_eq!(json["identifier"], "m-1");
        assert_eq!(json["sponsorId"], "m-0");
        assert_eq!(json["lifetimeVolume"], 0.0);
        assert_eq!(json["role"], "STUDENT");
        assert!(json["rankProgress"].is_null());

        let parsed: Member = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, member);
    }

    #[test]
    fn test_sparse_member_record() {
        let json = r#"{"identifier":"m-2","joinedAt":"2026-01-05T09:00:00Z"}"#;
        let member: Member = serde_json::from_str(json).unwrap();

        assert_eq!(member.role, AccountRole::Student);
        assert_eq!(member.lifetime_volume, 0.0);
        assert!(member.current_rank_id().is_none());
        assert!(!member.is_sponsored_by("m-1"));
    }
}
