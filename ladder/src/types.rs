//! Core types for the compensation ladder.
//!
//! With the `typescript` feature enabled, these types can be exported to TypeScript
//! using ts-rs so the portal frontend shares the same rank model.

use serde::{Deserialize, Serialize};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A single tier of the compensation ladder.
///
/// Definitions are owned by the [`RankLadder`](crate::RankLadder) and never
/// change after the ladder is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct RankDefinition {
    /// Unique identifier, e.g. `NOVUS`
    pub id: String,
    /// Human-readable label
    #[serde(default)]
    pub display_name: Option<String>,
    /// Cycle volume required to advance (0 = not volume-gated)
    #[serde(default)]
    pub volume_target: f64,
    /// Sponsored members at or above the reference rank required to advance
    #[serde(default)]
    pub required_downline_count: u32,
    /// The following rank, absent for the terminal rank
    #[serde(default)]
    pub next_rank_id: Option<String>,
    /// Reaching this rank upgrades the lowest account role
    #[serde(default)]
    pub escalates_role: bool,
}

impl RankDefinition {
    /// A rank advanced by accumulating cycle volume.
    pub fn volume_gated(id: impl Into<String>, volume_target: f64) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            volume_target,
            required_downline_count: 0,
            next_rank_id: None,
            escalates_role: false,
        }
    }

    /// A rank advanced by sponsoring enough qualifying members.
    pub fn structure_gated(id: impl Into<String>, required_downline_count: u32) -> Self {
        Self {
            required_downline_count,
            ..Self::volume_gated(id, 0.0)
        }
    }

    /// Builder: set the following rank.
    pub fn followed_by(mut self, next_rank_id: impl Into<String>) -> Self {
        self.next_rank_id = Some(next_rank_id.into());
        self
    }

    /// Builder: set the display name.
    pub fn named(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Builder: mark the rank as a leadership entry point.
    pub fn escalating_role(mut self) -> Self {
        self.escalates_role = true;
        self
    }

    /// Label for display, falling back to the identifier.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }

    /// Whether this is the top of the ladder.
    pub fn is_terminal(&self) -> bool {
        self.next_rank_id.is_none()
    }

    /// The condition that must hold to leave this rank.
    ///
    /// The volume gate takes precedence over the structure gate.
    pub fn gate(&self) -> PromotionGate {
        if self.volume_target > 0.0 {
            PromotionGate::Volume(self.volume_target)
        } else if self.required_downline_count > 0 {
            PromotionGate::Structure(self.required_downline_count)
        } else {
            PromotionGate::Ungated
        }
    }
}

/// How a rank is left for the next one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PromotionGate {
    /// Cycle volume must reach the target
    Volume(f64),
    /// This many sponsored members must hold the reference rank or higher
    Structure(u32),
    /// No promotion condition defined
    Ungated,
}

/// Coarse account classification.
///
/// Ordered `Student < Sponsor < Admin`. Rank promotions may move a member up
/// this order, never down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    /// Entry-level account
    Student = 1,
    /// Leadership account with a downline
    Sponsor = 2,
    /// Portal administrator
    Admin = 3,
}

impl AccountRole {
    /// Whether this is the lowest role.
    pub fn is_lowest(&self) -> bool {
        *self == Self::Student
    }

    /// Role after reaching a leadership-entry rank.
    pub fn leadership_upgrade(self) -> Self {
        match self {
            Self::Student => Self::Sponsor,
            other => other,
        }
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "STUDENT",
            Self::Sponsor => "SPONSOR",
            Self::Admin => "ADMIN",
        }
    }
}

impl Default for AccountRole {
    fn default() -> Self {
        Self::Student
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_gate_takes_precedence() {
        let mut rank = RankDefinition::volume_gated("NOVUS", 2.0);
        rank.required_downline_count = 3;
        assert_eq!(rank.gate(), PromotionGate::Volume(2.0));
    }

    #[test]
    fn test_structure_and_ungated() {
        let director = RankDefinition::structure_gated("DIRECTOR", 3);
        assert_eq!(director.gate(), PromotionGate::Structure(3));

        let top = RankDefinition::volume_gated("TOP", 0.0);
        assert_eq!(top.gate(), PromotionGate::Ungated);
        assert!(top.is_terminal());
    }

    #[test]
    fn test_label_fallback() {
        let rank = RankDefinition::volume_gated("NOVUS", 2.0);
        assert_eq!(rank.label(), "NOVUS");
        assert_eq!(rank.named("Novus").label(), "Novus");
    }

    #[test]
    fn test_role_ordering_and_upgrade() {
        assert!(AccountRole::Student < AccountRole::Sponsor);
        assert!(AccountRole::Sponsor < AccountRole::Admin);

        assert_eq!(AccountRole::Student.leadership_upgrade(), AccountRole::Sponsor);
        assert_eq!(AccountRole::Sponsor.leadership_upgrade(), AccountRole::Sponsor);
        assert_eq!(AccountRole::Admin.leadership_upgrade(), AccountRole::Admin);
    }
}
