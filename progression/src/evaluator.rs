//! Rank progression evaluator.
//!
//! Applies a volume increment to a member and decides whether the member
//! leaves their current rank. Evaluation is pure: the input member and roster
//! are only read, and the caller persists the returned snapshot.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use rank_ladder::{AccountRole, PromotionGate, RankDefinition, RankLadder};

use crate::types::{Evaluation, EvaluationOutcome, Member, RankAchievement, RankProgress, SaleVolume};

/// Evaluates members against a rank ladder.
///
/// At most one promotion is granted per call, even when the carried-over
/// state would already satisfy the next rank's condition.
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'a> {
    ladder: &'a RankLadder,
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over `ladder`.
    pub fn new(ladder: &'a RankLadder) -> Self {
        Self { ladder }
    }

    /// The ladder in use.
    pub fn ladder(&self) -> &'a RankLadder {
        self.ladder
    }

    /// Apply `volume_delta` to `member` and return the updated member.
    ///
    /// `downline_roster` is the snapshot of members sponsored by `member`;
    /// it is only consulted for structure-gated ranks.
    pub fn evaluate(
        &self,
        member: &Member,
        volume_delta: SaleVolume,
        downline_roster: &[Member],
    ) -> Member {
        self.evaluate_at(member, volume_delta, downline_roster, Utc::now())
    }

    /// Like [`evaluate`](Self::evaluate) with an explicit evaluation time.
    pub fn evaluate_at(
        &self,
        member: &Member,
        volume_delta: SaleVolume,
        downline_roster: &[Member],
        now: DateTime<Utc>,
    ) -> Member {
        self.evaluate_detailed(member, volume_delta, downline_roster, now)
            .into_member()
    }

    /// Evaluate and report what happened alongside the updated member.
    pub fn evaluate_detailed(
        &self,
        member: &Member,
        volume_delta: SaleVolume,
        downline_roster: &[Member],
        now: DateTime<Utc>,
    ) -> Evaluation {
        let progress = match &member.rank_progress {
            Some(progress) => progress.clone(),
            None => {
                debug!(member_id = %member.identifier, "Initializing rank progress");
                RankProgress::starting_at(self.ladder.lowest(), now)
            }
        };

        let current = match self.ladder.get(&progress.current_rank_id) {
            Ok(current) => current,
            Err(err) => {
                warn!(
                    member_id = %member.identifier,
                    rank = %progress.current_rank_id,
                    error = %err,
                    "Skipping rank evaluation"
                );
                return self.finish(
                    member.clone(),
                    EvaluationOutcome::UnknownRank {
                        rank_id: progress.current_rank_id,
                    },
                );
            }
        };

        let delta = volume_delta.value();
        let lifetime_volume = member.lifetime_volume + delta;
        let cycle_volume = progress.current_cycle_volume + delta;

        // Legacy records may carry no target for a volume-gated rank.
        let target_volume = if progress.target_volume == 0.0 && current.volume_target > 0.0 {
            current.volume_target
        } else {
            progress.target_volume
        };

        let next = match self.ladder.next_of(current) {
            Some(next) => next,
            None => {
                let updated = RankProgress {
                    current_cycle_volume: cycle_volume,
                    target_volume,
                    ..progress
                };
                return self.finish(
                    Self::rebuild(member, lifetime_volume, member.role, updated),
                    EvaluationOutcome::TerminalRank,
                );
            }
        };

        if !self.promotion_due(member, current, cycle_volume, downline_roster) {
            let updated = RankProgress {
                current_cycle_volume: cycle_volume,
                target_volume,
                ..progress
            };
            return self.finish(
                Self::rebuild(member, lifetime_volume, member.role, updated),
                EvaluationOutcome::Unchanged,
            );
        }

        let mut history = progress.history;
        history.push(RankAchievement {
            rank_id: current.id.clone(),
            achieved_at: now,
            lifetime_volume_at_achievement: lifetime_volume,
        });

        let role = if next.escalates_role {
            member.role.leadership_upgrade()
        } else {
            member.role
        };
        let role_escalated = role != member.role;

        info!(
            member_id = %member.identifier,
            from = %current.id,
            to = %next.id,
            lifetime_volume,
            "Rank promotion granted"
        );
        if role_escalated {
            info!(
                member_id = %member.identifier,
                from = %member.role,
                to = %role,
                "Account role escalated"
            );
        }

        let updated = RankProgress {
            current_rank_id: next.id.clone(),
            current_cycle_volume: 0.0,
            target_volume: next.volume_target,
            cycle_start: now,
            history,
        };

        self.finish(
            Self::rebuild(member, lifetime_volume, role, updated),
            EvaluationOutcome::Promoted {
                from: current.id.clone(),
                to: next.id.clone(),
                role_escalated,
            },
        )
    }

    /// Whether the condition for leaving `current` holds.
    fn promotion_due(
        &self,
        member: &Member,
        current: &RankDefinition,
        cycle_volume: f64,
        downline_roster: &[Member],
    ) -> bool {
        match current.gate() {
            PromotionGate::Volume(target) => {
                debug!(
                    member_id = %member.identifier,
                    rank = %current.id,
                    cycle_volume,
                    target,
                    "Checking volume gate"
                );
                cycle_volume >= target
            }
            PromotionGate::Structure(required) => {
                let qualifying = self.qualifying_downline(member, downline_roster);
                debug!(
                    member_id = %member.identifier,
                    rank = %current.id,
                    qualifying,
                    required,
                    "Checking structure gate"
                );
                qualifying >= required as usize
            }
            PromotionGate::Ungated => false,
        }
    }

    /// Count sponsored members holding the reference rank or higher.
    ///
    /// Members without rank progress count as holding the entry rank.
    pub fn qualifying_downline(&self, member: &Member, downline_roster: &[Member]) -> usize {
        let reference = self.ladder.reference_rank().id.as_str();
        let entry = self.ladder.lowest().id.as_str();

        downline_roster
            .iter()
            .filter(|downline| downline.is_sponsored_by(&member.identifier))
            .filter(|downline| {
                let rank = downline.current_rank_id().unwrap_or(entry);
                self.ladder.is_at_or_above(rank, reference)
            })
            .count()
    }

    /// Copy `member`, replacing only the fields evaluation owns.
    fn rebuild(
        member: &Member,
        lifetime_volume: f64,
        role: AccountRole,
        progress: RankProgress,
    ) -> Member {
        Member {
            lifetime_volume,
            role,
            rank_progress: Some(progress),
            ..member.clone()
        }
    }

    fn finish(&self, member: Member, outcome: EvaluationOutcome) -> Evaluation {
        Evaluation {
            member,
            outcome,
            ladder_fingerprint: self.ladder.fingerprint().to_string(),
        }
    }
}
