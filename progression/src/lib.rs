//! Rank Progression
//!
//! Decides when a member advances along the compensation ladder:
//!
//! - **Volume accounting**: lifetime and cycle volume grow with every sale
//! - **Promotion gates**: volume targets or counts of sponsored managers
//! - **History**: one append-only entry per promotion granted
//! - **Role escalation**: leadership ranks upgrade student accounts
//!
//! Evaluation is a pure computation over a member snapshot and a downline
//! roster snapshot. Callers that may evaluate the same member concurrently
//! must serialize their read-modify-write of that member's record.
//!
//! # Example
//!
//! ```
//! use chrono::Utc;
//! use rank_ladder::RankLadder;
//! use rank_progression::{Evaluator, Member, SaleVolume};
//!
//! let ladder = RankLadder::standard()?;
//! let evaluator = Evaluator::new(&ladder);
//!
//! let member = Member::new("m-1", "Ana", Utc::now());
//! let updated = evaluator.evaluate(&member, SaleVolume::new(2.0)?, &[]);
//! assert_eq!(updated.current_rank_id(), Some("ASSOCIATE"));
//! # Ok::<(), rank_progression::ProgressionError>(())
//! ```

pub mod evaluator;
pub mod types;

// Re-export main types
pub use evaluator::Evaluator;
pub use types::*;
