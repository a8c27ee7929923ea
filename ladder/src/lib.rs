//! Compensation Rank Ladder
//!
//! This crate holds the ordered table of ranks members climb:
//!
//! - **Volume-gated ranks**: advanced by accumulating cycle sales volume
//! - **Structure-gated ranks**: advanced by sponsoring members who reached
//!   the reference (manager) rank
//! - **Terminal rank**: the top of the ladder, no further promotion
//!
//! # Key Components
//!
//! - [`RankLadder`]: Validated, immutable chain of [`RankDefinition`]s
//! - [`LadderConfig`]: YAML form of the ladder, loaded at process start
//! - [`AccountRole`]: Account classification that leadership ranks upgrade
//!
//! # Example
//!
//! ```
//! use rank_ladder::RankLadder;
//!
//! let ladder = RankLadder::standard()?;
//! assert!(ladder.is_at_or_above("DIRECTOR", "MANAGER"));
//! # Ok::<(), rank_ladder::LadderError>(())
//! ```

pub mod config;
pub mod registry;
pub mod standard;
pub mod types;

// Re-export main types
pub use config::LadderConfig;
pub use registry::{LadderError, RankLadder};
pub use types::*;
