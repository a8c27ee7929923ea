//! The built-in compensation ladder.
//!
//! Three volume-gated ranks lead to the manager tier; above it promotion
//! depends on how many sponsored members have reached manager themselves.

use crate::types::RankDefinition;

pub const NOVUS: &str = "NOVUS";
pub const ASSOCIATE: &str = "ASSOCIATE";
pub const MANAGER: &str = "MANAGER";
pub const DIRECTOR: &str = "DIRECTOR";
pub const EXECUTIVE: &str = "EXECUTIVE";
pub const PRESIDENTIAL: &str = "PRESIDENTIAL";

/// Rank definitions of the standard ladder, entry rank first.
pub fn standard_ranks() -> Vec<RankDefinition> {
    vec![
        RankDefinition::volume_gated(NOVUS, 2.0)
            .named("Novus")
            .followed_by(ASSOCIATE),
        RankDefinition::volume_gated(ASSOCIATE, 4.0)
            .named("Associate")
            .followed_by(MANAGER),
        RankDefinition::volume_gated(MANAGER, 8.0)
            .named("Manager")
            .followed_by(DIRECTOR)
            .escalating_role(),
        RankDefinition::structure_gated(DIRECTOR, 3)
            .named("Director")
            .followed_by(EXECUTIVE)
            .escalating_role(),
        RankDefinition::structure_gated(EXECUTIVE, 5)
            .named("Executive")
            .followed_by(PRESIDENTIAL),
        RankDefinition::volume_gated(PRESIDENTIAL, 0.0).named("Presidential"),
    ]
}
