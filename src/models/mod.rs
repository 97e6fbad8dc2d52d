//! Data structures for the tournament: teams, stats, matches, groups, bracket.

mod bracket;
mod game;
mod group;
mod stats;
mod team;
mod tournament;

pub use bracket::{Bracket, BracketSlot, SlotId};
pub use game::{
    EventKind, Match, MatchEvent, MatchPhase, MatchResult, MatchState, RoundType, ShootoutResult,
    Side, MATCH_MINUTES,
};
pub use group::{rank_teams, Group, GROUP_MATCHES, GROUP_SIZE};
pub use stats::{StatKind, Stats};
pub use team::{Team, TeamId};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentState};
