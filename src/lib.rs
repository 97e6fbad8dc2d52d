//! 32-team soccer tournament simulator: library with models and business logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::SimConfig;
pub use logic::{
    build_tournament, draw_scores, entropy_rng, export_snapshot, fallback_roster,
    generate_timeline, load_roster, play_group, play_match, play_penalties, run_match,
    seed_round_of_16, seeded_rng, simulate_group_stage, simulate_knockout_round,
    simulate_knockout_stage, simulate_tournament, snapshot_json, start_tournament,
    update_team_stats, ChannelSink, EventSink, LogSink, Narration, RecordingSink, RosterEntry,
    SilentSink, SimRng, Snapshot,
};
pub use models::{
    Bracket, BracketSlot, EventKind, Group, Match, MatchEvent, MatchPhase, MatchResult,
    MatchState, RoundType, ShootoutResult, Side, StatKind, Stats, Team, TeamId, Tournament,
    TournamentError, TournamentId, TournamentState,
};
