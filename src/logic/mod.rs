//! Tournament business logic: setup, match engine, group stage, knockout, export.

mod group_play;
mod knockout;
mod match_play;
mod narration;
mod setup;
mod simulate;
mod snapshot;

pub use group_play::{play_group, simulate_group_stage};
pub use knockout::{
    seed_round_of_16, simulate_knockout_round, simulate_knockout_stage, R16_SEEDING,
};
pub use match_play::{
    draw_scores, generate_timeline, play_match, play_penalties, run_match, update_team_stats,
    MIN_SHOOTOUT_ROUNDS,
};
pub use narration::{ChannelSink, EventSink, LogSink, Narration, RecordingSink, SilentSink};
pub use setup::{
    build_tournament, fallback_roster, load_roster, parse_csv_roster, parse_json_roster,
    start_tournament, validate_roster, RosterEntry, GROUP_LETTERS,
};
pub use simulate::{entropy_rng, seeded_rng, simulate_tournament, SimRng};
pub use snapshot::{
    export_snapshot, snapshot_json, FixtureSummary, GroupSummary, SimParams, Snapshot,
    StandingRow, TeamSummary,
};
