//! Serializable snapshot of a tournament for reporting and export.

use crate::models::{Match, StatKind, Stats, Team, Tournament, TournamentId, TournamentState};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimParams {
    pub delay_ms: u64,
    pub base_goal_rate: f64,
    pub use_ratings: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TeamSummary {
    pub name: String,
    pub rating: u32,
    pub group: String,
    pub eliminated: bool,
    pub points: u32,
    pub goal_diff: i32,
    pub stats: Stats,
    pub goals_per_90: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StandingRow {
    pub team: String,
    pub points: u32,
    pub goal_diff: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub teams: Vec<String>,
    pub matches_played: usize,
    pub standings: Option<Vec<StandingRow>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FixtureSummary {
    pub team_a: String,
    pub team_b: String,
    pub score: Option<(u32, u32)>,
    pub penalties: Option<(u32, u32)>,
    pub winner: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub tournament_id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub state: TournamentState,
    pub sim_params: SimParams,
    pub teams: Vec<TeamSummary>,
    pub groups: Vec<GroupSummary>,
    pub knockout_rounds: Vec<Vec<FixtureSummary>>,
    pub champion: Option<String>,
}

fn name(teams: &[Team], id: usize) -> String {
    teams.get(id).map(|t| t.name.clone()).unwrap_or_default()
}

fn fixture(teams: &[Team], m: &Match) -> FixtureSummary {
    FixtureSummary {
        team_a: name(teams, m.team_a),
        team_b: name(teams, m.team_b),
        score: m.final_score,
        penalties: m.penalties.as_ref().map(|p| (p.score_a, p.score_b)),
        winner: m.winner().map(|id| name(teams, id)),
    }
}

/// Shape the current tournament state into a snapshot. Works at any phase.
pub fn export_snapshot(tournament: &Tournament) -> Snapshot {
    let teams = &tournament.teams;
    Snapshot {
        tournament_id: tournament.id,
        created_at: tournament.created_at,
        state: tournament.state,
        sim_params: SimParams {
            delay_ms: tournament.config.delay_ms,
            base_goal_rate: tournament.config.base_goal_rate,
            use_ratings: tournament.config.use_ratings,
        },
        teams: teams
            .iter()
            .map(|t| TeamSummary {
                name: t.name.clone(),
                rating: t.rating,
                group: t.group.clone(),
                eliminated: t.eliminated,
                points: t.points,
                goal_diff: t.goal_diff,
                stats: t.stats.clone(),
                goals_per_90: t.stats.per_90(StatKind::GoalsFor),
            })
            .collect(),
        groups: tournament
            .groups
            .iter()
            .map(|g| GroupSummary {
                name: g.name.clone(),
                teams: g.teams.iter().map(|&id| name(teams, id)).collect(),
                matches_played: g.matches.iter().filter(|m| m.final_score.is_some()).count(),
                standings: g.standings.as_ref().map(|order| {
                    order
                        .iter()
                        .filter_map(|&id| teams.get(id))
                        .map(|t| StandingRow {
                            team: t.name.clone(),
                            points: t.points,
                            goal_diff: t.goal_diff,
                        })
                        .collect()
                }),
            })
            .collect(),
        knockout_rounds: (0..tournament.bracket.rounds.len())
            .map(|r| {
                tournament
                    .bracket
                    .round(r)
                    .map(|slot| fixture(teams, &slot.fixture))
                    .collect()
            })
            .collect(),
        champion: tournament.champion.map(|id| name(teams, id)),
    }
}

/// Snapshot rendered as pretty JSON.
pub fn snapshot_json(tournament: &Tournament) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&export_snapshot(tournament))
}
