//! Group: four teams, a round-robin schedule and the resulting standings.

use crate::models::game::{Match, MatchPhase, RoundType};
use crate::models::team::{Team, TeamId};
use crate::models::tournament::TournamentError;
use serde::{Deserialize, Serialize};

/// Number of teams in every group.
pub const GROUP_SIZE: usize = 4;

/// Unique pairs among `GROUP_SIZE` teams.
pub const GROUP_MATCHES: usize = GROUP_SIZE * (GROUP_SIZE - 1) / 2;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// e.g. "Group A".
    pub name: String,
    pub teams: Vec<TeamId>,
    pub matches: Vec<Match>,
    /// Set once every match has been played.
    pub standings: Option<Vec<TeamId>>,
}

impl Group {
    /// Create a group; it must have exactly four teams.
    pub fn new(name: impl Into<String>, teams: Vec<TeamId>) -> Result<Self, TournamentError> {
        let name = name.into();
        if teams.len() != GROUP_SIZE {
            return Err(TournamentError::InvalidGroupSize {
                group: name,
                size: teams.len(),
            });
        }
        Ok(Self {
            name,
            teams,
            matches: Vec::new(),
            standings: None,
        })
    }

    /// Round-robin: every pair of members plays once, in member order (0-1, 0-2, 0-3, 1-2, ...).
    /// Replaces any previous schedule.
    pub fn schedule_matches(&mut self) {
        let teams = &self.teams;
        self.matches = (0..teams.len())
            .flat_map(|i| (i + 1..teams.len()).map(move |j| (i, j)))
            .map(|(i, j)| Match::new(teams[i], teams[j], RoundType::Group))
            .collect();
        self.standings = None;
    }

    pub fn all_played(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.phase == MatchPhase::Finalized)
    }

    /// Sort members by (points, goal difference) descending and return the top two.
    /// Requires every scheduled match to be finalized.
    pub fn compute_standings(&mut self, teams: &[Team]) -> Result<[TeamId; 2], TournamentError> {
        if !self.all_played() {
            return Err(TournamentError::InvalidState);
        }
        let order = rank_teams(&self.teams, teams)?;
        let top = [order[0], order[1]];
        self.standings = Some(order);
        Ok(top)
    }
}

/// Order `ids` by (points, goal_diff) descending. Stable: exact ties keep input order.
pub fn rank_teams(ids: &[TeamId], teams: &[Team]) -> Result<Vec<TeamId>, TournamentError> {
    let mut keyed = ids
        .iter()
        .map(|&id| {
            let t = teams.get(id).ok_or(TournamentError::TeamNotFound(id))?;
            Ok((id, t.points, t.goal_diff))
        })
        .collect::<Result<Vec<_>, TournamentError>>()?;
    keyed.sort_by(|a, b| (b.1, b.2).cmp(&(a.1, a.2)));
    Ok(keyed.into_iter().map(|(id, _, _)| id).collect())
}
