//! Tournament and TournamentState.

use crate::config::SimConfig;
use crate::models::bracket::Bracket;
use crate::models::group::Group;
use crate::models::team::{Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur while loading or simulating a tournament.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Roster source missing, malformed, or not shaped 8 groups x 4 teams.
    DataLoad(String),
    /// A group was assembled with a number of teams other than four.
    InvalidGroupSize { group: String, size: usize },
    /// A knockout round got an odd or empty team list, or seeding got the wrong count.
    InvalidBracket { teams: usize },
    /// Tournament or match is not in a state that allows this action.
    InvalidState,
    /// Team index outside the team arena.
    TeamNotFound(TeamId),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::DataLoad(msg) => write!(f, "Could not load roster: {}", msg),
            TournamentError::InvalidGroupSize { group, size } => {
                write!(f, "{} has {} teams, expected 4", group, size)
            }
            TournamentError::InvalidBracket { teams } => {
                write!(f, "Cannot pair {} teams into a knockout round", teams)
            }
            TournamentError::InvalidState => write!(f, "Invalid state for this action"),
            TournamentError::TeamNotFound(id) => write!(f, "Team {} not found", id),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament run.
pub type TournamentId = Uuid;

/// Current phase of the tournament.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentState {
    /// Teams and groups built; nothing played.
    #[default]
    Setup,
    /// Round-robin in the eight groups.
    GroupStage,
    /// Single elimination from the round of 16.
    Knockout,
    /// Champion decided.
    Completed,
}

/// Full tournament state: teams, groups, bracket and phase.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub created_at: DateTime<Utc>,
    pub config: SimConfig,
    /// Team arena; `TeamId` indexes into it.
    pub teams: Vec<Team>,
    pub groups: Vec<Group>,
    pub bracket: Bracket,
    pub state: TournamentState,
    pub champion: Option<TeamId>,
}

impl Tournament {
    /// Create an empty tournament in Setup state.
    pub fn new(config: SimConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            config,
            teams: Vec::new(),
            groups: Vec::new(),
            bracket: Bracket::new(),
            state: TournamentState::Setup,
            champion: None,
        }
    }

    pub fn team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.teams.get(id).ok_or(TournamentError::TeamNotFound(id))
    }

    pub fn team_mut(&mut self, id: TeamId) -> Result<&mut Team, TournamentError> {
        self.teams.get_mut(id).ok_or(TournamentError::TeamNotFound(id))
    }

    pub fn team_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    pub fn group(&self, letter: &str) -> Option<&Group> {
        self.groups
            .iter()
            .find(|g| g.name.strip_prefix("Group ") == Some(letter))
    }
}
