//! Team: a country that persists across the whole tournament.

use crate::models::stats::Stats;
use serde::{Deserialize, Serialize};

/// Index of a team in the tournament's team arena.
pub type TeamId = usize;

/// A team in the tournament.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Strength rating ("elo") driving the score draws.
    pub rating: u32,
    /// Group letter, "A".."H".
    pub group: String,
    pub eliminated: bool,
    pub stats: Stats,
    /// Group-stage points only.
    pub points: u32,
    /// Group-stage goal difference only.
    pub goal_diff: i32,
}

impl Team {
    /// Create a new team. Stats and group-stage tracking start at zero.
    pub fn new(id: TeamId, name: impl Into<String>, rating: u32, group: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rating,
            group: group.into(),
            eliminated: false,
            stats: Stats::default(),
            points: 0,
            goal_diff: 0,
        }
    }

    pub fn add_goals(&mut self, n: u32) {
        self.stats.goals_for += n;
    }

    pub fn concede_goals(&mut self, n: u32) {
        self.stats.goals_against += n;
    }

    pub fn add_minutes(&mut self, minutes: u32) {
        self.stats.minutes_played += minutes;
    }

    /// Mark the team as knocked out.
    pub fn eliminate(&mut self) {
        self.eliminated = true;
    }

    /// Clear the eliminated flag after a knockout win.
    pub fn reinstate(&mut self) {
        self.eliminated = false;
    }
}
