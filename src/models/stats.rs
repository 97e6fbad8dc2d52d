//! Cumulative per-team statistics and per-90 normalization.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Counting stats that can be normalized per 90 minutes.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    GoalsFor,
    GoalsAgainst,
    MinutesPlayed,
    MatchesPlayed,
    CleanSheets,
    YellowCount,
    RedCount,
    ExpectedGoals,
}

impl StatKind {
    pub const ALL: [StatKind; 8] = [
        StatKind::GoalsFor,
        StatKind::GoalsAgainst,
        StatKind::MinutesPlayed,
        StatKind::MatchesPlayed,
        StatKind::CleanSheets,
        StatKind::YellowCount,
        StatKind::RedCount,
        StatKind::ExpectedGoals,
    ];
}

impl FromStr for StatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GF" | "goals_for" => Ok(StatKind::GoalsFor),
            "GA" | "goals_against" => Ok(StatKind::GoalsAgainst),
            "minutes_played" => Ok(StatKind::MinutesPlayed),
            "matches_played" => Ok(StatKind::MatchesPlayed),
            "clean_sheets" => Ok(StatKind::CleanSheets),
            "yellow_count" => Ok(StatKind::YellowCount),
            "red_count" => Ok(StatKind::RedCount),
            "xG" | "expected_goals" => Ok(StatKind::ExpectedGoals),
            other => Err(format!("unknown stat: {other}")),
        }
    }
}

/// Running totals for one team across the whole tournament.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub goals_for: u32,
    pub goals_against: u32,
    pub minutes_played: u32,
    pub matches_played: u32,
    pub clean_sheets: u32,
    pub yellow_count: u32,
    pub red_count: u32,
    pub expected_goals: f64,
}

impl Stats {
    /// Raw value of a stat as a float.
    pub fn value(&self, kind: StatKind) -> f64 {
        match kind {
            StatKind::GoalsFor => self.goals_for as f64,
            StatKind::GoalsAgainst => self.goals_against as f64,
            StatKind::MinutesPlayed => self.minutes_played as f64,
            StatKind::MatchesPlayed => self.matches_played as f64,
            StatKind::CleanSheets => self.clean_sheets as f64,
            StatKind::YellowCount => self.yellow_count as f64,
            StatKind::RedCount => self.red_count as f64,
            StatKind::ExpectedGoals => self.expected_goals,
        }
    }

    /// `value / minutes_played * 90`, or 0 before any minutes are played.
    pub fn per_90(&self, kind: StatKind) -> f64 {
        if self.minutes_played == 0 {
            return 0.0;
        }
        self.value(kind) / self.minutes_played as f64 * 90.0
    }
}
