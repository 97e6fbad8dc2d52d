//! Setup phase: roster loading, validation, and building the tournament.

use crate::config::SimConfig;
use crate::models::{Group, Team, Tournament, TournamentError, TournamentState, GROUP_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Group letters in play order.
pub const GROUP_LETTERS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// One line of a team roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    #[serde(alias = "elo")]
    pub rating: u32,
    pub group: String,
}

impl RosterEntry {
    pub fn new(name: impl Into<String>, rating: u32, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating,
            group: group.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterFile {
    Wrapped { teams: Vec<RosterEntry> },
    Bare(Vec<RosterEntry>),
}

/// Read a roster from a `.json` or `.csv` file and validate its shape.
pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<RosterEntry>, TournamentError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let file = File::open(path)
        .map_err(|e| TournamentError::DataLoad(format!("{}: {}", path.display(), e)))?;

    let roster = match ext.as_deref() {
        Some("json") => parse_json_roster(file)?,
        Some("csv") => parse_csv_roster(file)?,
        _ => {
            return Err(TournamentError::DataLoad(format!(
                "{}: expected a .json or .csv file",
                path.display()
            )))
        }
    };
    validate_roster(&roster)?;
    log::info!("Loaded {} teams from {}", roster.len(), path.display());
    Ok(roster)
}

/// Parse `{"teams": [...]}` or a bare array of entries.
pub fn parse_json_roster(reader: impl std::io::Read) -> Result<Vec<RosterEntry>, TournamentError> {
    let parsed: RosterFile =
        serde_json::from_reader(reader).map_err(|e| TournamentError::DataLoad(e.to_string()))?;
    Ok(match parsed {
        RosterFile::Wrapped { teams } => teams,
        RosterFile::Bare(teams) => teams,
    })
}

/// Parse CSV with a `name,rating,group` header.
pub fn parse_csv_roster(reader: impl std::io::Read) -> Result<Vec<RosterEntry>, TournamentError> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize()
        .collect::<Result<Vec<RosterEntry>, csv::Error>>()
        .map_err(|e| TournamentError::DataLoad(e.to_string()))
}

/// Require 8 groups "A".."H" of exactly 4 teams, unique names, positive ratings.
pub fn validate_roster(roster: &[RosterEntry]) -> Result<(), TournamentError> {
    let mut names = HashSet::new();
    for entry in roster {
        if entry.name.trim().is_empty() {
            return Err(TournamentError::DataLoad("team with empty name".to_string()));
        }
        if !names.insert(entry.name.trim()) {
            return Err(TournamentError::DataLoad(format!(
                "duplicate team name: {}",
                entry.name.trim()
            )));
        }
        if entry.rating == 0 {
            return Err(TournamentError::DataLoad(format!(
                "{} has a non-positive rating",
                entry.name
            )));
        }
        if !GROUP_LETTERS.contains(&entry.group.as_str()) {
            return Err(TournamentError::DataLoad(format!(
                "{} is in unknown group {:?}",
                entry.name, entry.group
            )));
        }
    }
    for letter in GROUP_LETTERS {
        let count = roster.iter().filter(|e| e.group == letter).count();
        if count != GROUP_SIZE {
            return Err(TournamentError::DataLoad(format!(
                "group {} has {} teams, expected {}",
                letter, count, GROUP_SIZE
            )));
        }
    }
    Ok(())
}

/// Built-in 32-team roster used when no source is given.
pub fn fallback_roster() -> Vec<RosterEntry> {
    [
        ("Russia", 18, "A"),
        ("Saudi Arabia", 10, "A"),
        ("Uruguay", 54, "A"),
        ("Egypt", 42, "A"),
        ("Portugal", 57, "B"),
        ("Spain", 58, "B"),
        ("Morocco", 20, "B"),
        ("Iran", 8, "B"),
        ("France", 83, "C"),
        ("Peru", 34, "C"),
        ("Denmark", 42, "C"),
        ("Australia", 15, "C"),
        ("Argentina", 57, "D"),
        ("Iceland", 40, "D"),
        ("Croatia", 45, "D"),
        ("Nigeria", 38, "D"),
        ("Brazil", 87, "E"),
        ("Switzerland", 40, "E"),
        ("Costa Rica", 38, "E"),
        ("Serbia", 33, "E"),
        ("Germany", 85, "F"),
        ("Mexico", 40, "F"),
        ("Sweden", 41, "F"),
        ("South Korea", 38, "F"),
        ("Belgium", 70, "G"),
        ("Panama", 35, "G"),
        ("Tunisia", 24, "G"),
        ("England", 65, "G"),
        ("Poland", 50, "H"),
        ("Colombia", 60, "H"),
        ("Senegal", 45, "H"),
        ("Japan", 38, "H"),
    ]
    .into_iter()
    .map(|(name, rating, group)| RosterEntry::new(name, rating, group))
    .collect()
}

/// Create the team arena (roster order) and groups "Group A".."Group H".
pub fn build_tournament(
    roster: &[RosterEntry],
    config: SimConfig,
) -> Result<Tournament, TournamentError> {
    validate_roster(roster)?;
    let mut tournament = Tournament::new(config);
    tournament.teams = roster
        .iter()
        .enumerate()
        .map(|(id, e)| Team::new(id, e.name.trim(), e.rating, e.group.as_str()))
        .collect();
    for letter in GROUP_LETTERS {
        let members = tournament
            .teams
            .iter()
            .filter(|t| t.group == letter)
            .map(|t| t.id)
            .collect();
        tournament
            .groups
            .push(Group::new(format!("Group {}", letter), members)?);
    }
    Ok(tournament)
}

/// Start the tournament: Setup -> GroupStage. Every group must be full.
pub fn start_tournament(tournament: &mut Tournament) -> Result<(), TournamentError> {
    if tournament.state != TournamentState::Setup {
        return Err(TournamentError::InvalidState);
    }
    if tournament.groups.len() != GROUP_LETTERS.len() {
        return Err(TournamentError::DataLoad(format!(
            "expected {} groups, found {}",
            GROUP_LETTERS.len(),
            tournament.groups.len()
        )));
    }
    if let Some(g) = tournament.groups.iter().find(|g| g.teams.len() != GROUP_SIZE) {
        return Err(TournamentError::InvalidGroupSize {
            group: g.name.clone(),
            size: g.teams.len(),
        });
    }
    tournament.state = TournamentState::GroupStage;
    Ok(())
}
