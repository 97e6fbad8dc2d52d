//! Match, MatchEvent, MatchState and the enums describing a fixture.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Minutes credited to each side for every match (no extra time is modeled).
pub const MATCH_MINUTES: u32 = 90;

/// Which side of a fixture an event or outcome belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Phase of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    Group,
    RoundOf16,
    QuarterFinals,
    SemiFinals,
    Final,
}

impl RoundType {
    pub fn is_knockout(self) -> bool {
        self != RoundType::Group
    }

    /// Knockout round for a field of `teams` teams (16, 8, 4 or 2).
    pub fn for_field(teams: usize) -> Option<RoundType> {
        match teams {
            16 => Some(RoundType::RoundOf16),
            8 => Some(RoundType::QuarterFinals),
            4 => Some(RoundType::SemiFinals),
            2 => Some(RoundType::Final),
            _ => None,
        }
    }

    /// Short label used in narration headers.
    pub fn label(self) -> &'static str {
        match self {
            RoundType::Group => "group",
            RoundType::RoundOf16 => "16",
            RoundType::QuarterFinals => "8",
            RoundType::SemiFinals => "4",
            RoundType::Final => "final",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Goal,
    Attempt,
    Yellow,
    Red,
    Sub,
    PenaltyTaken,
    ExtraTimeStart,
    ExtraTimeEnd,
}

/// One entry of a match timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// 0..=90.
    pub minute: u32,
    pub kind: EventKind,
    pub side: Side,
    pub player: Option<String>,
    /// Free-form extras, e.g. `shot_xg` or `assist`.
    #[serde(default)]
    pub meta: BTreeMap<String, serde_json::Value>,
}

impl MatchEvent {
    pub fn new(minute: u32, kind: EventKind, side: Side) -> Self {
        Self {
            minute,
            kind,
            side,
            player: None,
            meta: BTreeMap::new(),
        }
    }

    pub fn with_player(mut self, player: impl Into<String>) -> Self {
        self.player = Some(player.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    /// Expected-goals value carried by a shot event, if any.
    pub fn shot_xg(&self) -> Option<f64> {
        match self.kind {
            EventKind::Goal | EventKind::Attempt => {
                self.meta.get("shot_xg").and_then(|v| v.as_f64())
            }
            _ => None,
        }
    }
}

/// Transient per-match state, rebuilt from the timeline on every replay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchState {
    pub current_minute: u32,
    pub score_a: u32,
    pub score_b: u32,
    pub yellow_a: u32,
    pub yellow_b: u32,
    pub red_a: u32,
    pub red_b: u32,
    pub attack_mod_a: f64,
    pub attack_mod_b: f64,
    pub def_mod_a: f64,
    pub def_mod_b: f64,
}

impl MatchState {
    /// Attack penalty applied to a side for each red card.
    pub const RED_CARD_ATTACK_PENALTY: f64 = 0.1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the running state.
    pub fn apply(&mut self, event: &MatchEvent) {
        self.current_minute = event.minute;
        match (event.kind, event.side) {
            (EventKind::Goal, Side::A) => self.score_a += 1,
            (EventKind::Goal, Side::B) => self.score_b += 1,
            (EventKind::Yellow, Side::A) => self.yellow_a += 1,
            (EventKind::Yellow, Side::B) => self.yellow_b += 1,
            (EventKind::Red, Side::A) => {
                self.red_a += 1;
                self.attack_mod_a -= Self::RED_CARD_ATTACK_PENALTY;
            }
            (EventKind::Red, Side::B) => {
                self.red_b += 1;
                self.attack_mod_b -= Self::RED_CARD_ATTACK_PENALTY;
            }
            _ => {}
        }
    }

    pub fn score(&self) -> (u32, u32) {
        (self.score_a, self.score_b)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchResult {
    AWin,
    BWin,
    Draw,
}

impl MatchResult {
    pub fn from_score(score_a: u32, score_b: u32) -> Self {
        if score_a > score_b {
            MatchResult::AWin
        } else if score_b > score_a {
            MatchResult::BWin
        } else {
            MatchResult::Draw
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            MatchResult::AWin => Some(Side::A),
            MatchResult::BWin => Some(Side::B),
            MatchResult::Draw => None,
        }
    }
}

/// Lifecycle of a single fixture.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    /// Created, no timeline yet.
    #[default]
    Pending,
    /// Timeline generated, not yet replayed.
    Scheduled,
    /// Events being applied.
    InProgress,
    /// Score and result fixed.
    Finalized,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShootoutResult {
    pub score_a: u32,
    pub score_b: u32,
    pub winner: Side,
    pub rounds: u32,
    /// Settled by the configured round cap rather than by the kicks.
    pub capped: bool,
}

/// A single fixture between two teams.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub round: RoundType,
    pub phase: MatchPhase,
    /// Sorted by minute once generated.
    pub events: Vec<MatchEvent>,
    pub final_score: Option<(u32, u32)>,
    pub result: Option<MatchResult>,
    pub penalties: Option<ShootoutResult>,
    /// Whether team stats have already absorbed this match.
    pub stats_recorded: bool,
}

impl Match {
    pub fn new(team_a: TeamId, team_b: TeamId, round: RoundType) -> Self {
        Self {
            team_a,
            team_b,
            round,
            phase: MatchPhase::Pending,
            events: Vec::new(),
            final_score: None,
            result: None,
            penalties: None,
            stats_recorded: false,
        }
    }

    /// Use a pre-built timeline instead of generating one. Events are sorted by minute.
    pub fn with_timeline(mut self, mut events: Vec<MatchEvent>) -> Self {
        events.sort_by_key(|e| e.minute);
        self.events = events;
        self.phase = MatchPhase::Scheduled;
        self
    }

    pub fn is_group(&self) -> bool {
        !self.round.is_knockout()
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::A => self.team_a,
            Side::B => self.team_b,
        }
    }

    /// Winning side: by result, or by shootout for a knockout draw.
    pub fn winner_side(&self) -> Option<Side> {
        match self.result? {
            MatchResult::Draw => self.penalties.as_ref().map(|p| p.winner),
            decided => decided.winner(),
        }
    }

    pub fn winner(&self) -> Option<TeamId> {
        self.winner_side().map(|s| self.team(s))
    }

    pub fn loser(&self) -> Option<TeamId> {
        self.winner_side().map(|s| self.team(s.other()))
    }

    /// Cards shown to `side` in the timeline: (yellow, red).
    pub fn cards(&self, side: Side) -> (u32, u32) {
        self.events
            .iter()
            .filter(|e| e.side == side)
            .fold((0, 0), |(y, r), e| match e.kind {
                EventKind::Yellow => (y + 1, r),
                EventKind::Red => (y, r + 1),
                _ => (y, r),
            })
    }

    /// Sum of `shot_xg` metadata on `side`'s shot events.
    pub fn expected_goals(&self, side: Side) -> f64 {
        self.events
            .iter()
            .filter(|e| e.side == side)
            .filter_map(MatchEvent::shot_xg)
            .sum()
    }
}
