//! Progress narration and the sinks that receive it.
//!
//! The simulation emits a `Narration` for every applied event, finished match,
//! shootout round and stage boundary. Sinks never touch the random source, so the
//! outcome of a run is the same whichever sink is plugged in.

use crate::config::SimConfig;
use crate::models::{EventKind, MatchEvent};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// One progress message from the simulation.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Narration {
    EventApplied {
        team_a: String,
        team_b: String,
        event: MatchEvent,
        score: (u32, u32),
    },
    MatchFinished {
        team_a: String,
        team_b: String,
        score: (u32, u32),
    },
    ShootoutStarted,
    ShootoutRound {
        round: u32,
        total_a: u32,
        total_b: u32,
    },
    ShootoutFinished {
        team_a: String,
        total_a: u32,
        team_b: String,
        total_b: u32,
    },
    GroupFinished {
        group: String,
        points: Vec<u32>,
        goal_diffs: Vec<i32>,
        winner: String,
        runner_up: String,
    },
    RoundStarted {
        label: String,
    },
    Champion {
        name: String,
    },
}

impl fmt::Display for Narration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narration::EventApplied {
                team_a,
                team_b,
                event,
                score,
            } => {
                let team = match event.side {
                    crate::models::Side::A => team_a,
                    crate::models::Side::B => team_b,
                };
                write!(f, "{}' {} {}", event.minute, event_label(event.kind), team)?;
                if let Some(player) = &event.player {
                    write!(f, " ({})", player)?;
                }
                write!(f, " ({}-{})", score.0, score.1)
            }
            Narration::MatchFinished {
                team_a,
                team_b,
                score,
            } => write!(f, "{} - {} {} - {}", team_a, team_b, score.0, score.1),
            Narration::ShootoutStarted => write!(f, " play penalties"),
            Narration::ShootoutRound {
                round,
                total_a,
                total_b,
            } => write!(f, "{} {} {}", total_a, total_b, round),
            Narration::ShootoutFinished {
                team_a,
                total_a,
                team_b,
                total_b,
            } => write!(f, "Penalty score {} {} {} {}", team_a, total_a, team_b, total_b),
            Narration::GroupFinished {
                group: _,
                points,
                goal_diffs,
                winner,
                runner_up,
            } => {
                writeln!(f, "Games finished!")?;
                writeln!(f, "{:?}", points)?;
                writeln!(f, "{:?}", goal_diffs)?;
                writeln!(f, "winner {}", winner)?;
                write!(f, "Runner-up {}", runner_up)
            }
            Narration::RoundStarted { label } => write!(f, " knockout {} stage", label),
            Narration::Champion { name } => write!(f, "Champion: {}", name),
        }
    }
}

fn event_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::Goal => "GOAL",
        EventKind::Attempt => "ATTEMPT",
        EventKind::Yellow => "YELLOW",
        EventKind::Red => "RED",
        EventKind::Sub => "SUB",
        EventKind::PenaltyTaken => "PENALTY_TAKEN",
        EventKind::ExtraTimeStart => "EXTRA_TIME_START",
        EventKind::ExtraTimeEnd => "EXTRA_TIME_END",
    }
}

/// Receiver of simulation progress.
pub trait EventSink {
    fn emit(&mut self, note: &Narration);
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, note: &Narration) {
        (**self).emit(note)
    }
}

/// Discards everything; instant batch execution.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentSink;

impl EventSink for SilentSink {
    fn emit(&mut self, _note: &Narration) {}
}

/// Writes narration to the `log` facade and paces replay with a blocking sleep.
#[derive(Clone, Debug, Default)]
pub struct LogSink {
    delay: Duration,
}

impl LogSink {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self::new(config.delay())
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, note: &Narration) {
        match note {
            Narration::EventApplied { .. } => {
                log::debug!("{}", note);
                self.pause();
            }
            Narration::ShootoutRound { .. } => {
                log::info!("{}", note);
                self.pause();
            }
            _ => {
                for line in note.to_string().lines() {
                    log::info!("{}", line);
                }
            }
        }
    }
}

/// Forwards narration to an async consumer over an unbounded channel.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: UnboundedSender<Narration>,
}

impl ChannelSink {
    pub fn new(tx: UnboundedSender<Narration>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, note: &Narration) {
        if self.tx.send(note.clone()).is_err() {
            log::trace!("narration receiver dropped");
        }
    }
}

/// Keeps every narration in memory.
#[derive(Clone, Debug, Default)]
pub struct RecordingSink {
    pub notes: Vec<Narration>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered text of every message, in order.
    pub fn lines(&self) -> Vec<String> {
        self.notes.iter().map(ToString::to_string).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, note: &Narration) {
        self.notes.push(note.clone());
    }
}
