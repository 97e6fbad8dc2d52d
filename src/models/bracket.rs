//! Knockout bracket stored as an arena of round-indexed match slots.

use crate::models::game::{Match, RoundType};
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};

/// Index of a slot in `Bracket::slots`.
pub type SlotId = usize;

/// A played knockout fixture and where its teams came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketSlot {
    pub round: RoundType,
    pub fixture: Match,
    /// Slots of the previous round that produced this fixture's teams.
    pub feeders: Option<(SlotId, SlotId)>,
    pub winner: Option<TeamId>,
}

impl BracketSlot {
    /// Resolve (and cache) the winner once the match has a result.
    pub fn compute_winner(&mut self) -> Option<TeamId> {
        if self.winner.is_none() {
            self.winner = self.fixture.winner();
        }
        self.winner
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub slots: Vec<BracketSlot>,
    /// Slot ids per round, in pairing order.
    pub rounds: Vec<Vec<SlotId>>,
}

impl Bracket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a played round. Slot `i` is fed by slots `2i`, `2i + 1` of the previous
    /// round when that round had exactly twice as many fixtures.
    pub fn push_round(&mut self, round: RoundType, fixtures: Vec<Match>) -> &[SlotId] {
        let previous = self.rounds.last().cloned();
        let fed = previous
            .as_ref()
            .filter(|prev| prev.len() == fixtures.len() * 2);
        let mut ids = Vec::with_capacity(fixtures.len());
        for (i, fixture) in fixtures.into_iter().enumerate() {
            let mut slot = BracketSlot {
                round,
                fixture,
                feeders: fed.map(|prev| (prev[2 * i], prev[2 * i + 1])),
                winner: None,
            };
            slot.compute_winner();
            ids.push(self.slots.len());
            self.slots.push(slot);
        }
        self.rounds.push(ids);
        self.rounds.last().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn slot(&self, id: SlotId) -> Option<&BracketSlot> {
        self.slots.get(id)
    }

    /// Slots of the `index`-th played round, in pairing order.
    pub fn round(&self, index: usize) -> impl Iterator<Item = &BracketSlot> {
        self.rounds
            .get(index)
            .into_iter()
            .flatten()
            .filter_map(|&id| self.slots.get(id))
    }

    /// Winner of the last round if it was a single fixture.
    pub fn champion(&self) -> Option<TeamId> {
        match self.rounds.last()?.as_slice() {
            [only] => self.slots.get(*only)?.winner,
            _ => None,
        }
    }
}
