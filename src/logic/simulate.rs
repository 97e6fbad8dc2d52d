//! Whole-tournament orchestration and the random source handle.

use crate::logic::group_play::simulate_group_stage;
use crate::logic::knockout::simulate_knockout_stage;
use crate::logic::narration::{EventSink, Narration};
use crate::logic::setup::start_tournament;
use crate::models::{TeamId, Tournament, TournamentError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Random source used by the binary and tests.
pub type SimRng = ChaCha8Rng;

pub fn seeded_rng(seed: u64) -> SimRng {
    SimRng::seed_from_u64(seed)
}

pub fn entropy_rng() -> SimRng {
    SimRng::from_entropy()
}

/// Group stage, round-of-16 seeding, knockout rounds. Returns the champion.
///
/// The tournament must be in Setup; it ends in Completed.
pub fn simulate_tournament<R: Rng + ?Sized, S: EventSink + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
    sink: &mut S,
) -> Result<TeamId, TournamentError> {
    start_tournament(tournament)?;
    log::info!("Simulating tournament {} ({} teams)", tournament.id, tournament.teams.len());

    let qualifiers = simulate_group_stage(tournament, rng, sink)?;
    let champion = simulate_knockout_stage(tournament, &qualifiers, rng, sink)?;

    let name = tournament.team(champion)?.name.clone();
    sink.emit(&Narration::Champion { name });
    Ok(champion)
}
