//! Knockout rounds: round-of-16 seeding and single-elimination advancement.

use crate::logic::match_play::run_match;
use crate::logic::narration::{EventSink, Narration};
use crate::models::{Match, RoundType, TeamId, Tournament, TournamentError, TournamentState};
use rand::Rng;

/// Round-of-16 pairings as indexes into the qualifier list (A1, A2, B1, B2, ...):
/// A1-B2, C1-D2, E1-F2, G1-H2, B1-A2, D1-C2, F1-E2, H1-G2.
pub const R16_SEEDING: [(usize, usize); 8] = [
    (0, 3),
    (4, 7),
    (8, 11),
    (12, 15),
    (2, 1),
    (6, 5),
    (10, 9),
    (14, 13),
];

/// Flatten the 16 qualifiers into round-of-16 order so that `teams[2i]` meets `teams[2i + 1]`.
pub fn seed_round_of_16(qualifiers: &[TeamId]) -> Result<Vec<TeamId>, TournamentError> {
    if qualifiers.len() != R16_SEEDING.len() * 2 {
        return Err(TournamentError::InvalidBracket {
            teams: qualifiers.len(),
        });
    }
    Ok(R16_SEEDING
        .iter()
        .flat_map(|&(a, b)| [qualifiers[a], qualifiers[b]])
        .collect())
}

/// Play `teams[0]` vs `teams[1]`, `teams[2]` vs `teams[3]`, ... and return the winners
/// in pairing order. Losers are flagged eliminated, winners cleared. The round is
/// recorded in the tournament bracket.
pub fn simulate_knockout_round<R: Rng + ?Sized, S: EventSink + ?Sized>(
    tournament: &mut Tournament,
    teams: &[TeamId],
    round: RoundType,
    rng: &mut R,
    sink: &mut S,
) -> Result<Vec<TeamId>, TournamentError> {
    if tournament.state != TournamentState::Knockout {
        return Err(TournamentError::InvalidState);
    }
    if teams.is_empty() || teams.len() % 2 != 0 {
        return Err(TournamentError::InvalidBracket { teams: teams.len() });
    }
    sink.emit(&Narration::RoundStarted {
        label: round.label().to_string(),
    });

    let mut fixtures = Vec::with_capacity(teams.len() / 2);
    let mut winners = Vec::with_capacity(teams.len() / 2);
    for pair in teams.chunks_exact(2) {
        let mut m = Match::new(pair[0], pair[1], round);
        run_match(&mut m, &mut tournament.teams, &tournament.config, rng, sink)?;

        let winner = m.winner().ok_or(TournamentError::InvalidState)?;
        let loser = m.loser().ok_or(TournamentError::InvalidState)?;
        tournament.team_mut(winner)?.reinstate();
        tournament.team_mut(loser)?.eliminate();
        winners.push(winner);
        fixtures.push(m);
    }

    tournament.bracket.push_round(round, fixtures);
    Ok(winners)
}

/// Run the bracket from the seeded round of 16 down to the final. Moves Knockout -> Completed.
pub fn simulate_knockout_stage<R: Rng + ?Sized, S: EventSink + ?Sized>(
    tournament: &mut Tournament,
    qualifiers: &[TeamId],
    rng: &mut R,
    sink: &mut S,
) -> Result<TeamId, TournamentError> {
    let mut field = seed_round_of_16(qualifiers)?;
    while field.len() > 1 {
        let round = RoundType::for_field(field.len())
            .ok_or(TournamentError::InvalidBracket { teams: field.len() })?;
        field = simulate_knockout_round(tournament, &field, round, rng, sink)?;
    }
    let champion = field[0];
    tournament.champion = Some(champion);
    tournament.state = TournamentState::Completed;
    Ok(champion)
}
