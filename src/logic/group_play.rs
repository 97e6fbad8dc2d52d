//! Group stage: round-robin play and standings.

use crate::logic::match_play::run_match;
use crate::logic::narration::{EventSink, Narration};
use crate::models::{TeamId, Tournament, TournamentError, TournamentState};
use rand::Rng;

/// Schedule and play every match of group `index`, then compute its standings.
/// Returns (winner, runner-up).
///
/// Only valid during the group stage, and only once per group.
pub fn play_group<R: Rng + ?Sized, S: EventSink + ?Sized>(
    tournament: &mut Tournament,
    index: usize,
    rng: &mut R,
    sink: &mut S,
) -> Result<[TeamId; 2], TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    let Tournament {
        teams,
        groups,
        config,
        ..
    } = tournament;
    let group = groups.get_mut(index).ok_or(TournamentError::InvalidState)?;
    if group.standings.is_some() {
        return Err(TournamentError::InvalidState);
    }

    group.schedule_matches();
    for m in &mut group.matches {
        run_match(m, teams, config, rng, sink)?;
    }
    let top = group.compute_standings(teams)?;

    let (mut points, mut goal_diffs) = (Vec::new(), Vec::new());
    for &id in &group.teams {
        let t = teams.get(id).ok_or(TournamentError::TeamNotFound(id))?;
        points.push(t.points);
        goal_diffs.push(t.goal_diff);
    }
    let name_of = |id: TeamId| teams.get(id).map(|t| t.name.clone()).unwrap_or_default();
    sink.emit(&Narration::GroupFinished {
        group: group.name.clone(),
        points,
        goal_diffs,
        winner: name_of(top[0]),
        runner_up: name_of(top[1]),
    });
    log::debug!("{} qualifiers: {:?}", group.name, top);
    Ok(top)
}

/// Play all groups in order. Qualifiers come back as A1, A2, B1, B2, ..., H1, H2.
///
/// Moves GroupStage -> Knockout.
pub fn simulate_group_stage<R: Rng + ?Sized, S: EventSink + ?Sized>(
    tournament: &mut Tournament,
    rng: &mut R,
    sink: &mut S,
) -> Result<Vec<TeamId>, TournamentError> {
    if tournament.state != TournamentState::GroupStage {
        return Err(TournamentError::InvalidState);
    }
    let mut qualifiers = Vec::with_capacity(tournament.groups.len() * 2);
    for index in 0..tournament.groups.len() {
        qualifiers.extend(play_group(tournament, index, rng, sink)?);
    }
    tournament.state = TournamentState::Knockout;
    Ok(qualifiers)
}
