//! Match engine: timeline generation, replay, penalty shootouts and stat updates.
//!
//! A match moves Pending -> Scheduled (timeline generated) -> InProgress (events
//! being applied) -> Finalized (score and result fixed). Scores are decided when the
//! timeline is drawn; replay only folds the events into a fresh `MatchState`.

use crate::config::SimConfig;
use crate::logic::narration::{EventSink, Narration};
use crate::models::{
    EventKind, Match, MatchEvent, MatchPhase, MatchResult, MatchState, ShootoutResult, Side, Team,
    TournamentError, MATCH_MINUTES,
};
use rand::Rng;
use std::ops::RangeInclusive;

/// Rating gap above which the stronger side B is protected from upsets.
const UPSET_GAP: i64 = 20;
/// Chance an upset-prone draw is left alone.
const UPSET_ESCAPE: f64 = 0.01;
const MAX_YELLOWS: u32 = 4;
const YELLOW_MINUTES: RangeInclusive<u32> = 1..=90;
const RED_CARD_CHANCE: f64 = 0.08;
const RED_CARD_MINUTES: RangeInclusive<u32> = 20..=85;
const PENALTY_BASE: f64 = 0.92;
pub const MIN_SHOOTOUT_ROUNDS: u32 = 5;

fn goal_draw<R: Rng + ?Sized>(base_rate: f64, rating: u32, rng: &mut R) -> u32 {
    (base_rate * rng.gen::<f64>() * rating as f64 / 100.0).floor() as u32
}

fn random_side<R: Rng + ?Sized>(rng: &mut R) -> Side {
    if rng.gen_bool(0.5) {
        Side::A
    } else {
        Side::B
    }
}

/// Draw the final score for ratings `(rating_a, rating_b)`.
///
/// Each side scores `floor(rate * U * rating / 100)`. When B out-rates A by more than
/// 20, a level draw re-rolls A's score and an A lead is swapped, each with 99%
/// probability, so roughly 1% of those upsets survive.
pub fn draw_scores<R: Rng + ?Sized>(
    rating_a: u32,
    rating_b: u32,
    base_rate: f64,
    rng: &mut R,
) -> (u32, u32) {
    let mut score_a = goal_draw(base_rate, rating_a, rng);
    let score_b = goal_draw(base_rate, rating_b, rng);
    let b_favoured = rating_b as i64 - rating_a as i64 > UPSET_GAP;

    if score_a == score_b && b_favoured && rng.gen::<f64>() > UPSET_ESCAPE {
        score_a = goal_draw(base_rate, rating_a, rng);
    }
    if score_a > score_b && b_favoured && rng.gen::<f64>() > UPSET_ESCAPE {
        return (score_b, score_a);
    }
    (score_a, score_b)
}

/// Build the event timeline for `m` and move it to Scheduled.
pub fn generate_timeline<'m, R: Rng + ?Sized>(
    m: &'m mut Match,
    team_a: &Team,
    team_b: &Team,
    config: &SimConfig,
    rng: &mut R,
) -> Result<&'m [MatchEvent], TournamentError> {
    if !matches!(m.phase, MatchPhase::Pending | MatchPhase::Scheduled) {
        return Err(TournamentError::InvalidState);
    }
    let (score_a, score_b) = draw_scores(
        config.effective_rating(team_a.rating),
        config.effective_rating(team_b.rating),
        config.goal_rate(),
        rng,
    );

    let mut events = Vec::new();
    for (side, goals) in [(Side::A, score_a), (Side::B, score_b)] {
        for _ in 0..goals {
            events.push(MatchEvent::new(rng.gen_range(0..MATCH_MINUTES), EventKind::Goal, side));
        }
    }

    let yellows = rng.gen_range(0..=MAX_YELLOWS);
    for _ in 0..yellows {
        let minute = rng.gen_range(YELLOW_MINUTES);
        events.push(MatchEvent::new(minute, EventKind::Yellow, random_side(rng)));
    }

    if rng.gen::<f64>() < RED_CARD_CHANCE {
        let minute = rng.gen_range(RED_CARD_MINUTES);
        events.push(MatchEvent::new(minute, EventKind::Red, random_side(rng)));
    }

    events.sort_by_key(|e| e.minute);
    m.events = events;
    m.phase = MatchPhase::Scheduled;
    Ok(&m.events)
}

fn names(m: &Match, teams: &[Team]) -> Result<(String, String), TournamentError> {
    let a = teams.get(m.team_a).ok_or(TournamentError::TeamNotFound(m.team_a))?;
    let b = teams.get(m.team_b).ok_or(TournamentError::TeamNotFound(m.team_b))?;
    Ok((a.name.clone(), b.name.clone()))
}

/// Replay the timeline in minute order and fix the score and result.
pub fn play_match<S: EventSink + ?Sized>(
    m: &mut Match,
    teams: &[Team],
    sink: &mut S,
) -> Result<MatchResult, TournamentError> {
    if m.phase != MatchPhase::Scheduled {
        return Err(TournamentError::InvalidState);
    }
    let (team_a, team_b) = names(m, teams)?;
    m.phase = MatchPhase::InProgress;

    let mut state = MatchState::new();
    for event in &m.events {
        state.apply(event);
        sink.emit(&Narration::EventApplied {
            team_a: team_a.clone(),
            team_b: team_b.clone(),
            event: event.clone(),
            score: state.score(),
        });
    }

    let (score_a, score_b) = state.score();
    let result = MatchResult::from_score(score_a, score_b);
    m.final_score = Some((score_a, score_b));
    m.result = Some(result);
    m.phase = MatchPhase::Finalized;
    sink.emit(&Narration::MatchFinished {
        team_a,
        team_b,
        score: (score_a, score_b),
    });
    Ok(result)
}

fn penalty_kick<R: Rng + ?Sized>(rating: u32, rng: &mut R) -> u32 {
    (PENALTY_BASE + rng.gen::<f64>() * rating as f64 / 100.0).floor() as u32
}

/// Settle a drawn knockout match from the spot.
///
/// At least five rounds, then sudden death while the totals are level. With
/// `max_shootout_rounds` set, a tie that survives the cap is broken by one coin-flip
/// goal and the result is marked `capped`.
pub fn play_penalties<R: Rng + ?Sized, S: EventSink + ?Sized>(
    m: &mut Match,
    teams: &[Team],
    config: &SimConfig,
    rng: &mut R,
    sink: &mut S,
) -> Result<Side, TournamentError> {
    if m.phase != MatchPhase::Finalized
        || m.result != Some(MatchResult::Draw)
        || m.is_group()
        || m.penalties.is_some()
    {
        return Err(TournamentError::InvalidState);
    }
    let rating_of = |id| {
        teams
            .get(id)
            .map(|t: &Team| config.effective_rating(t.rating))
            .ok_or(TournamentError::TeamNotFound(id))
    };
    let rating_a = rating_of(m.team_a)?;
    let rating_b = rating_of(m.team_b)?;
    let cap = config.max_shootout_rounds.map(|c| c.max(MIN_SHOOTOUT_ROUNDS));

    sink.emit(&Narration::ShootoutStarted);
    let (mut total_a, mut total_b, mut rounds) = (0u32, 0u32, 0u32);
    let mut capped = false;
    while total_a == total_b || rounds < MIN_SHOOTOUT_ROUNDS {
        if cap.is_some_and(|c| rounds >= c) {
            log::warn!("shootout still level after {} rounds, settling by coin flip", rounds);
            match random_side(rng) {
                Side::A => total_a += 1,
                Side::B => total_b += 1,
            }
            capped = true;
            break;
        }
        total_a += penalty_kick(rating_a, rng);
        total_b += penalty_kick(rating_b, rng);
        rounds += 1;
        sink.emit(&Narration::ShootoutRound {
            round: rounds,
            total_a,
            total_b,
        });
    }

    let winner = if total_a > total_b { Side::A } else { Side::B };
    let (team_a, team_b) = names(m, teams)?;
    sink.emit(&Narration::ShootoutFinished {
        team_a,
        total_a,
        team_b,
        total_b,
    });
    m.penalties = Some(ShootoutResult {
        score_a: total_a,
        score_b: total_b,
        winner,
        rounds,
        capped,
    });
    Ok(winner)
}

/// Fold a finalized match into both teams' cumulative stats (once).
pub fn update_team_stats(m: &mut Match, teams: &mut [Team]) -> Result<(), TournamentError> {
    if m.phase != MatchPhase::Finalized || m.stats_recorded {
        return Err(TournamentError::InvalidState);
    }
    let (score_a, score_b) = m.final_score.ok_or(TournamentError::InvalidState)?;
    let result = m.result.ok_or(TournamentError::InvalidState)?;

    for (side, scored, conceded) in [(Side::A, score_a, score_b), (Side::B, score_b, score_a)] {
        let id = m.team(side);
        let (yellows, reds) = m.cards(side);
        let xg = m.expected_goals(side);
        let team = teams.get_mut(id).ok_or(TournamentError::TeamNotFound(id))?;

        team.add_goals(scored);
        team.concede_goals(conceded);
        team.add_minutes(MATCH_MINUTES);
        team.stats.matches_played += 1;
        if conceded == 0 {
            team.stats.clean_sheets += 1;
        }
        team.stats.yellow_count += yellows;
        team.stats.red_count += reds;
        team.stats.expected_goals += xg;

        if m.is_group() {
            team.points += match (result, side) {
                (MatchResult::Draw, _) => 1,
                (MatchResult::AWin, Side::A) | (MatchResult::BWin, Side::B) => 3,
                _ => 0,
            };
            team.goal_diff += scored as i32 - conceded as i32;
        }
    }
    m.stats_recorded = true;
    Ok(())
}

/// Generate, replay, shoot out if a knockout draw, and record stats.
pub fn run_match<R: Rng + ?Sized, S: EventSink + ?Sized>(
    m: &mut Match,
    teams: &mut [Team],
    config: &SimConfig,
    rng: &mut R,
    sink: &mut S,
) -> Result<(), TournamentError> {
    {
        let team_a = teams.get(m.team_a).ok_or(TournamentError::TeamNotFound(m.team_a))?;
        let team_b = teams.get(m.team_b).ok_or(TournamentError::TeamNotFound(m.team_b))?;
        generate_timeline(m, team_a, team_b, config, rng)?;
    }
    let result = play_match(m, teams, sink)?;
    if result == MatchResult::Draw && !m.is_group() {
        play_penalties(m, teams, config, rng, sink)?;
    }
    update_team_stats(m, teams)
}
