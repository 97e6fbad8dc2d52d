//! Integration tests for the match engine: score draws, replay, shootouts and stats.

use proptest::prelude::*;
use rand::RngCore;
use world_cup_sim::{
    draw_scores, generate_timeline, play_match, play_penalties, run_match, seeded_rng,
    update_team_stats, EventKind, Match, MatchEvent, MatchPhase, MatchResult, Narration,
    RecordingSink, RoundType, Side, SilentSink, SimConfig, Team, TournamentError,
};

fn pair(rating_a: u32, rating_b: u32) -> Vec<Team> {
    vec![
        Team::new(0, "Home", rating_a, "A"),
        Team::new(1, "Away", rating_b, "A"),
    ]
}

fn goalless(round: RoundType) -> Match {
    Match::new(0, 1, round).with_timeline(vec![MatchEvent::new(40, EventKind::Yellow, Side::A)])
}

/// Replays a fixed list of uniform draws in `[0, 1)`.
struct ScriptedRng {
    draws: Vec<f64>,
    next: usize,
}

impl ScriptedRng {
    fn new(draws: &[f64]) -> Self {
        Self {
            draws: draws.to_vec(),
            next: 0,
        }
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let u = self.draws[self.next % self.draws.len()];
        self.next += 1;
        ((u * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

#[test]
fn heavy_favourite_as_b_rarely_loses() {
    let mut rng = seeded_rng(21);
    let samples = 100_000;
    let upsets = (0..samples)
        .filter(|_| {
            let (a, b) = draw_scores(50, 90, 6.0, &mut rng);
            a > b
        })
        .count();
    assert!(upsets * 50 < samples, "{upsets} upsets in {samples}");
    assert!(upsets > 0, "the 1% escape never let an upset through");
}

#[test]
fn upset_rule_branches() {
    // Draws per call: A goals, B goals, then one check per branch taken.
    // 0.9 -> A scores 2, 0.1 -> either side scores 0 (ratings 50 v 90, rate 6).
    let cases: [(&[f64], (u32, u32)); 4] = [
        // A lead, check passes: swapped.
        (&[0.9, 0.1, 0.5], (0, 2)),
        // A lead, check lands in the 1% escape: kept.
        (&[0.9, 0.1, 0.005], (2, 0)),
        // Level, re-roll of A gives a lead, which is then swapped.
        (&[0.1, 0.1, 0.5, 0.9, 0.5], (0, 2)),
        // Level, check lands in the 1% escape: no re-roll.
        (&[0.1, 0.1, 0.005, 0.9, 0.5], (0, 0)),
    ];
    for (draws, expected) in cases {
        let mut rng = ScriptedRng::new(draws);
        assert_eq!(draw_scores(50, 90, 6.0, &mut rng), expected, "draws {draws:?}");
    }
}

#[test]
fn oversized_goal_rate_is_clamped() {
    let teams = pair(100, 100);
    let config = SimConfig {
        base_goal_rate: 1e300,
        ..SimConfig::instant()
    };
    let mut rng = seeded_rng(24);
    for _ in 0..50 {
        let mut m = Match::new(0, 1, RoundType::Group);
        let events = generate_timeline(&mut m, &teams[0], &teams[1], &config, &mut rng).unwrap();
        let goals = events.iter().filter(|e| e.kind == EventKind::Goal).count();
        assert!(goals <= 2 * 50, "{goals} goals");
    }
}

#[test]
fn favourite_as_a_gets_no_protection() {
    let mut rng = seeded_rng(22);
    let samples = 5000;
    let upsets = (0..samples)
        .filter(|_| {
            let (a, b) = draw_scores(90, 50, 6.0, &mut rng);
            b > a
        })
        .count();
    assert!(upsets * 10 > samples, "only {upsets} upsets in {samples}");
}

#[test]
fn replay_applies_events_in_order() {
    let teams = pair(60, 40);
    let mut m = Match::new(0, 1, RoundType::Group).with_timeline(vec![
        MatchEvent::new(70, EventKind::Goal, Side::B),
        MatchEvent::new(12, EventKind::Goal, Side::A),
        MatchEvent::new(33, EventKind::Red, Side::B),
        MatchEvent::new(81, EventKind::Goal, Side::A),
    ]);
    let mut sink = RecordingSink::new();
    let result = play_match(&mut m, &teams, &mut sink).unwrap();

    assert_eq!(result, MatchResult::AWin);
    assert_eq!(m.final_score, Some((2, 1)));
    let scores: Vec<(u32, u32)> = sink
        .notes
        .iter()
        .filter_map(|n| match n {
            Narration::EventApplied { score, .. } => Some(*score),
            _ => None,
        })
        .collect();
    assert_eq!(scores, vec![(1, 0), (1, 0), (1, 1), (2, 1)]);
    assert_eq!(sink.lines().last().unwrap(), "Home - Away 2 - 1");
}

#[test]
fn match_cannot_be_replayed() {
    let teams = pair(60, 40);
    let mut m = goalless(RoundType::Group);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();
    assert_eq!(
        play_match(&mut m, &teams, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );
    let mut rng = seeded_rng(23);
    assert!(generate_timeline(&mut m, &teams[0], &teams[1], &SimConfig::instant(), &mut rng).is_err());
}

#[test]
fn group_stats_and_points() {
    let mut teams = pair(60, 40);
    let mut m = Match::new(0, 1, RoundType::Group).with_timeline(vec![
        MatchEvent::new(10, EventKind::Goal, Side::A).with_meta("shot_xg", serde_json::json!(0.3)),
        MatchEvent::new(20, EventKind::Attempt, Side::B).with_meta("shot_xg", serde_json::json!(0.1)),
        MatchEvent::new(30, EventKind::Goal, Side::A),
        MatchEvent::new(44, EventKind::Yellow, Side::A),
        MatchEvent::new(50, EventKind::Goal, Side::B),
        MatchEvent::new(60, EventKind::Red, Side::B),
    ]);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();
    update_team_stats(&mut m, &mut teams).unwrap();

    let (a, b) = (&teams[0], &teams[1]);
    assert_eq!((a.points, a.goal_diff), (3, 1));
    assert_eq!((b.points, b.goal_diff), (0, -1));
    assert_eq!((a.stats.goals_for, a.stats.goals_against), (2, 1));
    assert_eq!((a.stats.yellow_count, a.stats.red_count), (1, 0));
    assert_eq!((b.stats.yellow_count, b.stats.red_count), (0, 1));
    assert!((a.stats.expected_goals - 0.3).abs() < 1e-9);
    assert!((b.stats.expected_goals - 0.1).abs() < 1e-9);
    assert_eq!(a.stats.minutes_played, 90);
    assert_eq!(b.stats.matches_played, 1);
    assert_eq!(a.stats.clean_sheets + b.stats.clean_sheets, 0);

    assert_eq!(
        update_team_stats(&mut m, &mut teams),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn group_draw_gives_a_point_each() {
    let mut teams = pair(60, 40);
    let mut m = goalless(RoundType::Group);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();
    update_team_stats(&mut m, &mut teams).unwrap();
    assert_eq!((teams[0].points, teams[1].points), (1, 1));
    assert_eq!((teams[0].stats.clean_sheets, teams[1].stats.clean_sheets), (1, 1));
}

#[test]
fn knockout_leaves_points_alone() {
    let mut teams = pair(60, 40);
    let mut rng = seeded_rng(24);
    let mut m = Match::new(0, 1, RoundType::QuarterFinals);
    run_match(&mut m, &mut teams, &SimConfig::instant(), &mut rng, &mut SilentSink).unwrap();
    assert!(m.winner().is_some());
    assert!(teams.iter().all(|t| t.points == 0 && t.goal_diff == 0));
    assert!(teams.iter().all(|t| t.stats.matches_played == 1));
}

#[test]
fn shootout_only_for_knockout_draws() {
    let teams = pair(60, 40);
    let mut rng = seeded_rng(25);
    let config = SimConfig::instant();

    let mut group_draw = goalless(RoundType::Group);
    play_match(&mut group_draw, &teams, &mut SilentSink).unwrap();
    assert_eq!(
        play_penalties(&mut group_draw, &teams, &config, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );

    let mut decided = Match::new(0, 1, RoundType::Final)
        .with_timeline(vec![MatchEvent::new(5, EventKind::Goal, Side::B)]);
    play_match(&mut decided, &teams, &mut SilentSink).unwrap();
    assert_eq!(
        play_penalties(&mut decided, &teams, &config, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );

    let mut unplayed = goalless(RoundType::Final);
    assert_eq!(unplayed.phase, MatchPhase::Scheduled);
    assert_eq!(
        play_penalties(&mut unplayed, &teams, &config, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn shootout_narrates_every_round() {
    let teams = pair(70, 65);
    let mut rng = seeded_rng(26);
    let mut m = goalless(RoundType::SemiFinals);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();

    let mut sink = RecordingSink::new();
    let winner = play_penalties(&mut m, &teams, &SimConfig::instant(), &mut rng, &mut sink).unwrap();
    let shootout = m.penalties.clone().unwrap();

    let rounds = sink
        .notes
        .iter()
        .filter(|n| matches!(n, Narration::ShootoutRound { .. }))
        .count() as u32;
    assert_eq!(rounds, shootout.rounds);
    assert_eq!(sink.notes.first(), Some(&Narration::ShootoutStarted));
    assert_eq!(m.winner_side(), Some(winner));
    assert_eq!(m.winner(), Some(m.team(winner)));
}

#[test]
fn capped_shootout_still_has_a_strict_winner() {
    // Sides rated 5 can never convert, so only the cap ends the shootout.
    let teams = pair(5, 5);
    let mut rng = seeded_rng(27);
    let config = SimConfig {
        max_shootout_rounds: Some(12),
        ..SimConfig::instant()
    };
    let mut m = goalless(RoundType::Final);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();
    play_penalties(&mut m, &teams, &config, &mut rng, &mut SilentSink).unwrap();

    let p = m.penalties.unwrap();
    assert!(p.capped);
    assert_eq!(p.rounds, 12);
    assert_eq!(p.score_a + p.score_b, 1);
}

#[test]
fn cap_below_five_still_plays_five_rounds() {
    let teams = pair(5, 5);
    let mut rng = seeded_rng(28);
    let config = SimConfig {
        max_shootout_rounds: Some(2),
        ..SimConfig::instant()
    };
    let mut m = goalless(RoundType::Final);
    play_match(&mut m, &teams, &mut SilentSink).unwrap();
    play_penalties(&mut m, &teams, &config, &mut rng, &mut SilentSink).unwrap();
    assert_eq!(m.penalties.unwrap().rounds, 5);
}

proptest! {
    #[test]
    fn scores_stay_within_rate_bound(seed in any::<u64>(), ra in 1u32..120, rb in 1u32..120) {
        let mut rng = seeded_rng(seed);
        let (a, b) = draw_scores(ra, rb, 6.0, &mut rng);
        let bound = (6 * ra.max(rb)) / 100;
        prop_assert!(a <= bound && b <= bound);
    }

    #[test]
    fn shootout_has_strict_winner_after_five_rounds(
        seed in any::<u64>(),
        ra in 30u32..100,
        rb in 30u32..100,
    ) {
        let teams = pair(ra, rb);
        let mut rng = seeded_rng(seed);
        let mut m = goalless(RoundType::Final);
        play_match(&mut m, &teams, &mut SilentSink).unwrap();
        let winner = play_penalties(&mut m, &teams, &SimConfig::instant(), &mut rng, &mut SilentSink).unwrap();
        let p = m.penalties.unwrap();

        prop_assert!(p.rounds >= 5);
        prop_assert!(!p.capped);
        let (won, lost) = match winner {
            Side::A => (p.score_a, p.score_b),
            Side::B => (p.score_b, p.score_a),
        };
        prop_assert!(won > lost);
    }
}
