//! Integration tests for the group stage: scheduling, standings and qualification.

use proptest::prelude::*;
use std::collections::HashSet;
use world_cup_sim::models::{rank_teams, GROUP_MATCHES};
use world_cup_sim::{
    build_tournament, fallback_roster, play_group, seeded_rng, simulate_group_stage,
    start_tournament, Group, MatchPhase, SilentSink, SimConfig, Team, Tournament,
    TournamentError, TournamentState,
};

fn started_tournament() -> Tournament {
    let mut t = build_tournament(&fallback_roster(), SimConfig::instant()).unwrap();
    start_tournament(&mut t).unwrap();
    t
}

#[test]
fn schedule_has_six_unique_pairs() {
    let mut g = Group::new("Group A", vec![4, 5, 6, 7]).unwrap();
    g.schedule_matches();
    assert_eq!(g.matches.len(), GROUP_MATCHES);

    let pairs: HashSet<(usize, usize)> = g
        .matches
        .iter()
        .map(|m| (m.team_a.min(m.team_b), m.team_a.max(m.team_b)))
        .collect();
    assert_eq!(pairs.len(), 6);
    assert!(g.matches.iter().all(|m| m.team_a != m.team_b && m.is_group()));
}

#[test]
fn group_with_wrong_size_is_rejected() {
    assert_eq!(
        Group::new("Group B", vec![0, 1, 2, 3, 4]),
        Err(TournamentError::InvalidGroupSize {
            group: "Group B".to_string(),
            size: 5
        })
    );
}

#[test]
fn play_group_finalizes_matches_and_ranks() {
    let mut t = started_tournament();
    let mut rng = seeded_rng(11);
    let top = play_group(&mut t, 0, &mut rng, &mut SilentSink).unwrap();

    let group = &t.groups[0];
    assert!(group.matches.iter().all(|m| m.phase == MatchPhase::Finalized));
    let standings = group.standings.clone().unwrap();
    assert_eq!(&standings[..2], &top[..]);
    for pair in standings.windows(2) {
        let (x, y) = (&t.teams[pair[0]], &t.teams[pair[1]]);
        assert!((x.points, x.goal_diff) >= (y.points, y.goal_diff));
    }
    for &id in &group.teams {
        assert_eq!(t.teams[id].stats.matches_played, 3);
        assert_eq!(t.teams[id].stats.minutes_played, 270);
    }
    let total_gd: i32 = group.teams.iter().map(|&id| t.teams[id].goal_diff).sum();
    assert_eq!(total_gd, 0);
}

#[test]
fn group_points_come_from_six_matches() {
    let mut t = started_tournament();
    let mut rng = seeded_rng(12);
    simulate_group_stage(&mut t, &mut rng, &mut SilentSink).unwrap();

    for group in &t.groups {
        let points: u32 = group.teams.iter().map(|&id| t.teams[id].points).sum();
        let draws = group
            .matches
            .iter()
            .filter(|m| matches!(m.final_score, Some((a, b)) if a == b))
            .count() as u32;
        assert_eq!(points, 3 * (6 - draws) + 2 * draws);
    }
}

#[test]
fn qualifiers_come_in_group_order() {
    let mut t = started_tournament();
    let mut rng = seeded_rng(13);
    let qualifiers = simulate_group_stage(&mut t, &mut rng, &mut SilentSink).unwrap();

    assert_eq!(qualifiers.len(), 16);
    assert_eq!(t.state, TournamentState::Knockout);
    for (i, pair) in qualifiers.chunks(2).enumerate() {
        let letter = ["A", "B", "C", "D", "E", "F", "G", "H"][i];
        assert!(pair.iter().all(|&id| t.teams[id].group == letter));
        assert_eq!(t.groups[i].standings.as_ref().unwrap()[..2], pair[..]);
    }
    // Group-stage exits are not flagged.
    assert!(t.teams.iter().all(|team| !team.eliminated));
}

#[test]
fn group_stage_requires_started_tournament() {
    let mut t = build_tournament(&fallback_roster(), SimConfig::instant()).unwrap();
    let mut rng = seeded_rng(14);
    assert_eq!(
        simulate_group_stage(&mut t, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn play_group_requires_group_stage() {
    let mut t = build_tournament(&fallback_roster(), SimConfig::instant()).unwrap();
    let mut rng = seeded_rng(16);
    assert_eq!(
        play_group(&mut t, 0, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );
    assert!(t.groups[0].matches.is_empty());
    assert!(t.teams.iter().all(|team| team.stats.matches_played == 0));
}

#[test]
fn group_cannot_be_replayed() {
    let mut t = started_tournament();
    let mut rng = seeded_rng(17);
    play_group(&mut t, 0, &mut rng, &mut SilentSink).unwrap();
    let points: Vec<u32> = t.groups[0].teams.iter().map(|&id| t.teams[id].points).collect();

    assert_eq!(
        play_group(&mut t, 0, &mut rng, &mut SilentSink),
        Err(TournamentError::InvalidState)
    );
    for (&id, &before) in t.groups[0].teams.iter().zip(&points) {
        assert_eq!(t.teams[id].stats.matches_played, 3);
        assert_eq!(t.teams[id].points, before);
    }
}

#[test]
fn identical_records_still_yield_two_qualifiers() {
    let mut t = started_tournament();
    let mut rng = seeded_rng(15);
    play_group(&mut t, 2, &mut rng, &mut SilentSink).unwrap();

    let members = t.groups[2].teams.clone();
    for &id in &members {
        t.teams[id].points = 4;
        t.teams[id].goal_diff = 0;
    }
    let top = t.groups[2].compute_standings(&t.teams).unwrap();
    assert_eq!(top, [members[0], members[1]]);
    assert_eq!(t.groups[2].standings.as_ref().unwrap(), &members);
}

proptest! {
    #[test]
    fn ranking_is_ordered_by_points_then_goal_diff(
        records in proptest::collection::vec((0u32..10, -8i32..8), 4)
    ) {
        let teams: Vec<Team> = records
            .iter()
            .enumerate()
            .map(|(i, &(points, gd))| {
                let mut t = Team::new(i, format!("T{i}"), 50, "A");
                t.points = points;
                t.goal_diff = gd;
                t
            })
            .collect();
        let order = rank_teams(&[0, 1, 2, 3], &teams).unwrap();

        prop_assert_eq!(order.len(), 4);
        for i in 0..4 {
            for j in (i + 1)..4 {
                let (x, y) = (&teams[order[i]], &teams[order[j]]);
                prop_assert!((x.points, x.goal_diff) >= (y.points, y.goal_diff));
            }
        }
    }
}
