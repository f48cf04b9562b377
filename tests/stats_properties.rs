use std::collections::HashSet;

use champ_terminal::model::{Game, Goal, StandingRow, Team};
use champ_terminal::stats::{
    SortColumn, SortDirection, StandingsSort, championship_aggregate, filter_by_text,
    split_goals, team_record, team_search_fields,
};

fn game(id: u32, home: u32, away: u32, score: Option<(u32, u32)>) -> Game {
    Game {
        id,
        home_team_id: Some(home),
        away_team_id: Some(away),
        home_team_score: score.map(|s| s.0),
        away_team_score: score.map(|s| s.1),
        ..Game::default()
    }
}

fn season(count: u32) -> Vec<Game> {
    (0..count)
        .map(|idx| {
            let score = if idx % 9 == 0 {
                None
            } else {
                Some((idx % 4, (idx * 5) % 3))
            };
            game(idx + 1, idx % 6 + 1, (idx + 2) % 6 + 1, score)
        })
        .collect()
}

#[test]
fn team_record_always_balances() {
    let games = season(120);
    for team_id in 0..8 {
        let record = team_record(team_id, &games);
        assert_eq!(record.wins + record.draws + record.losses, record.total);
        let played = games
            .iter()
            .filter(|g| g.score().is_some())
            .filter(|g| g.home_team_id == Some(team_id) || g.away_team_id == Some(team_id))
            .count();
        assert_eq!(record.total, played);
    }
}

#[test]
fn aggregate_outcomes_never_exceed_matches() {
    let games = season(75);
    let teams: Vec<Team> = (1..=6)
        .map(|id| Team {
            id,
            name: format!("Club {id}"),
            ..Team::default()
        })
        .collect();
    let agg = championship_aggregate(&teams, &games);
    let played = games.iter().filter(|g| g.score().is_some()).count();
    assert_eq!(agg.total_teams, 6);
    assert_eq!(agg.total_matches, 75);
    assert_eq!(agg.home_wins + agg.away_wins + agg.draws, played);
}

fn table(count: u32) -> Vec<StandingRow> {
    (0..count)
        .map(|idx| StandingRow {
            team_id: Some(idx + 1),
            name: format!("Club {idx}"),
            played: idx % 5,
            won: idx % 7,
            drawn: idx % 3,
            lost: idx % 4,
            goals_for: (idx * 3) % 11,
            goals_against: (idx * 5) % 13,
            goal_difference: (idx % 9) as i32 - 4,
            points: ((idx * 13) % 40) as i32,
            position: idx + 1,
            ..StandingRow::default()
        })
        .collect()
}

fn team_ids(rows: &[&StandingRow]) -> Vec<u32> {
    rows.iter().filter_map(|r| r.team_id).collect()
}

#[test]
fn every_sort_is_a_permutation_and_ordered() {
    let rows = table(30);

    for column in SortColumn::ALL {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sort = StandingsSort { column, direction };
            let sorted = sort.apply(&rows);
            assert_eq!(sorted.len(), rows.len());

            let mut ids: Vec<u32> = sorted.iter().filter_map(|r| r.team_id).collect();
            ids.sort_unstable();
            assert_eq!(ids, (1..=30).collect::<Vec<_>>());

            for pair in sorted.windows(2) {
                let (a, b) = (column.value(pair[0]), column.value(pair[1]));
                match direction {
                    SortDirection::Ascending => assert!(a <= b),
                    SortDirection::Descending => assert!(a >= b),
                }
                if a == b {
                    assert!(pair[0].position < pair[1].position, "ties keep server order");
                }
            }
        }
    }
}

#[test]
fn filter_is_case_insensitive_and_a_subset() {
    let teams: Vec<Team> = ["Juventus", "Inter", "Roma", "Lazio", "Torino"]
        .iter()
        .enumerate()
        .map(|(idx, name)| Team {
            id: idx as u32 + 1,
            name: name.to_string(),
            ..Team::default()
        })
        .collect();

    assert_eq!(filter_by_text(&teams, "   ", team_search_fields).len(), 5);
    for term in ["o", "IN", "ro", "zzz"] {
        let hits = filter_by_text(&teams, term, team_search_fields);
        let expected = teams
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&term.to_lowercase()))
            .count();
        assert_eq!(hits.len(), expected, "term {term}");
    }
}

#[test]
fn sorting_again_changes_nothing() {
    let rows = table(30);
    for column in SortColumn::ALL {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let sort = StandingsSort { column, direction };
            let once: Vec<StandingRow> = sort.apply(&rows).into_iter().cloned().collect();
            let twice = sort.apply(&once);
            assert_eq!(team_ids(&twice), team_ids(&once.iter().collect::<Vec<_>>()));
        }
    }
}

#[test]
fn flipping_twice_restores_the_order() {
    let rows = table(30);
    for column in SortColumn::ALL {
        let mut sort = StandingsSort {
            column,
            direction: SortDirection::Descending,
        };
        let before = team_ids(&sort.apply(&rows));
        sort.click(column);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.click(column);
        assert_eq!(sort.direction, SortDirection::Descending);
        assert_eq!(team_ids(&sort.apply(&rows)), before, "column {column:?}");
    }
}

#[test]
fn goal_split_keeps_every_side_goal_exactly_once() {
    for seed in 0..20u32 {
        let mut m = game(seed + 1, 10, 20, Some((0, 0)));
        let game_id = m.id;
        m.goals = (0..(seed % 7 + 3))
            .map(|idx| Goal {
                id: seed * 100 + idx + 1,
                minute: (idx * 37 + seed * 11) % 95,
                game_id: Some(game_id),
                scorer_team_id: match (idx + seed) % 4 {
                    0 | 1 => Some(10),
                    2 => Some(20),
                    _ if idx % 2 == 0 => Some(30),
                    _ => None,
                },
                ..Goal::default()
            })
            .collect();

        let split = split_goals(&m);
        let on_a_side = m
            .goals
            .iter()
            .filter(|g| matches!(g.scorer_team_id, Some(10) | Some(20)))
            .count();
        assert_eq!(split.home.len() + split.away.len(), on_a_side);

        let home: HashSet<u32> = split.home.iter().map(|g| g.id).collect();
        let away: HashSet<u32> = split.away.iter().map(|g| g.id).collect();
        assert_eq!(home.len(), split.home.len());
        assert_eq!(away.len(), split.away.len());
        assert!(home.is_disjoint(&away));
        assert!(split.home.iter().all(|g| g.scorer_team_id == Some(10)));
        assert!(split.away.iter().all(|g| g.scorer_team_id == Some(20)));
        assert!(split.home.windows(2).all(|w| w[0].minute <= w[1].minute));
        assert!(split.away.windows(2).all(|w| w[0].minute <= w[1].minute));
    }
}
