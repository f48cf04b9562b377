use std::fs;
use std::path::PathBuf;

use champ_terminal::api::{
    parse_championship_json, parse_championships_json, parse_game_json, parse_games_json,
    parse_player_json, parse_players_json, parse_standings_json, parse_team_json,
    parse_teams_json,
};
use champ_terminal::stats::{
    UNKNOWN_CHAMPIONSHIP, championship_aggregate, group_by_championship, player_stats,
    split_goals, team_record,
};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_championships_fixture() {
    let raw = read_fixture("championships.json");
    let items = parse_championships_json(&raw).expect("fixture should parse");
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].name, "Serie A");
    assert_eq!(items[0].year.as_deref(), Some("2024"));
    assert_eq!(items[1].year.as_deref(), Some("2023"));
    assert_eq!(items[2].year, None);
}

#[test]
fn championship_detail_feeds_the_aggregate() {
    let raw = read_fixture("championship_detail.json");
    let c = parse_championship_json(&raw)
        .expect("fixture should parse")
        .expect("championship present");
    assert_eq!(c.teams.len(), 3);
    assert_eq!(c.games.len(), 4);

    let agg = championship_aggregate(&c.teams, &c.games);
    assert_eq!(agg.total_teams, 3);
    assert_eq!(agg.total_matches, 4);
    assert_eq!(agg.home_wins, 1);
    assert_eq!(agg.away_wins, 1);
    assert_eq!(agg.draws, 1);
}

#[test]
fn parses_teams_fixture() {
    let raw = read_fixture("teams.json");
    let teams = parse_teams_json(&raw).expect("fixture should parse");
    assert_eq!(teams.len(), 3);
    assert_eq!(teams[0].players_count, Some(25));
    assert_eq!(teams[1].logo.as_deref(), Some("inter.png"));
}

#[test]
fn team_detail_record_skips_unplayed_matches() {
    let raw = read_fixture("team_detail.json");
    let team = parse_team_json(&raw)
        .expect("fixture should parse")
        .expect("team present");
    assert_eq!(team.players.len(), 2);
    assert_eq!(
        team.championship.as_ref().map(|c| c.name.as_str()),
        Some("Serie A")
    );

    let record = team_record(team.id, &team.games);
    assert_eq!(record.total, 3);
    assert_eq!(record.wins, 2);
    assert_eq!(record.draws, 1);
    assert_eq!(record.losses, 0);
}

#[test]
fn players_take_team_id_from_either_shape() {
    let raw = read_fixture("soccers.json");
    let players = parse_players_json(&raw).expect("fixture should parse");
    assert_eq!(players.len(), 4);
    assert_eq!(players[0].team_id, Some(10));
    assert_eq!(players[1].team_id, Some(10));
    assert_eq!(players[0].full_name(), "Dusan Vlahovic");
}

#[test]
fn player_detail_stats() {
    let raw = read_fixture("soccer_detail.json");
    let player = parse_player_json(&raw)
        .expect("fixture should parse")
        .expect("player present");
    assert_eq!(player.age, Some(24));

    let stats = player_stats(&player.games, &player.goals);
    assert_eq!(stats.total_games, 4);
    assert_eq!(stats.total_goals, 3);
    assert_eq!(stats.games_with_goals, 2);
    assert_eq!(stats.goals_per_game, "75.00%");
}

#[test]
fn games_group_by_championship_in_first_seen_order() {
    let raw = read_fixture("games.json");
    let games = parse_games_json(&raw).expect("fixture should parse");
    assert_eq!(games.len(), 4);
    assert_eq!(games[1].date.as_deref(), Some("2024-05-02 15:00"));
    assert_eq!(games[3].home_team_id, Some(40));
    assert_eq!(games[3].home_name(), "Home team");
    assert_eq!(games[3].score_label(), "TBD");

    let groups = group_by_championship(&games);
    let names: Vec<&str> = groups.iter().map(|g| g.championship.as_str()).collect();
    assert_eq!(names, vec!["Serie A", "Premier League", UNKNOWN_CHAMPIONSHIP]);
    assert_eq!(groups[0].matches.len(), 2);
}

#[test]
fn game_detail_goals_split_by_side() {
    let raw = read_fixture("game_detail.json");
    let game = parse_game_json(&raw)
        .expect("fixture should parse")
        .expect("game present");
    assert_eq!(game.goals.len(), 4);
    assert_eq!(game.score(), Some((2, 1)));

    let split = split_goals(&game);
    let home: Vec<u32> = split.home.iter().map(|g| g.minute).collect();
    let away: Vec<u32> = split.away.iter().map(|g| g.minute).collect();
    assert_eq!(home, vec![12, 70]);
    assert_eq!(away, vec![55]);
    assert_eq!(split.away[0].scorer_name(), "Lautaro Martinez");
}

#[test]
fn standings_rows_accept_every_spelling() {
    let raw = read_fixture("standings.json");
    let table = parse_standings_json(&raw, 1)
        .expect("fixture should parse")
        .expect("table present");
    assert_eq!(table.name, "Serie A");
    assert_eq!(table.standings.len(), 7);

    let juve = &table.standings[1];
    assert_eq!(juve.team_id, Some(10));
    assert_eq!(juve.name, "Juventus");
    assert_eq!((juve.played, juve.won, juve.drawn, juve.lost), (10, 7, 3, 0));
    assert_eq!((juve.goals_for, juve.goals_against), (18, 5));

    assert_eq!(table.standings[0].goal_difference, 14);
    assert_eq!(table.standings[2].name, "Milan");
    let positions: Vec<u32> = table.standings.iter().map(|r| r.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn empty_and_null_bodies_are_not_errors() {
    assert!(parse_championships_json("").unwrap().is_empty());
    assert!(parse_games_json(r#"{"data": null}"#).unwrap().is_empty());
    assert!(parse_game_json("null").unwrap().is_none());
    assert!(parse_standings_json(r#"{"data": null}"#, 3).unwrap().is_none());
}

#[test]
fn malformed_bodies_are_errors() {
    assert!(parse_teams_json("{\"data\": [").is_err());
    assert!(parse_teams_json(r#"{"teams": []}"#).is_err());
}
