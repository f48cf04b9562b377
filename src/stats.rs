use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Championship, Game, Goal, Player, StandingRow, Team};

pub const UNKNOWN_CHAMPIONSHIP: &str = "Unknown championship";
const HOME_MATCHES: usize = 3;
const HOME_PLAYERS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub total: usize,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

/// Win/draw/loss tally from `team_id`'s side of each match.
///
/// Matches the team did not play in, and matches without a final score, are left out of
/// every count, so `wins + draws + losses == total` always holds.
pub fn team_record(team_id: u32, matches: &[Game]) -> TeamRecord {
    let mut record = TeamRecord::default();
    for m in matches {
        let Some((home, away)) = m.score() else {
            continue;
        };
        let (own, other) = if m.home_team_id == Some(team_id) {
            (home, away)
        } else if m.away_team_id == Some(team_id) {
            (away, home)
        } else {
            continue;
        };
        record.total += 1;
        match own.cmp(&other) {
            Ordering::Greater => record.wins += 1,
            Ordering::Equal => record.draws += 1,
            Ordering::Less => {}
        }
    }
    record.losses = record.total - record.wins - record.draws;
    record
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChampionshipAggregate {
    pub total_teams: usize,
    pub total_matches: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
}

pub fn championship_aggregate(teams: &[Team], matches: &[Game]) -> ChampionshipAggregate {
    let mut agg = ChampionshipAggregate {
        total_teams: teams.len(),
        total_matches: matches.len(),
        ..ChampionshipAggregate::default()
    };
    for (home, away) in matches.iter().filter_map(Game::score) {
        match home.cmp(&away) {
            Ordering::Greater => agg.home_wins += 1,
            Ordering::Equal => agg.draws += 1,
            Ordering::Less => agg.away_wins += 1,
        }
    }
    agg
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStats {
    pub total_games: usize,
    pub total_goals: usize,
    pub games_with_goals: usize,
    pub goals_per_game: String,
}

pub fn player_stats(games: &[Game], goals: &[Goal]) -> PlayerStats {
    let total_games = games.len();
    let total_goals = goals.len();
    let games_with_goals = goals
        .iter()
        .filter_map(|g| g.game_id)
        .collect::<HashSet<_>>()
        .len();
    let goals_per_game = if total_games == 0 {
        "0".to_string()
    } else {
        format!("{:.2}%", total_goals as f64 / total_games as f64 * 100.0)
    };
    PlayerStats {
        total_games,
        total_goals,
        games_with_goals,
        goals_per_game,
    }
}

pub fn goals_in_game(goals: &[Goal], game_id: u32) -> Vec<&Goal> {
    goals.iter().filter(|g| g.game_id == Some(game_id)).collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GoalSplit<'a> {
    pub home: Vec<&'a Goal>,
    pub away: Vec<&'a Goal>,
}

/// Splits a match's goals by the scorer's team, each side ordered by minute.
pub fn split_goals(game: &Game) -> GoalSplit<'_> {
    let mut split = GoalSplit::default();
    for goal in &game.goals {
        let Some(team_id) = goal.scorer_team_id else {
            continue;
        };
        if game.home_team_id == Some(team_id) {
            split.home.push(goal);
        } else if game.away_team_id == Some(team_id) {
            split.away.push(goal);
        }
    }
    split.home.sort_by_key(|g| g.minute);
    split.away.sort_by_key(|g| g.minute);
    split
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Position,
    Played,
    Won,
    Drawn,
    Lost,
    GoalsFor,
    GoalsAgainst,
    GoalDifference,
    Points,
}

impl SortColumn {
    pub const ALL: [SortColumn; 9] = [
        SortColumn::Position,
        SortColumn::Played,
        SortColumn::Won,
        SortColumn::Drawn,
        SortColumn::Lost,
        SortColumn::GoalsFor,
        SortColumn::GoalsAgainst,
        SortColumn::GoalDifference,
        SortColumn::Points,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortColumn::Position => "Pos",
            SortColumn::Played => "P",
            SortColumn::Won => "W",
            SortColumn::Drawn => "D",
            SortColumn::Lost => "L",
            SortColumn::GoalsFor => "GF",
            SortColumn::GoalsAgainst => "GA",
            SortColumn::GoalDifference => "GD",
            SortColumn::Points => "Pts",
        }
    }

    pub fn value(self, row: &StandingRow) -> i64 {
        match self {
            SortColumn::Position => row.position as i64,
            SortColumn::Played => row.played as i64,
            SortColumn::Won => row.won as i64,
            SortColumn::Drawn => row.drawn as i64,
            SortColumn::Lost => row.lost as i64,
            SortColumn::GoalsFor => row.goals_for as i64,
            SortColumn::GoalsAgainst => row.goals_against as i64,
            SortColumn::GoalDifference => row.goal_difference as i64,
            SortColumn::Points => row.points as i64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandingsSort {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for StandingsSort {
    fn default() -> Self {
        Self {
            column: SortColumn::Points,
            direction: SortDirection::Descending,
        }
    }
}

impl StandingsSort {
    /// Same column flips the direction; a new column starts descending.
    pub fn click(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = match self.direction {
                SortDirection::Ascending => SortDirection::Descending,
                SortDirection::Descending => SortDirection::Ascending,
            };
        } else {
            self.column = column;
            self.direction = SortDirection::Descending;
        }
    }

    /// Stable: rows with equal values keep their server order in both directions.
    pub fn apply<'a>(&self, rows: &'a [StandingRow]) -> Vec<&'a StandingRow> {
        let mut sorted: Vec<&StandingRow> = rows.iter().collect();
        sorted.sort_by(|a, b| {
            let ord = self.column.value(a).cmp(&self.column.value(b));
            match self.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        });
        sorted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandingZone {
    Podium,
    Europe,
}

pub fn standing_zone(position: u32) -> Option<StandingZone> {
    match position {
        1..=3 => Some(StandingZone::Podium),
        4..=6 => Some(StandingZone::Europe),
        _ => None,
    }
}

/// Case-insensitive substring search over the fields `fields` yields for each item.
/// A blank term keeps everything in its original order.
pub fn filter_by_text<'a, T, F>(items: &'a [T], term: &str, fields: F) -> Vec<&'a T>
where
    F: Fn(&'a T) -> Vec<&'a str>,
{
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter(|item| {
            fields(*item)
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}

pub fn championship_search_fields(c: &Championship) -> Vec<&str> {
    let mut fields = vec![c.name.as_str()];
    if let Some(year) = c.year.as_deref() {
        fields.push(year);
    }
    fields
}

pub fn team_search_fields(t: &Team) -> Vec<&str> {
    vec![t.name.as_str()]
}

pub fn player_search_fields(p: &Player) -> Vec<&str> {
    let mut fields = vec![p.name.as_str()];
    fields.extend(p.lastname.as_deref());
    fields.extend(p.role.as_deref());
    fields.extend(p.team.as_ref().map(|t| t.name.as_str()));
    fields
}

pub fn match_search_fields(m: &Game) -> Vec<&str> {
    vec![
        m.home_name(),
        m.away_name(),
        m.championship_name().unwrap_or(UNKNOWN_CHAMPIONSHIP),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchGroup<'a> {
    pub championship: String,
    pub matches: Vec<&'a Game>,
}

/// Groups in first-seen order; matches keep their order within a group.
pub fn group_by_championship<'a>(
    matches: impl IntoIterator<Item = &'a Game>,
) -> Vec<MatchGroup<'a>> {
    let mut groups: Vec<MatchGroup<'a>> = Vec::new();
    for m in matches {
        let name = m.championship_name().unwrap_or(UNKNOWN_CHAMPIONSHIP);
        match groups.iter_mut().find(|g| g.championship == name) {
            Some(group) => group.matches.push(m),
            None => groups.push(MatchGroup {
                championship: name.to_string(),
                matches: vec![m],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HomeDigest {
    pub matches: Vec<Game>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    /// False when nothing is scheduled today and the first matches were used instead.
    pub today_only: bool,
}

pub fn home_digest(games: Vec<Game>, players: Vec<Player>, today: NaiveDate) -> HomeDigest {
    let todays: Vec<Game> = games
        .iter()
        .filter(|g| g.date.as_deref().and_then(match_day) == Some(today))
        .take(HOME_MATCHES)
        .cloned()
        .collect();
    let today_only = !todays.is_empty();
    let matches = if today_only {
        todays
    } else {
        games.into_iter().take(HOME_MATCHES).collect()
    };

    let mut seen = HashSet::new();
    let mut teams = Vec::new();
    for m in &matches {
        for team in [m.home_team.as_ref(), m.away_team.as_ref()].into_iter().flatten() {
            if seen.insert(team.id) {
                teams.push(team.clone());
            }
        }
    }

    HomeDigest {
        matches,
        teams,
        players: players.into_iter().take(HOME_PLAYERS).collect(),
        today_only,
    }
}

/// Calendar day of an API timestamp (`2024-05-01`, `2024-05-01T20:45:00Z`, ...).
pub fn match_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{Game, Goal, StandingRow, Team};

    fn team(id: u32, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            ..Team::default()
        }
    }

    fn game(id: u32, home: u32, away: u32, score: Option<(u32, u32)>) -> Game {
        Game {
            id,
            home_team: Some(team(home, &format!("T{home}"))),
            away_team: Some(team(away, &format!("T{away}"))),
            home_team_id: Some(home),
            away_team_id: Some(away),
            home_team_score: score.map(|s| s.0),
            away_team_score: score.map(|s| s.1),
            ..Game::default()
        }
    }

    fn goal(id: u32, game_id: u32, minute: u32, team_id: Option<u32>) -> Goal {
        Goal {
            id,
            minute,
            game_id: Some(game_id),
            scorer_team_id: team_id,
            ..Goal::default()
        }
    }

    #[test]
    fn home_win_scenario_counts_once() {
        let m = game(1, 1, 2, Some((2, 1)));
        let agg = championship_aggregate(&[team(1, "A"), team(2, "B")], &[m]);
        assert_eq!(agg.home_wins, 1);
        assert_eq!(agg.draws, 0);
        assert_eq!(agg.away_wins, 0);
        assert_eq!(agg.total_teams, 2);
        assert_eq!(agg.total_matches, 1);
    }

    #[test]
    fn team_record_uses_the_side_the_team_played() {
        let matches = vec![
            game(1, 1, 2, Some((2, 1))),
            game(2, 3, 1, Some((0, 3))),
            game(3, 1, 4, Some((1, 1))),
            game(4, 5, 1, Some((2, 0))),
        ];
        let r = team_record(1, &matches);
        assert_eq!(
            r,
            TeamRecord {
                total: 4,
                wins: 2,
                draws: 1,
                losses: 1
            }
        );
    }

    #[test]
    fn team_record_excludes_foreign_and_unplayed_matches() {
        let matches = vec![
            game(1, 1, 2, Some((1, 0))),
            game(2, 7, 8, Some((0, 0))),
            game(3, 2, 1, None),
        ];
        let r = team_record(1, &matches);
        assert_eq!(r.total, 1);
        assert_eq!(r.wins + r.draws + r.losses, r.total);
    }

    #[test]
    fn player_stats_scenario() {
        let games = vec![game(1, 1, 2, None), game(2, 1, 3, None), game(3, 1, 4, None)];
        let goals = vec![goal(1, 1, 10, Some(1)), goal(2, 1, 70, Some(1))];
        let stats = player_stats(&games, &goals);
        assert_eq!(stats.total_games, 3);
        assert_eq!(stats.total_goals, 2);
        assert_eq!(stats.games_with_goals, 1);
        assert_eq!(stats.goals_per_game, "66.67%");
        assert_eq!(goals_in_game(&goals, 1).len(), 2);
        assert!(goals_in_game(&goals, 2).is_empty());
    }

    #[test]
    fn goals_per_game_is_zero_without_games() {
        let stats = player_stats(&[], &[goal(1, 1, 5, None)]);
        assert_eq!(stats.goals_per_game, "0");
    }

    #[test]
    fn split_goals_orders_by_minute_and_drops_strangers() {
        let mut m = game(1, 10, 20, Some((2, 1)));
        m.goals = vec![
            goal(1, 1, 80, Some(10)),
            goal(2, 1, 12, Some(20)),
            goal(3, 1, 5, Some(10)),
            goal(4, 1, 30, Some(99)),
            goal(5, 1, 31, None),
        ];
        let split = split_goals(&m);
        let home: Vec<u32> = split.home.iter().map(|g| g.minute).collect();
        let away: Vec<u32> = split.away.iter().map(|g| g.minute).collect();
        assert_eq!(home, vec![5, 80]);
        assert_eq!(away, vec![12]);
    }

    #[test]
    fn click_flips_then_resets() {
        let mut sort = StandingsSort::default();
        sort.click(SortColumn::Points);
        assert_eq!(sort.direction, SortDirection::Ascending);
        sort.click(SortColumn::Won);
        assert_eq!(sort.column, SortColumn::Won);
        assert_eq!(sort.direction, SortDirection::Descending);
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let rows: Vec<StandingRow> = [("A", 10), ("B", 12), ("C", 10), ("D", 12)]
            .iter()
            .map(|(name, points)| StandingRow {
                name: name.to_string(),
                points: *points,
                ..StandingRow::default()
            })
            .collect();
        let sort = StandingsSort::default();
        let names: Vec<&str> = sort.apply(&rows).into_iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "D", "A", "C"]);
    }

    #[test]
    fn blank_filter_keeps_everything_in_order() {
        let teams = vec![team(2, "Roma"), team(1, "Inter")];
        let out = filter_by_text(&teams, "  ", team_search_fields);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Roma");
        let out = filter_by_text(&teams, "INT", team_search_fields);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let mut a = game(1, 1, 2, None);
        a.championship = Some(Championship {
            name: "Serie A".to_string(),
            ..Championship::default()
        });
        let b = game(2, 3, 4, None);
        let mut c = game(3, 5, 6, None);
        c.championship = a.championship.clone();
        let matches = [a, b, c];
        let groups = group_by_championship(matches.iter());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].championship, "Serie A");
        assert_eq!(groups[0].matches.len(), 2);
        assert_eq!(groups[1].championship, UNKNOWN_CHAMPIONSHIP);
    }

    #[test]
    fn home_digest_prefers_todays_matches() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let mut later = game(1, 1, 2, None);
        later.date = Some("2025-03-10 18:00:00".to_string());
        let mut now = game(2, 3, 1, None);
        now.date = Some("2025-03-09T20:45:00Z".to_string());
        let digest = home_digest(vec![later.clone(), now], Vec::new(), today);
        assert!(digest.today_only);
        assert_eq!(digest.matches.len(), 1);
        assert_eq!(digest.matches[0].id, 2);
        assert_eq!(digest.teams.iter().map(|t| t.id).collect::<Vec<_>>(), vec![3, 1]);

        let digest = home_digest(vec![later], Vec::new(), today);
        assert!(!digest.today_only);
        assert_eq!(digest.matches.len(), 1);
    }

    #[test]
    fn zones_cover_top_six() {
        assert_eq!(standing_zone(1), Some(StandingZone::Podium));
        assert_eq!(standing_zone(6), Some(StandingZone::Europe));
        assert_eq!(standing_zone(7), None);
        assert_eq!(standing_zone(0), None);
    }
}
