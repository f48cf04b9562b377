//! Records served by the championship API.
//!
//! Each public record deserializes through a private `Raw*` twin that accepts every key
//! spelling the server has been seen to use; the `From` conversion picks the first
//! present one so the rest of the crate only ever sees canonical fields. An id of `0`
//! means the server did not send one.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawChampionship")]
pub struct Championship {
    pub id: u32,
    pub name: String,
    pub year: Option<String>,
    pub country: Option<String>,
    pub image: Option<String>,
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTeam")]
pub struct Team {
    pub id: u32,
    pub name: String,
    pub city: Option<String>,
    pub logo: Option<String>,
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub championship: Option<Championship>,
    pub players_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlayer")]
pub struct Player {
    pub id: u32,
    pub name: String,
    pub lastname: Option<String>,
    pub role: Option<String>,
    pub age: Option<u32>,
    pub number: Option<u32>,
    pub team_id: Option<u32>,
    pub team: Option<Team>,
    pub games: Vec<Game>,
    pub goals: Vec<Goal>,
}

impl Player {
    pub fn full_name(&self) -> String {
        match self.lastname.as_deref() {
            Some(last) => format!("{} {}", self.name, last),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGame")]
pub struct Game {
    pub id: u32,
    pub date: Option<String>,
    pub home_team: Option<Team>,
    pub away_team: Option<Team>,
    pub home_team_id: Option<u32>,
    pub away_team_id: Option<u32>,
    pub home_team_score: Option<u32>,
    pub away_team_score: Option<u32>,
    pub championship: Option<Championship>,
    pub goals: Vec<Goal>,
}

impl Game {
    /// Both scores present; a match without them has not been played yet.
    pub fn score(&self) -> Option<(u32, u32)> {
        Some((self.home_team_score?, self.away_team_score?))
    }

    pub fn home_name(&self) -> &str {
        self.home_team
            .as_ref()
            .map(|t| t.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Home team")
    }

    pub fn away_name(&self) -> &str {
        self.away_team
            .as_ref()
            .map(|t| t.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Away team")
    }

    pub fn championship_name(&self) -> Option<&str> {
        self.championship
            .as_ref()
            .map(|c| c.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn score_label(&self) -> String {
        match self.score() {
            Some((home, away)) => format!("{home} - {away}"),
            None => "TBD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGoal")]
pub struct Goal {
    pub id: u32,
    pub minute: u32,
    pub description: Option<String>,
    pub game_id: Option<u32>,
    pub scorer: Option<Player>,
    pub scorer_team_id: Option<u32>,
}

impl Goal {
    pub fn scorer_name(&self) -> String {
        self.scorer
            .as_ref()
            .map(Player::full_name)
            .unwrap_or_else(|| "Unknown scorer".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStandingRow")]
pub struct StandingRow {
    pub team_id: Option<u32>,
    pub name: String,
    pub logo: Option<String>,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: i32,
    /// `0` until the row is placed in a [`StandingsTable`].
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawStandingsTable")]
pub struct StandingsTable {
    pub id: u32,
    pub name: String,
    pub year: Option<String>,
    pub standings: Vec<StandingRow>,
}

impl StandingsTable {
    pub fn from_rows(id: u32, name: String, year: Option<String>, rows: Vec<StandingRow>) -> Self {
        let standings = rows
            .into_iter()
            .enumerate()
            .map(|(idx, mut row)| {
                if row.position == 0 {
                    row.position = idx as u32 + 1;
                }
                row
            })
            .collect();
        Self {
            id,
            name,
            year,
            standings,
        }
    }
}

#[derive(Deserialize)]
struct RawChampionship {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    teams: Vec<Team>,
    #[serde(default, deserialize_with = "lenient_list")]
    games: Vec<Game>,
}

impl From<RawChampionship> for Championship {
    fn from(raw: RawChampionship) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            year: raw.year,
            country: raw.country,
            image: raw.image,
            teams: raw.teams,
            games: raw.games,
        }
    }
}

#[derive(Deserialize)]
struct RawTeam {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    image: Option<String>,
    #[serde(default)]
    soccers: Option<Vec<Player>>,
    #[serde(default)]
    players: Option<Vec<Player>>,
    #[serde(default, deserialize_with = "lenient_list")]
    games: Vec<Game>,
    #[serde(default)]
    championship: Option<Championship>,
    #[serde(default, deserialize_with = "lenient_u32")]
    players_count: Option<u32>,
}

impl From<RawTeam> for Team {
    fn from(raw: RawTeam) -> Self {
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            city: raw.city,
            logo: raw.logo.or(raw.image),
            players: raw.soccers.or(raw.players).unwrap_or_default(),
            games: raw.games,
            championship: raw.championship,
            players_count: raw.players_count,
        }
    }
}

#[derive(Deserialize)]
struct RawPlayer {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    lastname: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    role: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    number: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    team_id: Option<u32>,
    #[serde(default)]
    team: Option<Team>,
    #[serde(default, deserialize_with = "lenient_list")]
    games: Vec<Game>,
    #[serde(default, deserialize_with = "lenient_list")]
    goals: Vec<Goal>,
}

impl From<RawPlayer> for Player {
    fn from(raw: RawPlayer) -> Self {
        let team_id = raw.team_id.or_else(|| known_id(raw.team.as_ref().map(|t| t.id)));
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            lastname: raw.lastname,
            role: raw.role,
            age: raw.age,
            number: raw.number,
            team_id,
            team: raw.team,
            games: raw.games,
            goals: raw.goals,
        }
    }
}

#[derive(Deserialize)]
struct RawGame {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    game_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    match_date: Option<String>,
    #[serde(default)]
    home_team: Option<Team>,
    #[serde(default)]
    away_team: Option<Team>,
    #[serde(default, deserialize_with = "lenient_u32")]
    team_1_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    team_2_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    home_team_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    away_team_id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    home_team_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    away_team_score: Option<u32>,
    #[serde(default)]
    championship: Option<Championship>,
    #[serde(default)]
    goal: Option<Vec<Goal>>,
    #[serde(default)]
    goals: Option<Vec<Goal>>,
}

impl From<RawGame> for Game {
    fn from(raw: RawGame) -> Self {
        let home_team_id = known_id(raw.home_team.as_ref().map(|t| t.id))
            .or(raw.team_1_id)
            .or(raw.home_team_id);
        let away_team_id = known_id(raw.away_team.as_ref().map(|t| t.id))
            .or(raw.team_2_id)
            .or(raw.away_team_id);
        Self {
            id: raw.id.unwrap_or_default(),
            date: raw.date.or(raw.game_date).or(raw.match_date),
            home_team: raw.home_team,
            away_team: raw.away_team,
            home_team_id,
            away_team_id,
            home_team_score: raw.home_team_score,
            away_team_score: raw.away_team_score,
            championship: raw.championship,
            goals: raw.goal.or(raw.goals).unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct RawGoal {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    minute: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    game_id: Option<u32>,
    #[serde(default)]
    soccer: Option<Player>,
}

impl From<RawGoal> for Goal {
    fn from(raw: RawGoal) -> Self {
        let scorer_team_id = raw.soccer.as_ref().and_then(|p| p.team_id);
        Self {
            id: raw.id.unwrap_or_default(),
            minute: raw.minute.unwrap_or_default(),
            description: raw.description,
            game_id: raw.game_id,
            scorer: raw.soccer,
            scorer_team_id,
        }
    }
}

#[derive(Deserialize)]
struct RawStandingRow {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    team_id: Option<u32>,
    #[serde(default)]
    team: Option<Team>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    team_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    team_logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    played: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    matches: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    won: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    wins: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    drawn: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    draws: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    lost: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    loses: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    losses: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    goals_for: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    goals_scored: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    goals_against: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    goals_conceded: Option<u32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    goal_difference: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    goals_difference: Option<i32>,
    #[serde(default, deserialize_with = "lenient_i32")]
    points: Option<i32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    position: Option<u32>,
}

impl From<RawStandingRow> for StandingRow {
    fn from(raw: RawStandingRow) -> Self {
        let nested = raw.team.as_ref();
        let team_id = raw
            .team_id
            .or_else(|| known_id(nested.map(|t| t.id)))
            .or(raw.id);
        let name = raw
            .name
            .or(raw.team_name)
            .or_else(|| nested.map(|t| t.name.clone()).filter(|n| !n.is_empty()))
            .unwrap_or_else(|| "Team".to_string());
        let logo = raw
            .logo
            .or(raw.team_logo)
            .or_else(|| nested.and_then(|t| t.logo.clone()));
        let goals_for = raw.goals_for.or(raw.goals_scored).unwrap_or(0);
        let goals_against = raw.goals_against.or(raw.goals_conceded).unwrap_or(0);
        let goal_difference = raw
            .goal_difference
            .or(raw.goals_difference)
            .unwrap_or_else(|| saturating_difference(goals_for, goals_against));

        Self {
            team_id,
            name,
            logo,
            played: raw.played.or(raw.matches).unwrap_or(0),
            won: raw.won.or(raw.wins).unwrap_or(0),
            drawn: raw.drawn.or(raw.draws).unwrap_or(0),
            lost: raw.lost.or(raw.loses).or(raw.losses).unwrap_or(0),
            goals_for,
            goals_against,
            goal_difference,
            points: raw.points.unwrap_or(0),
            position: raw.position.unwrap_or(0),
        }
    }
}

#[derive(Deserialize)]
struct RawStandingsTable {
    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    year: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    standings: Vec<StandingRow>,
}

impl From<RawStandingsTable> for StandingsTable {
    fn from(raw: RawStandingsTable) -> Self {
        StandingsTable::from_rows(
            raw.id.unwrap_or_default(),
            raw.name.unwrap_or_default(),
            raw.year,
            raw.standings,
        )
    }
}

fn saturating_difference(goals_for: u32, goals_against: u32) -> i32 {
    let diff = i64::from(goals_for) - i64::from(goals_against);
    i32::try_from(diff).unwrap_or(if diff < 0 { i32::MIN } else { i32::MAX })
}

fn known_id(id: Option<u32>) -> Option<u32> {
    id.filter(|id| *id != 0)
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_to_u32))
}

fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i32>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_to_i32))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(value_to_string))
}

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|x| u32::try_from(x).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f as u32)
            }),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn value_to_i32(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|x| i32::try_from(x).ok())
            .or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() <= i32::MAX as f64)
                    .map(|f| f as i32)
            }),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
