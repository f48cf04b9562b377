use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::http_client::http_client;
use crate::model::{Championship, Game, Player, StandingRow, StandingsTable, Team};
use crate::router::Route;
use crate::state::Payload;
use crate::stats::home_digest;

const ERROR_SNIPPET_CHARS: usize = 200;

/// A remote record or collection, relative to the API base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Championships,
    Championship(u32),
    Teams,
    Team(u32),
    Players,
    Player(u32),
    Games,
    Game(u32),
    Standings(u32),
}

impl Resource {
    pub fn path(&self) -> String {
        match self {
            Resource::Championships => "/championships".to_string(),
            Resource::Championship(id) => format!("/championships/{id}"),
            Resource::Teams => "/teams".to_string(),
            Resource::Team(id) => format!("/teams/{id}"),
            Resource::Players => "/soccers".to_string(),
            Resource::Player(id) => format!("/soccers/{id}"),
            Resource::Games => "/games".to_string(),
            Resource::Game(id) => format!("/games/{id}"),
            Resource::Standings(id) => format!("/standings/{id}"),
        }
    }

    pub fn is_single(&self) -> bool {
        !matches!(
            self,
            Resource::Championships | Resource::Teams | Resource::Players | Resource::Games
        )
    }
}

/// Anything able to produce the payload of a route. The provider thread only sees this.
pub trait RouteSource: Send + Sync {
    fn load(&self, route: Route, today: NaiveDate) -> Result<Payload>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    client: &'static Client,
}

impl ApiClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            base: cfg.api_base.clone(),
            client: http_client(cfg.timeout)?,
        })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url(&self, resource: Resource) -> String {
        format!("{}{}", self.base, resource.path())
    }

    /// GETs `resource` and returns the contents of its `data` envelope.
    /// A missing single record comes back as `Value::Null`.
    pub fn fetch(&self, resource: Resource) -> Result<Value> {
        let url = self.url(resource);
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("request to {url} failed"))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND && resource.is_single() {
            debug!("{url} -> 404, treating as not found");
            return Ok(Value::Null);
        }

        let body = resp.text().context("failed to read response body")?;
        if !status.is_success() {
            let snippet: String = body.trim().chars().take(ERROR_SNIPPET_CHARS).collect();
            if snippet.is_empty() {
                return Err(anyhow!("http {status} for {url}"));
            }
            return Err(anyhow!("http {status} for {url}: {snippet}"));
        }
        parse_envelope(&body).with_context(|| format!("bad response from {url}"))
    }

    pub fn fetch_championships(&self) -> Result<Vec<Championship>> {
        decode_list(self.fetch(Resource::Championships)?, "championships")
    }

    pub fn fetch_championship(&self, id: u32) -> Result<Option<Championship>> {
        decode_one(self.fetch(Resource::Championship(id))?, "championship")
    }

    pub fn fetch_teams(&self) -> Result<Vec<Team>> {
        decode_list(self.fetch(Resource::Teams)?, "teams")
    }

    pub fn fetch_team(&self, id: u32) -> Result<Option<Team>> {
        decode_one(self.fetch(Resource::Team(id))?, "team")
    }

    pub fn fetch_players(&self) -> Result<Vec<Player>> {
        decode_list(self.fetch(Resource::Players)?, "players")
    }

    pub fn fetch_player(&self, id: u32) -> Result<Option<Player>> {
        decode_one(self.fetch(Resource::Player(id))?, "player")
    }

    pub fn fetch_games(&self) -> Result<Vec<Game>> {
        decode_list(self.fetch(Resource::Games)?, "games")
    }

    pub fn fetch_game(&self, id: u32) -> Result<Option<Game>> {
        decode_one(self.fetch(Resource::Game(id))?, "game")
    }

    pub fn fetch_standings(&self, id: u32) -> Result<Option<StandingsTable>> {
        decode_standings(self.fetch(Resource::Standings(id))?, id)
    }

    pub fn fetch_route(&self, route: Route, today: NaiveDate) -> Result<Payload> {
        let payload = match route {
            Route::Home => {
                let games = self.fetch_games()?;
                let players = self.fetch_players()?;
                Payload::Home(home_digest(games, players, today))
            }
            Route::Championships | Route::Standings => {
                Payload::Championships(self.fetch_championships()?)
            }
            Route::Championship(id) => Payload::Championship(self.fetch_championship(id)?),
            Route::Teams => Payload::Teams(self.fetch_teams()?),
            Route::Team(id) => Payload::Team(self.fetch_team(id)?),
            Route::Players => Payload::Players(self.fetch_players()?),
            Route::Player(id) => Payload::Player(self.fetch_player(id)?),
            Route::Matches => Payload::Matches(self.fetch_games()?),
            Route::Match(id) => Payload::Match(self.fetch_game(id)?),
            Route::StandingsDetail(id) => Payload::Standings(self.fetch_standings(id)?),
        };
        Ok(payload)
    }
}

impl RouteSource for ApiClient {
    fn load(&self, route: Route, today: NaiveDate) -> Result<Payload> {
        self.fetch_route(route, today)
    }
}

/// Unwraps `{ "data": ... }`. An empty body or a bare `null` yields `Value::Null`.
pub fn parse_envelope(raw: &str) -> Result<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    let root: Value = serde_json::from_str(trimmed).context("invalid json")?;
    match root {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| anyhow!("response has no data envelope")),
        _ => Err(anyhow!("response has no data envelope")),
    }
}

pub fn parse_championships_json(raw: &str) -> Result<Vec<Championship>> {
    decode_list(parse_envelope(raw)?, "championships")
}

pub fn parse_championship_json(raw: &str) -> Result<Option<Championship>> {
    decode_one(parse_envelope(raw)?, "championship")
}

pub fn parse_teams_json(raw: &str) -> Result<Vec<Team>> {
    decode_list(parse_envelope(raw)?, "teams")
}

pub fn parse_team_json(raw: &str) -> Result<Option<Team>> {
    decode_one(parse_envelope(raw)?, "team")
}

pub fn parse_players_json(raw: &str) -> Result<Vec<Player>> {
    decode_list(parse_envelope(raw)?, "players")
}

pub fn parse_player_json(raw: &str) -> Result<Option<Player>> {
    decode_one(parse_envelope(raw)?, "player")
}

pub fn parse_games_json(raw: &str) -> Result<Vec<Game>> {
    decode_list(parse_envelope(raw)?, "games")
}

pub fn parse_game_json(raw: &str) -> Result<Option<Game>> {
    decode_one(parse_envelope(raw)?, "game")
}

/// `id` is used when the payload is a bare list of rows.
pub fn parse_standings_json(raw: &str, id: u32) -> Result<Option<StandingsTable>> {
    decode_standings(parse_envelope(raw)?, id)
}

fn decode_list<T: DeserializeOwned>(data: Value, what: &str) -> Result<Vec<T>> {
    if data.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(data).with_context(|| format!("invalid {what} payload"))
}

fn decode_one<T: DeserializeOwned>(data: Value, what: &str) -> Result<Option<T>> {
    if data.is_null() {
        return Ok(None);
    }
    serde_json::from_value(data)
        .map(Some)
        .with_context(|| format!("invalid {what} payload"))
}

fn decode_standings(data: Value, id: u32) -> Result<Option<StandingsTable>> {
    match data {
        Value::Null => Ok(None),
        Value::Array(_) => {
            let rows: Vec<StandingRow> =
                serde_json::from_value(data).context("invalid standings payload")?;
            Ok(Some(StandingsTable::from_rows(id, String::new(), None, rows)))
        }
        other => decode_one(other, "standings"),
    }
}
