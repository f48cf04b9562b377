use std::fmt;

use anyhow::{Result, anyhow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Championships,
    Championship(u32),
    Teams,
    Team(u32),
    Players,
    Player(u32),
    Matches,
    Match(u32),
    Standings,
    StandingsDetail(u32),
}

/// Top-level menu sections; detail routes belong to the section of their list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Home,
    Championships,
    Teams,
    Players,
    Matches,
    Standings,
}

pub const NAV_MENU: [(char, &str, Route); 6] = [
    ('1', "Home", Route::Home),
    ('2', "Championships", Route::Championships),
    ('3', "Teams", Route::Teams),
    ('4', "Players", Route::Players),
    ('5', "Matches", Route::Matches),
    ('6', "Standings", Route::Standings),
];

impl Route {
    pub fn parse(raw: &str) -> Result<Route> {
        let trimmed = raw.trim();
        let path = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let mut parts = path.split('/');
        if parts.next() != Some("") {
            return Err(anyhow!("route must start with '/': {raw}"));
        }
        let segments: Vec<&str> = parts.collect();

        let route = match segments.as_slice() {
            [] => Route::Home,
            ["championship"] => Route::Championships,
            ["championship", id] => Route::Championship(parse_id(id, raw)?),
            ["teams"] => Route::Teams,
            ["team", id] => Route::Team(parse_id(id, raw)?),
            ["players"] => Route::Players,
            ["player", id] => Route::Player(parse_id(id, raw)?),
            ["matches"] => Route::Matches,
            ["match", id] => Route::Match(parse_id(id, raw)?),
            ["standings"] => Route::Standings,
            ["standings", id] => Route::StandingsDetail(parse_id(id, raw)?),
            _ => return Err(anyhow!("unknown route: {raw}")),
        };
        Ok(route)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Championships => "/championship".to_string(),
            Route::Championship(id) => format!("/championship/{id}"),
            Route::Teams => "/teams".to_string(),
            Route::Team(id) => format!("/team/{id}"),
            Route::Players => "/players".to_string(),
            Route::Player(id) => format!("/player/{id}"),
            Route::Matches => "/matches".to_string(),
            Route::Match(id) => format!("/match/{id}"),
            Route::Standings => "/standings".to_string(),
            Route::StandingsDetail(id) => format!("/standings/{id}"),
        }
    }

    pub fn section(&self) -> Section {
        match self {
            Route::Home => Section::Home,
            Route::Championships | Route::Championship(_) => Section::Championships,
            Route::Teams | Route::Team(_) => Section::Teams,
            Route::Players | Route::Player(_) => Section::Players,
            Route::Matches | Route::Match(_) => Section::Matches,
            Route::Standings | Route::StandingsDetail(_) => Section::Standings,
        }
    }

    /// List routes carry a search line.
    pub fn is_searchable(&self) -> bool {
        matches!(
            self,
            Route::Championships | Route::Teams | Route::Players | Route::Matches | Route::Standings
        )
    }

    pub fn title(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::Championships => "Championships",
            Route::Championship(_) => "Championship",
            Route::Teams => "Teams",
            Route::Team(_) => "Team",
            Route::Players => "Players",
            Route::Player(_) => "Player",
            Route::Matches => "Matches",
            Route::Match(_) => "Match",
            Route::Standings => "Standings",
            Route::StandingsDetail(_) => "Standings table",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

pub fn nav_route_for_key(key: char) -> Option<Route> {
    NAV_MENU
        .iter()
        .find(|(k, _, _)| *k == key)
        .map(|(_, _, route)| *route)
}

fn parse_id(raw_id: &str, raw: &str) -> Result<u32> {
    raw_id
        .parse::<u32>()
        .map_err(|_| anyhow!("invalid id {raw_id:?} in route {raw}"))
}
