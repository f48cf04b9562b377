use std::collections::VecDeque;

use serde::Serialize;

use crate::model::{Championship, Game, Player, StandingRow, StandingsTable, Team};
use crate::router::Route;
use crate::stats::{
    self, HomeDigest, MatchGroup, SortColumn, StandingsSort, championship_search_fields,
    match_search_fields, player_search_fields, team_search_fields,
};

const MAX_LOGS: usize = 200;
const MAX_HISTORY: usize = 50;

/// What a route's fetch produced. Detail payloads are `None` when the id does not exist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Home(HomeDigest),
    Championships(Vec<Championship>),
    Championship(Option<Championship>),
    Teams(Vec<Team>),
    Team(Option<Team>),
    Players(Vec<Player>),
    Player(Option<Player>),
    Matches(Vec<Game>),
    Match(Option<Game>),
    Standings(Option<StandingsTable>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Loadable<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Loadable::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Loadable::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// One selectable entry of the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub group: String,
    pub label: String,
    pub route: Route,
}

#[derive(Debug, Clone)]
pub enum Delta {
    Loaded {
        route: Route,
        generation: u64,
        payload: Payload,
    },
    Failed {
        route: Route,
        generation: u64,
        message: String,
    },
    Log(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderCommand {
    Fetch { route: Route, generation: u64 },
    Shutdown,
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub route: Route,
    pub view: Loadable<Payload>,
    /// Bumped on every fetch request; only the matching response may land.
    pub generation: u64,
    pub history: Vec<Route>,
    pub search: String,
    pub search_active: bool,
    pub selected: usize,
    pub standings_sort: StandingsSort,
    pub sort_cursor: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl AppState {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            view: Loadable::Loading,
            generation: 0,
            history: Vec::new(),
            search: String::new(),
            search_active: false,
            selected: 0,
            standings_sort: StandingsSort::default(),
            sort_cursor: default_sort_cursor(),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    /// Mounts `route` from scratch and returns the fetch to send to the provider.
    pub fn enter(&mut self, route: Route) -> ProviderCommand {
        self.route = route;
        self.view = Loadable::Loading;
        self.generation += 1;
        self.search.clear();
        self.search_active = false;
        self.selected = 0;
        self.standings_sort = StandingsSort::default();
        self.sort_cursor = default_sort_cursor();
        ProviderCommand::Fetch {
            route,
            generation: self.generation,
        }
    }

    pub fn navigate(&mut self, route: Route) -> ProviderCommand {
        if route != self.route {
            self.history.push(self.route);
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        }
        self.enter(route)
    }

    pub fn back(&mut self) -> Option<ProviderCommand> {
        let previous = self.history.pop()?;
        Some(self.enter(previous))
    }

    pub fn reload(&mut self) -> ProviderCommand {
        self.enter(self.route)
    }

    pub fn open_selected(&mut self) -> Option<ProviderCommand> {
        let route = self.links().get(self.selected)?.route;
        Some(self.navigate(route))
    }

    pub fn is_current(&self, route: Route, generation: u64) -> bool {
        self.route == route && self.generation == generation
    }

    pub fn select_next(&mut self) {
        let total = self.links().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.links().len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        if self.selected == 0 {
            self.selected = total - 1;
        } else {
            self.selected -= 1;
        }
    }

    pub fn clamp_selection(&mut self) {
        let total = self.links().len();
        if total == 0 {
            self.selected = 0;
        } else if self.selected >= total {
            self.selected = total - 1;
        }
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
        self.selected = 0;
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
        self.selected = 0;
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.selected = 0;
    }

    pub fn sort_cursor_column(&self) -> SortColumn {
        SortColumn::ALL[self.sort_cursor.min(SortColumn::ALL.len() - 1)]
    }

    pub fn move_sort_cursor(&mut self, forward: bool) {
        let len = SortColumn::ALL.len();
        self.sort_cursor = if forward {
            (self.sort_cursor + 1) % len
        } else {
            (self.sort_cursor + len - 1) % len
        };
    }

    /// Same as clicking the highlighted column header.
    pub fn click_sort_column(&mut self) {
        let column = self.sort_cursor_column();
        self.standings_sort.click(column);
        self.selected = 0;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn filtered_championships(&self) -> Vec<&Championship> {
        match self.view.ready() {
            Some(Payload::Championships(items)) => {
                stats::filter_by_text(items, &self.search, championship_search_fields)
            }
            _ => Vec::new(),
        }
    }

    pub fn filtered_teams(&self) -> Vec<&Team> {
        match self.view.ready() {
            Some(Payload::Teams(items)) => {
                stats::filter_by_text(items, &self.search, team_search_fields)
            }
            _ => Vec::new(),
        }
    }

    pub fn filtered_players(&self) -> Vec<&Player> {
        match self.view.ready() {
            Some(Payload::Players(items)) => {
                stats::filter_by_text(items, &self.search, player_search_fields)
            }
            _ => Vec::new(),
        }
    }

    pub fn filtered_match_groups(&self) -> Vec<MatchGroup<'_>> {
        match self.view.ready() {
            Some(Payload::Matches(items)) => stats::group_by_championship(stats::filter_by_text(
                items,
                &self.search,
                match_search_fields,
            )),
            _ => Vec::new(),
        }
    }

    pub fn sorted_standings(&self) -> Vec<&StandingRow> {
        match self.view.ready() {
            Some(Payload::Standings(Some(table))) => self.standings_sort.apply(&table.standings),
            _ => Vec::new(),
        }
    }

    /// Selectable entries of the current screen, in display order.
    pub fn links(&self) -> Vec<Link> {
        let mut out = Vec::new();
        let Some(payload) = self.view.ready() else {
            return out;
        };

        match payload {
            Payload::Home(digest) => {
                for m in &digest.matches {
                    push_link(&mut out, "Matches", match_label(m), m.id, Route::Match);
                }
                for t in &digest.teams {
                    push_link(&mut out, "Teams", t.name.clone(), t.id, Route::Team);
                }
                for p in &digest.players {
                    push_link(&mut out, "Players", p.full_name(), p.id, Route::Player);
                }
            }
            Payload::Championships(_) => {
                let to_route: fn(u32) -> Route = if self.route == Route::Standings {
                    Route::StandingsDetail
                } else {
                    Route::Championship
                };
                for c in self.filtered_championships() {
                    push_link(&mut out, "Championships", championship_label(c), c.id, to_route);
                }
            }
            Payload::Championship(Some(c)) => {
                for t in &c.teams {
                    push_link(&mut out, "Teams", t.name.clone(), t.id, Route::Team);
                }
                for m in &c.games {
                    push_link(&mut out, "Matches", match_label(m), m.id, Route::Match);
                }
                push_link(
                    &mut out,
                    "Standings",
                    format!("{} standings", c.name),
                    c.id,
                    Route::StandingsDetail,
                );
            }
            Payload::Teams(_) => {
                for t in self.filtered_teams() {
                    push_link(&mut out, "Teams", t.name.clone(), t.id, Route::Team);
                }
            }
            Payload::Team(Some(t)) => {
                if let Some(c) = &t.championship {
                    push_link(
                        &mut out,
                        "Championship",
                        championship_label(c),
                        c.id,
                        Route::Championship,
                    );
                }
                for p in &t.players {
                    push_link(&mut out, "Players", player_label(p), p.id, Route::Player);
                }
                for m in &t.games {
                    push_link(&mut out, "Matches", match_label(m), m.id, Route::Match);
                }
            }
            Payload::Players(_) => {
                for p in self.filtered_players() {
                    let label = match p.team.as_ref().map(|t| t.name.as_str()) {
                        Some(team) if !team.is_empty() => format!("{} · {team}", p.full_name()),
                        _ => p.full_name(),
                    };
                    push_link(&mut out, "Players", label, p.id, Route::Player);
                }
            }
            Payload::Player(Some(p)) => {
                if let Some(t) = &p.team {
                    push_link(&mut out, "Team", t.name.clone(), t.id, Route::Team);
                    if let Some(c) = &t.championship {
                        push_link(
                            &mut out,
                            "Championship",
                            championship_label(c),
                            c.id,
                            Route::Championship,
                        );
                    }
                }
                for m in &p.games {
                    let scored = stats::goals_in_game(&p.goals, m.id).len();
                    let label = match scored {
                        0 => match_label(m),
                        1 => format!("{}  (1 goal)", match_label(m)),
                        n => format!("{}  ({n} goals)", match_label(m)),
                    };
                    push_link(&mut out, "Matches", label, m.id, Route::Match);
                }
            }
            Payload::Matches(_) => {
                for group in self.filtered_match_groups() {
                    for m in group.matches {
                        push_link(
                            &mut out,
                            &group.championship,
                            match_label(m),
                            m.id,
                            Route::Match,
                        );
                    }
                }
            }
            Payload::Match(Some(m)) => {
                for team in [m.home_team.as_ref(), m.away_team.as_ref()].into_iter().flatten() {
                    push_link(&mut out, "Teams", team.name.clone(), team.id, Route::Team);
                }
                for team in [m.home_team.as_ref(), m.away_team.as_ref()].into_iter().flatten() {
                    for p in &team.players {
                        push_link(&mut out, &team.name, player_label(p), p.id, Route::Player);
                    }
                }
            }
            Payload::Standings(Some(_)) => {
                for row in self.sorted_standings() {
                    if let Some(team_id) = row.team_id {
                        let label = format!("{}. {}", row.position, row.name);
                        push_link(&mut out, "Standings", label, team_id, Route::Team);
                    }
                }
            }
            Payload::Championship(None)
            | Payload::Team(None)
            | Payload::Player(None)
            | Payload::Match(None)
            | Payload::Standings(None) => {}
        }

        out
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Loaded {
            route,
            generation,
            payload,
        } => {
            if !state.is_current(route, generation) {
                state.push_log(format!("[INFO] Discarded stale response for {route}"));
                return;
            }
            state.view = Loadable::Ready(payload);
            state.clamp_selection();
        }
        Delta::Failed {
            route,
            generation,
            message,
        } => {
            if !state.is_current(route, generation) {
                state.push_log(format!("[INFO] Discarded stale error for {route}"));
                return;
            }
            state.push_log(format!("[WARN] {route}: {message}"));
            state.view = Loadable::Failed(message);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn match_label(m: &Game) -> String {
    format!("{} {} {}", m.home_name(), m.score_label(), m.away_name())
}

pub fn championship_label(c: &Championship) -> String {
    match c.year.as_deref() {
        Some(year) => format!("{} ({year})", c.name),
        None => c.name.clone(),
    }
}

fn player_label(p: &Player) -> String {
    let mut label = p.full_name();
    if let Some(role) = p.role.as_deref() {
        label.push_str(&format!(" · {role}"));
    }
    if let Some(number) = p.number {
        label.push_str(&format!(" #{number}"));
    }
    label
}

fn push_link(out: &mut Vec<Link>, group: &str, label: String, id: u32, to_route: fn(u32) -> Route) {
    if id == 0 {
        return;
    }
    out.push(Link {
        group: group.to_string(),
        label,
        route: to_route(id),
    });
}

fn default_sort_cursor() -> usize {
    SortColumn::ALL
        .iter()
        .position(|c| *c == SortColumn::Points)
        .unwrap_or(0)
}
