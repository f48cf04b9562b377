use chrono::NaiveDateTime;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};

use crate::model::{Championship, Game, Player, StandingsTable, Team};
use crate::router::{NAV_MENU, Route};
use crate::state::{AppState, Link, Loadable, Payload, championship_label};
use crate::stats::{
    SortColumn, SortDirection, StandingZone, championship_aggregate, player_stats, split_goals,
    standing_zone, team_record,
};

const APP_TITLE: &str = "CHAMP TERMINAL";

pub fn ui(frame: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(5),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], state);

    let footer = Paragraph::new(footer_text(state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

pub fn header_text(state: &AppState) -> String {
    let line1 = format!(" {APP_TITLE} | {} | {}", state.route.title(), state.route.path());
    let tabs = NAV_MENU
        .iter()
        .map(|(key, label, route)| {
            if route.section() == state.route.section() {
                format!("[{key} {label}]")
            } else {
                format!(" {key} {label} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    format!("{line1}\n{tabs}")
}

pub fn footer_text(state: &AppState) -> String {
    let keys = if state.search_active {
        "Type to search | Enter/Esc Done | Backspace Delete".to_string()
    } else {
        let mut keys = "1-6 Menu | j/k Move | Enter Open | b/Esc Back | r Reload".to_string();
        if state.route.is_searchable() {
            keys.push_str(" | / Search");
        }
        if matches!(state.route, Route::StandingsDetail(_)) {
            keys.push_str(" | ←/→ Column | s Sort");
        }
        keys.push_str(" | ? Help | q Quit");
        keys
    };
    format!("{keys}\n{}", console_text(state))
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No alerts yet".to_string();
    }
    let skip = state.logs.len().saturating_sub(3);
    state
        .logs
        .iter()
        .skip(skip)
        .cloned()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let payload = match &state.view {
        Loadable::Loading => {
            let text = format!("Loading {}...", state.route.title().to_lowercase());
            let loading = Paragraph::new(text)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(loading, area);
            return;
        }
        Loadable::Failed(message) => {
            let text = format!(
                "Could not load {}\n\n{message}\n\nPress r to retry",
                state.route.path()
            );
            let error = Paragraph::new(text)
                .style(Style::default().fg(Color::Red))
                .wrap(Wrap { trim: false })
                .block(Block::default().title("Error").borders(Borders::ALL));
            frame.render_widget(error, area);
            return;
        }
        Loadable::Ready(payload) => payload,
    };

    let detail = detail_lines(payload);
    let searchable = state.route.is_searchable();

    let mut constraints = Vec::new();
    if searchable {
        constraints.push(Constraint::Length(1));
    }
    if !detail.is_empty() {
        constraints.push(Constraint::Length(detail.len() as u16 + 2));
    }
    constraints.push(Constraint::Min(1));
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut idx = 0;
    if searchable {
        render_search_line(frame, chunks[idx], state);
        idx += 1;
    }
    if !detail.is_empty() {
        let panel = Paragraph::new(detail.join("\n"))
            .wrap(Wrap { trim: false })
            .block(Block::default().title(state.route.title()).borders(Borders::ALL));
        frame.render_widget(panel, chunks[idx]);
        idx += 1;
    }

    match payload {
        Payload::Standings(Some(table)) => render_standings(frame, chunks[idx], state, table),
        _ => render_links(frame, chunks[idx], state, payload),
    }
}

fn render_search_line(frame: &mut Frame, area: Rect, state: &AppState) {
    let (text, style) = if state.search_active {
        (
            format!(" Search: {}_", state.search),
            Style::default().fg(Color::Yellow),
        )
    } else if state.search.is_empty() {
        (
            " Press / to search".to_string(),
            Style::default().fg(Color::DarkGray),
        )
    } else {
        (format!(" Search: {}", state.search), Style::default())
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_links(frame: &mut Frame, area: Rect, state: &AppState, payload: &Payload) {
    let links = state.links();
    let block = Block::default().borders(Borders::ALL);

    if links.is_empty() {
        let text = empty_message(state, payload).unwrap_or_default();
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    let mut selected_line = 0;
    let mut group: Option<&str> = None;
    for (idx, link) in links.iter().enumerate() {
        if group != Some(link.group.as_str()) {
            group = Some(link.group.as_str());
            lines.push(Line::from(Span::styled(
                link.group.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        if idx == state.selected {
            selected_line = lines.len();
            lines.push(Line::from(Span::styled(
                format!("> {}", link.label),
                Style::default().fg(Color::Black).bg(Color::Cyan),
            )));
        } else {
            lines.push(Line::from(format!("  {}", link.label)));
        }
    }

    let visible = area.height.saturating_sub(2) as usize;
    let (start, end) = visible_range(selected_line, lines.len(), visible);
    let window: Vec<Line> = lines.drain(start..end).collect();
    frame.render_widget(Paragraph::new(window).block(block), area);
}

fn render_standings(frame: &mut Frame, area: Rect, state: &AppState, table: &StandingsTable) {
    let rows = state.sorted_standings();
    let cursor = state.sort_cursor_column();

    let mut header_cells = vec![Cell::from(column_header(state, SortColumn::Position))];
    header_cells.push(Cell::from("Team"));
    for column in SortColumn::ALL.iter().skip(1) {
        header_cells.push(Cell::from(column_header(state, *column)));
    }
    let header_cells: Vec<Cell> = header_cells
        .into_iter()
        .enumerate()
        .map(|(idx, cell)| {
            let column = match idx {
                0 => Some(SortColumn::Position),
                1 => None,
                n => SortColumn::ALL.get(n - 1).copied(),
            };
            if column == Some(cursor) {
                cell.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                cell.style(Style::default().add_modifier(Modifier::BOLD))
            }
        })
        .collect();

    let body: Vec<Row> = rows
        .iter()
        .map(|row| {
            let style = match standing_zone(row.position) {
                Some(StandingZone::Podium) => Style::default().fg(Color::Green),
                Some(StandingZone::Europe) => Style::default().fg(Color::Cyan),
                None => Style::default(),
            };
            Row::new(vec![
                Cell::from(row.position.to_string()),
                Cell::from(row.name.clone()),
                Cell::from(row.played.to_string()),
                Cell::from(row.won.to_string()),
                Cell::from(row.drawn.to_string()),
                Cell::from(row.lost.to_string()),
                Cell::from(row.goals_for.to_string()),
                Cell::from(row.goals_against.to_string()),
                Cell::from(row.goal_difference.to_string()),
                Cell::from(row.points.to_string()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(4),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(5),
    ];

    let selected_route = state.links().get(state.selected).map(|link| link.route);
    let selected_row = selected_route
        .and_then(|route| rows.iter().position(|r| r.team_id.map(Route::Team) == Some(route)));

    let title = if table.name.is_empty() {
        "Standings".to_string()
    } else {
        standings_title(table)
    };
    let widget = Table::new(body, widths)
        .header(Row::new(header_cells))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .block(Block::default().title(title).borders(Borders::ALL));

    if rows.is_empty() {
        let empty = Paragraph::new("No standings yet")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let mut table_state = TableState::default().with_selected(selected_row);
    frame.render_stateful_widget(widget, area, &mut table_state);
}

fn column_header(state: &AppState, column: SortColumn) -> String {
    if state.standings_sort.column != column {
        return column.label().to_string();
    }
    let arrow = match state.standings_sort.direction {
        SortDirection::Ascending => "▲",
        SortDirection::Descending => "▼",
    };
    format!("{}{arrow}", column.label())
}

fn standings_title(table: &StandingsTable) -> String {
    match table.year.as_deref() {
        Some(year) => format!("{} ({year})", table.name),
        None => table.name.clone(),
    }
}

/// Text shown above the link list; empty for pure list screens.
pub fn detail_lines(payload: &Payload) -> Vec<String> {
    match payload {
        Payload::Home(digest) => {
            let heading = if digest.today_only {
                "Today's matches".to_string()
            } else if digest.matches.is_empty() {
                "No matches scheduled".to_string()
            } else {
                "No matches today, showing the latest fixtures".to_string()
            };
            vec![heading]
        }
        Payload::Championship(Some(c)) => championship_lines(c),
        Payload::Team(Some(t)) => team_lines(t),
        Payload::Player(Some(p)) => player_lines(p),
        Payload::Match(Some(m)) => match_lines(m),
        Payload::Standings(Some(table)) if table.name.is_empty() => Vec::new(),
        Payload::Standings(Some(table)) => vec![standings_title(table)],
        _ => Vec::new(),
    }
}

fn championship_lines(c: &Championship) -> Vec<String> {
    let agg = championship_aggregate(&c.teams, &c.games);
    let mut lines = vec![championship_label(c)];
    if let Some(country) = c.country.as_deref() {
        lines.push(format!("Country: {country}"));
    }
    lines.push(format!(
        "Teams: {} | Matches: {}",
        agg.total_teams, agg.total_matches
    ));
    lines.push(format!(
        "Home wins: {} | Away wins: {} | Draws: {}",
        agg.home_wins, agg.away_wins, agg.draws
    ));
    lines
}

fn team_lines(t: &Team) -> Vec<String> {
    let record = team_record(t.id, &t.games);
    let mut lines = vec![t.name.clone()];
    if let Some(city) = t.city.as_deref() {
        lines.push(format!("City: {city}"));
    }
    if let Some(c) = &t.championship {
        lines.push(format!("Championship: {}", championship_label(c)));
    }
    let players = t.players_count.map(|n| n as usize).unwrap_or(t.players.len());
    lines.push(format!("Players: {players}"));
    lines.push(format!(
        "Played: {} | W {} | D {} | L {}",
        record.total, record.wins, record.draws, record.losses
    ));
    lines
}

fn player_lines(p: &Player) -> Vec<String> {
    let stats = player_stats(&p.games, &p.goals);
    let mut lines = vec![p.full_name()];
    let mut facts = Vec::new();
    if let Some(role) = p.role.as_deref() {
        facts.push(format!("Role: {role}"));
    }
    if let Some(number) = p.number {
        facts.push(format!("Number: {number}"));
    }
    if let Some(age) = p.age {
        facts.push(format!("Age: {age}"));
    }
    if !facts.is_empty() {
        lines.push(facts.join(" | "));
    }
    if let Some(team) = &p.team {
        lines.push(format!("Team: {}", team.name));
    }
    lines.push(format!(
        "Games: {} | Goals: {} | Games with a goal: {} | Goals per game: {}",
        stats.total_games, stats.total_goals, stats.games_with_goals, stats.goals_per_game
    ));
    lines
}

fn match_lines(m: &Game) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} {}",
        m.home_name(),
        m.score_label(),
        m.away_name()
    )];
    if let Some(date) = m.date.as_deref() {
        lines.push(format!("Date: {}", format_match_date(date)));
    }
    if let Some(name) = m.championship_name() {
        lines.push(format!("Championship: {name}"));
    }

    let split = split_goals(m);
    for (team, goals) in [(m.home_name(), &split.home), (m.away_name(), &split.away)] {
        if goals.is_empty() {
            continue;
        }
        let scorers = goals
            .iter()
            .map(|g| format!("{}' {}", g.minute, g.scorer_name()))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("{team} goals: {scorers}"));
    }
    lines
}

/// What the link area says when it has nothing to show.
pub fn empty_message(state: &AppState, payload: &Payload) -> Option<String> {
    if state.route.is_searchable() && !state.search.trim().is_empty() {
        return Some(format!("No results for \"{}\"", state.search.trim()));
    }
    let message = match payload {
        Payload::Home(digest) if digest.matches.is_empty() && digest.players.is_empty() => {
            "Nothing to show yet"
        }
        Payload::Championships(items) if items.is_empty() => "No championships found",
        Payload::Teams(items) if items.is_empty() => "No teams found",
        Payload::Players(items) if items.is_empty() => "No players found",
        Payload::Matches(items) if items.is_empty() => "No matches found",
        Payload::Championship(None) => "Championship not found",
        Payload::Team(None) => "Team not found",
        Payload::Player(None) => "Player not found",
        Payload::Match(None) => "Match not found",
        Payload::Standings(None) => "Standings not found",
        Payload::Standings(Some(table)) if table.standings.is_empty() => "No standings yet",
        _ => "Nothing linked here",
    };
    Some(message.to_string())
}

/// Plain-text rendering of the current screen, used by `champ_dump`.
pub fn summary_lines(state: &AppState) -> Vec<String> {
    let mut out = vec![format!("{} ({})", state.route.title(), state.route.path())];
    let payload = match &state.view {
        Loadable::Loading => {
            out.push("Loading...".to_string());
            return out;
        }
        Loadable::Failed(message) => {
            out.push(format!("Error: {message}"));
            return out;
        }
        Loadable::Ready(payload) => payload,
    };

    out.extend(detail_lines(payload));

    if let Payload::Standings(Some(_)) = payload {
        let rows = state.sorted_standings();
        if rows.is_empty() {
            out.push("No standings yet".to_string());
        } else {
            out.push(format!(
                "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
                "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"
            ));
            for row in rows {
                out.push(format!(
                    "{:>3}  {:<24} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}",
                    row.position,
                    row.name,
                    row.played,
                    row.won,
                    row.drawn,
                    row.lost,
                    row.goals_for,
                    row.goals_against,
                    row.goal_difference,
                    row.points
                ));
            }
        }
        return out;
    }

    let links = state.links();
    if links.is_empty() {
        out.extend(empty_message(state, payload));
        return out;
    }
    out.extend(link_lines(&links));
    out
}

fn link_lines(links: &[Link]) -> Vec<String> {
    let mut out = Vec::new();
    let mut group: Option<&str> = None;
    for link in links {
        if group != Some(link.group.as_str()) {
            group = Some(link.group.as_str());
            out.push(format!("[{}]", link.group));
        }
        out.push(format!("  {}  {}", link.label, link.route));
    }
    out
}

pub fn format_match_date(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "TBD".to_string();
    }
    if let Some(dt) = parse_match_time(cleaned) {
        return dt.format("%Y-%m-%d %H:%M").to_string();
    }
    if cleaned.len() >= 16 && cleaned.is_char_boundary(16) {
        return cleaned[..16].replace('T', " ");
    }
    cleaned.replace('T', " ")
}

fn parse_match_time(raw: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 5] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.fZ",
    ];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(Clear, popup_area);

    let mut text = vec!["Champ Terminal - Help".to_string(), String::new()];
    text.push("Menu:".to_string());
    for (key, label, _) in NAV_MENU {
        text.push(format!("  {key}            {label}"));
    }
    text.extend(
        [
            "",
            "Everywhere:",
            "  j/k or ↑/↓   Move",
            "  Enter        Open selection",
            "  b / Esc      Back",
            "  r            Reload",
            "  ?            Toggle help",
            "  q            Quit",
            "",
            "Lists:",
            "  /            Search",
            "",
            "Standings table:",
            "  ←/→          Pick column",
            "  s            Sort by column (again to flip)",
        ]
        .map(String::from),
    );

    let help = Paragraph::new(text.join("\n"))
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::{format_match_date, visible_range};

    #[test]
    fn match_dates_are_trimmed_to_minutes() {
        assert_eq!(format_match_date("2024-05-01T20:45:00"), "2024-05-01 20:45");
        assert_eq!(format_match_date("2024-05-01 20:45"), "2024-05-01 20:45");
        assert_eq!(format_match_date("2024-05-01"), "2024-05-01");
        assert_eq!(format_match_date(""), "TBD");
    }

    #[test]
    fn window_follows_the_selection() {
        assert_eq!(visible_range(0, 3, 10), (0, 3));
        assert_eq!(visible_range(9, 20, 6), (6, 12));
        assert_eq!(visible_range(19, 20, 6), (14, 20));
    }
}
