use std::sync::mpsc;

use anyhow::{Context, Result, bail};

use champ_terminal::api::ApiClient;
use champ_terminal::config::{self, Config};
use champ_terminal::feed::{run_fetch, today};
use champ_terminal::router::Route;
use champ_terminal::state::{AppState, Loadable, apply_delta};
use champ_terminal::ui::summary_lines;

struct Args {
    route: Route,
    search: Option<String>,
    json: bool,
}

fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cfg = Config::from_env()?;
    let args = parse_args(std::env::args().skip(1), cfg.start_route)?;
    let api = ApiClient::new(&cfg)?;

    let mut state = AppState::new(args.route);
    state.enter(args.route);

    let (tx, rx) = mpsc::channel();
    run_fetch(&api, args.route, state.generation, today(), &tx);
    drop(tx);
    for delta in rx {
        apply_delta(&mut state, delta);
    }

    if let Loadable::Failed(message) = &state.view {
        bail!("failed to load {}: {message}", args.route);
    }

    if let Some(term) = args.search {
        state.search = term;
        state.clamp_selection();
    }

    if args.json {
        let Loadable::Ready(payload) = &state.view else {
            bail!("no payload for {}", args.route);
        };
        let out = serde_json::to_string_pretty(payload).context("failed to encode payload")?;
        println!("{out}");
        return Ok(());
    }

    for line in summary_lines(&state) {
        println!("{line}");
    }
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>, default_route: Route) -> Result<Args> {
    let mut route = None;
    let mut search = None;
    let mut json = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--search" | "-s" => {
                let term = args.next().context("--search needs a term")?;
                search = Some(term);
            }
            "--json" => json = true,
            "--help" | "-h" => {
                println!("usage: champ_dump [ROUTE] [--search TERM] [--json]");
                std::process::exit(0);
            }
            other if route.is_none() => {
                route = Some(Route::parse(other).with_context(|| format!("bad route {other}"))?);
            }
            other => bail!("unexpected argument {other}"),
        }
    }

    Ok(Args {
        route: route.unwrap_or(default_route),
        search,
        json,
    })
}
