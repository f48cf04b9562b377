use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use log::{info, warn};

use crate::api::RouteSource;
use crate::router::Route;
use crate::state::{Delta, ProviderCommand};

/// Runs fetch commands off the UI thread until `Shutdown` arrives or the command
/// channel closes. Each fetch is one task on a bounded pool.
pub fn spawn_provider(
    source: Arc<dyn RouteSource>,
    parallelism: usize,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(parallelism);
        if pool.is_none() {
            warn!("fetch pool unavailable, falling back to one thread per request");
        }

        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Fetch { route, generation } => {
                    let source = source.clone();
                    let tx = tx.clone();
                    let job = move || run_fetch(source.as_ref(), route, generation, today(), &tx);
                    if let Some(pool) = pool.as_ref() {
                        pool.spawn(job);
                    } else {
                        thread::spawn(job);
                    }
                }
                ProviderCommand::Shutdown => break,
            }
        }
        info!("provider stopped");
    })
}

/// Loads one route and reports it. Used by the pool tasks and by `champ_dump`.
pub fn run_fetch(
    source: &dyn RouteSource,
    route: Route,
    generation: u64,
    today: NaiveDate,
    tx: &Sender<Delta>,
) {
    let started = Instant::now();
    match source.load(route, today) {
        Ok(payload) => {
            let _ = tx.send(Delta::Log(format!(
                "[INFO] Loaded {route} in {} ms",
                started.elapsed().as_millis()
            )));
            let _ = tx.send(Delta::Loaded {
                route,
                generation,
                payload,
            });
        }
        Err(err) => {
            warn!("fetch {route} failed: {err:#}");
            let _ = tx.send(Delta::Failed {
                route,
                generation,
                message: format!("{err:#}"),
            });
        }
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .thread_name(|idx| format!("champ-fetch-{idx}"))
        .build()
        .ok()
}

/// The current calendar day in UTC, used for the home digest.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
