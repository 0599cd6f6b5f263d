//! Line-driven front end for the search client.
//!
//! Each stdin line is the full current text of the search box. Lines starting
//! with `:` change the selection instead:
//!
//! - `:genre <label>` selects a genre, `:genre -` selects uncategorized shows
//! - `:show <id>` selects a show
//! - `:clear` clears the selection

use crate::client::api::{FetchError, ProxyClient};
use crate::client::debounce::Debouncer;
use crate::client::genres::GenreKey;
use crate::client::session::{SearchSession, SearchView};
use crate::tvmaze::SearchMatch;
use anyhow::Context;
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, warn};

#[derive(Debug, PartialEq)]
enum Command {
    Input(String),
    Genre(GenreKey),
    Show(u64),
    Clear,
}

fn parse_line(line: &str) -> Result<Command, String> {
    let Some(directive) = line.strip_prefix(':') else {
        return Ok(Command::Input(line.to_owned()));
    };
    let (name, arg) = directive
        .split_once(char::is_whitespace)
        .map(|(name, arg)| (name, arg.trim()))
        .unwrap_or((directive.trim(), ""));
    match name {
        "genre" if arg == "-" => Ok(Command::Genre(GenreKey::Uncategorized)),
        "genre" if !arg.is_empty() => Ok(Command::Genre(GenreKey::genre(arg))),
        "show" => arg
            .parse()
            .map(Command::Show)
            .map_err(|_| format!("not a show id: {arg:?}")),
        "clear" => Ok(Command::Clear),
        _ => Err(format!("unknown command: {line}")),
    }
}

type Fetched = (String, Result<Vec<SearchMatch>, FetchError>);

/// Run the client until stdin closes and every scheduled fetch has finished.
pub async fn run(api: ProxyClient, delay: Duration) -> anyhow::Result<()> {
    let mut session = SearchSession::new();
    let (mut debouncer, mut settled) = Debouncer::new(delay);
    let mut fetches: JoinSet<Fetched> = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    // The empty initial query goes through a fetch cycle like any other.
    debouncer.push(session.query().to_owned());

    loop {
        if !stdin_open && fetches.is_empty() && !debouncer.is_pending() && settled.is_empty() {
            break;
        }

        tokio::select! {
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    stdin_open = false;
                    continue;
                };
                match parse_line(&line) {
                    Ok(Command::Input(text)) => {
                        if let Some(query) = session.set_input(&text) {
                            debouncer.push(query);
                        }
                    }
                    Ok(Command::Genre(_)) if !session.view().genres_enabled => {
                        eprintln!("genres are locked until results for {:?} arrive", session.query());
                        continue;
                    }
                    Ok(Command::Genre(genre)) => session.select_genre(genre),
                    Ok(Command::Show(id)) => session.select_show(id),
                    Ok(Command::Clear) => session.clear_selection(),
                    Err(message) => {
                        eprintln!("{message}");
                        continue;
                    }
                }
                render(&session.view())?;
            }
            Some(query) = settled.recv() => {
                let api = api.clone();
                debug!(query, "fetching");
                // In-flight fetches are never cancelled; a superseded query still
                // fills the cache for prefix reuse.
                fetches.spawn(async move {
                    let result = api.search(&query).await;
                    (query, result)
                });
            }
            Some(joined) = fetches.join_next(), if !fetches.is_empty() => {
                if absorb(&mut session, joined) {
                    render(&session.view())?;
                }
            }
        }
    }

    Ok(())
}

/// Fold a finished fetch into the session. Returns whether anything changed.
fn absorb(session: &mut SearchSession, joined: Result<Fetched, JoinError>) -> bool {
    let (query, result) = match joined {
        Ok(fetched) => fetched,
        Err(e) => {
            error!(error = ?e, "search fetch task failed");
            return false;
        }
    };
    match result {
        Ok(matches) => {
            debug!(query, count = matches.len(), "results received");
            session.record_results(query, matches);
            true
        }
        // The query simply stays unresolved; typing again re-arms the fetch.
        Err(e) => {
            warn!(query, error = ?e, "search fetch failed");
            false
        }
    }
}

fn render(view: &SearchView) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    let status = if view.loading { " (loading)" } else { "" };
    writeln!(out, "search: {:?} [{:?}]{status}", view.query, view.resolution.kind())?;

    if !view.genres.is_empty() {
        let lock = if view.genres_enabled { "" } else { " (locked)" };
        writeln!(out, "  genres{lock}:")?;
        for (genre, shows) in view.genres.iter() {
            writeln!(out, "    {genre} ({})", shows.len())?;
        }
    }
    for m in &view.genre_shows {
        writeln!(out, "  - [{}] {}", m.id(), m.show.name)?;
    }

    match &view.displayed {
        Some(m) => {
            let premiered = m
                .show
                .premiered
                .map(|d| d.to_string())
                .unwrap_or_else(|| "unknown".to_owned());
            writeln!(out, "  > {} (premiered {premiered})", m.show.name)?;
            if let Some(poster) = m.show.poster() {
                writeln!(out, "    poster: {poster}")?;
            }
            if let Some(summary) = m.show.summary_text() {
                writeln!(out, "    {summary}")?;
            }
        }
        None => writeln!(out, "  > Select a genre and a show to see details.")?,
    }
    out.flush()?;
    Ok(())
}
