use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use trident::PreparedDataset;
use trident::config::Config;
use trident::export::{render_table, similarity_rows};
use trident::logging;
use trident::shared::DatasetHandle;
use trident::similarity::{Metric, TargetRef, find_similar};

const MAX_LISTED_MATCHES: usize = 15;

struct App {
    dataset: Arc<PreparedDataset>,
    metric: Metric,
    neighbors: usize,
}

impl App {
    /// One prompt round. `Ok(false)` means quit.
    fn step(&mut self, input: &mut impl BufRead, out: &mut impl Write) -> Result<bool> {
        let Some(query) = prompt(input, out, "\nPlayer name (q to quit): ")? else {
            return Ok(false);
        };
        if query.eq_ignore_ascii_case("q") {
            return Ok(false);
        }
        if query.is_empty() {
            return Ok(true);
        }

        let Some(row) = self.pick_player(input, out, &query)? else {
            return Ok(true);
        };
        let Some(player) = self.dataset.player(row) else {
            return Ok(true);
        };
        writeln!(
            out,
            "{} ({}, {}) - {} {}",
            player.name,
            player.squad,
            player.league,
            player.role.icon(),
            player.role
        )?;

        let metric = match prompt(input, out, &format!("Metric [cosine/euclidean] ({}): ", self.metric))? {
            Some(raw) if !raw.is_empty() => match raw.parse::<Metric>() {
                Ok(m) => m,
                Err(err) => {
                    writeln!(out, "[WARN] {err}, using {}", self.metric)?;
                    self.metric
                }
            },
            _ => self.metric,
        };
        let neighbors = match prompt(input, out, &format!("How many players ({}): ", self.neighbors))? {
            Some(raw) if !raw.is_empty() => raw.parse::<usize>().unwrap_or(self.neighbors).max(1),
            _ => self.neighbors,
        };
        self.metric = metric;
        self.neighbors = neighbors;

        match find_similar(&self.dataset, &TargetRef::of(player), metric, neighbors) {
            Ok(hits) => {
                let rows = similarity_rows(&self.dataset, &hits);
                writeln!(out)?;
                write!(out, "{}", render_table(&rows))?;
            }
            Err(err) => writeln!(out, "[WARN] {err}")?,
        }
        Ok(true)
    }

    fn pick_player(
        &self,
        input: &mut impl BufRead,
        out: &mut impl Write,
        query: &str,
    ) -> Result<Option<usize>> {
        let hits = self.dataset.search(query);
        match hits.as_slice() {
            [] => {
                writeln!(out, "[INFO] No player matches \"{query}\"")?;
                Ok(None)
            }
            [only] => Ok(Some(*only)),
            many => {
                for (idx, row) in many.iter().take(MAX_LISTED_MATCHES).enumerate() {
                    if let Some(p) = self.dataset.player(*row) {
                        writeln!(out, "  {:>2}. {} ({}) - {}", idx + 1, p.name, p.squad, p.role)?;
                    }
                }
                if many.len() > MAX_LISTED_MATCHES {
                    writeln!(out, "  ... {} more, refine the name", many.len() - MAX_LISTED_MATCHES)?;
                }
                let Some(choice) = prompt(input, out, "Pick a number: ")? else {
                    return Ok(None);
                };
                let picked = choice
                    .parse::<usize>()
                    .ok()
                    .filter(|n| (1..=many.len().min(MAX_LISTED_MATCHES)).contains(n))
                    .map(|n| many[n - 1]);
                if picked.is_none() {
                    writeln!(out, "[INFO] Invalid choice")?;
                }
                Ok(picked)
            }
        }
    }
}

/// Print `text`, read one trimmed line. `None` on end of input.
fn prompt(input: &mut impl BufRead, out: &mut impl Write, text: &str) -> Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn main() -> Result<()> {
    let config = Config::load();
    logging::init(&config.log_level)?;

    let handle = DatasetHandle::new(config.dataset.clone());
    let dataset = handle
        .get()
        .with_context(|| format!("load dataset {}", handle.path().display()))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Data ready: {} players", dataset.len())?;
    for (role, count) in dataset.role_counts() {
        writeln!(out, "  {} {:<26} {count}", role.icon(), role.label())?;
    }

    let mut app = App {
        dataset,
        metric: config.metric,
        neighbors: config.neighbors,
    };
    let stdin = io::stdin();
    let mut input = stdin.lock();
    while app.step(&mut input, &mut out)? {}
    Ok(())
}
