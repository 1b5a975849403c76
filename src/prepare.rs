use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::columns::{
    ADJ_ASSISTS, ADJ_GOALS, ADJ_GOALS_ASSISTS, ADJ_NON_PENALTY_GOALS, AGE, ASSISTS,
    ASSISTS_PER_90, COMP, GOALS, GOALS_PER_SHOT, LEAGUE_FACTOR, MINUTES, NON_PENALTY_GOALS,
    NUMERIC, PENALTY_GOALS, PLAYER, POS, REQUIRED_NUMERIC, REQUIRED_TEXT, SHOT_ACCURACY,
    SHOTS_PER_90, SQUAD, TEAM_GOAL_SHARE,
};
use crate::error::LoadError;
use crate::league;
use crate::raw_table::{RawTable, load_raw_table};
use crate::role::{self, Role, StatLine};

/// Players at or below this many minutes never reach the searchable population.
pub const MIN_MINUTES: f64 = 450.0;

/// Midfielders below this shot volume are treated as non-attacking and dropped.
pub const MIN_MIDFIELD_SHOTS_PER_90: f64 = 1.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub name: String,
    pub squad: String,
    pub age: String,
    pub position: String,
    pub competition: String,
    pub league: String,
    pub minutes: f64,
    pub league_factor: f64,
    pub role: Role,
}

/// Read-only result of [`prepare`]: player identities plus named numeric columns,
/// each exactly one value per player.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedDataset {
    players: Vec<PlayerRecord>,
    columns: BTreeMap<String, Vec<f64>>,
}

impl PreparedDataset {
    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    pub fn player(&self, row: usize) -> Option<&PlayerRecord> {
        self.players.get(row)
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn value(&self, row: usize, name: &str) -> Option<f64> {
        self.columns.get(name).and_then(|col| col.get(row)).copied()
    }

    /// Row whose name and squad both match exactly.
    pub fn find_exact(&self, name: &str, squad: &str) -> Option<usize> {
        let (name, squad) = (name.trim(), squad.trim());
        self.players
            .iter()
            .position(|p| p.name == name && p.squad == squad)
    }

    /// First row with this exact name.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.players.iter().position(|p| p.name == name)
    }

    /// Rows whose name contains `query`, ignoring case. Exact matches come first.
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<(bool, usize)> = self
            .players
            .iter()
            .enumerate()
            .filter_map(|(idx, p)| {
                let name = p.name.to_lowercase();
                name.contains(&needle).then_some((name != needle, idx))
            })
            .collect();
        hits.sort();
        hits.into_iter().map(|(_, idx)| idx).collect()
    }

    pub fn role_counts(&self) -> BTreeMap<Role, usize> {
        let mut counts = BTreeMap::new();
        for p in &self.players {
            *counts.entry(p.role).or_insert(0) += 1;
        }
        counts
    }
}

/// Load a dataset file and run it through [`prepare`].
pub fn load_dataset(path: &Path) -> Result<PreparedDataset, LoadError> {
    let raw = load_raw_table(path)?;
    let dataset = prepare(&raw)?;
    info!(
        path = %path.display(),
        players = dataset.len(),
        "dataset ready"
    );
    Ok(dataset)
}

#[derive(Debug, Clone)]
struct Identity {
    name: String,
    squad: String,
    age: String,
    position: String,
    competition: String,
    league: String,
}

/// Column-oriented working copy used while filters and derivations run.
#[derive(Debug, Default)]
struct Frame {
    ids: Vec<Identity>,
    cols: BTreeMap<String, Vec<f64>>,
}

impl Frame {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn get(&self, name: &str, row: usize) -> f64 {
        self.cols
            .get(name)
            .and_then(|c| c.get(row))
            .copied()
            .unwrap_or(0.0)
    }

    fn has(&self, name: &str) -> bool {
        self.cols.contains_key(name)
    }

    fn derive(&mut self, name: &str, f: impl Fn(&Frame, usize) -> f64) {
        let frame: &Frame = self;
        let values: Vec<f64> = (0..frame.len()).map(|row| f(frame, row)).collect();
        self.cols.insert(name.to_string(), values);
    }

    fn retain(&mut self, keep: &[bool]) {
        retain_mask(&mut self.ids, keep);
        for col in self.cols.values_mut() {
            retain_mask(col, keep);
        }
    }

    fn stat_line(&self, row: usize) -> StatLine {
        StatLine {
            position: self.ids[row].position.clone(),
            shots_per_90: self.get(SHOTS_PER_90, row),
            goals_per_shot: self.get(GOALS_PER_SHOT, row),
            shot_accuracy: self.get(SHOT_ACCURACY, row),
            assists_per_90: self.get(ASSISTS_PER_90, row),
            goals: self.get(GOALS, row),
        }
    }
}

/// Turn raw season rows into the searchable population.
///
/// Steps run in a fixed order and never revisit earlier rows: position filter,
/// numeric coercion, assists per 90, low-output midfielder exclusion, team goal
/// share, league factor, league-adjusted stats, role classification and finally
/// the minutes gate.
pub fn prepare(raw: &RawTable) -> Result<PreparedDataset, LoadError> {
    for name in REQUIRED_TEXT.iter().chain(REQUIRED_NUMERIC.iter()) {
        if !raw.has_column(name) {
            return Err(LoadError::MissingColumn((*name).to_string()));
        }
    }

    let (mut frame, source_rows) = position_filter(raw);
    debug!(rows_in = raw.len(), rows_out = frame.len(), "position filter");

    coerce_numeric(raw, &source_rows, &mut frame);

    frame.derive(ASSISTS_PER_90, |f, row| {
        per_90(f.get(ASSISTS, row), f.get(MINUTES, row))
    });

    let keep: Vec<bool> = frame
        .ids
        .iter()
        .enumerate()
        .map(|(row, id)| {
            role::is_forward(&id.position)
                || (role::is_midfielder(&id.position)
                    && frame.get(SHOTS_PER_90, row) >= MIN_MIDFIELD_SHOTS_PER_90)
        })
        .collect();
    let before = frame.len();
    frame.retain(&keep);
    debug!(rows_in = before, rows_out = frame.len(), "low-output midfielders excluded");

    add_team_goal_share(&mut frame);
    add_league_factor(&mut frame);
    add_adjusted_stats(&mut frame);

    let mut roles: Vec<Role> = (0..frame.len())
        .into_par_iter()
        .map(|row| role::classify(&frame.stat_line(row)))
        .collect();

    let keep: Vec<bool> = (0..frame.len())
        .map(|row| frame.get(MINUTES, row) > MIN_MINUTES)
        .collect();
    let before = frame.len();
    retain_mask(&mut roles, &keep);
    frame.retain(&keep);
    debug!(rows_in = before, rows_out = frame.len(), "minutes gate");

    let players = frame
        .ids
        .iter()
        .zip(roles)
        .enumerate()
        .map(|(row, (id, role))| PlayerRecord {
            name: id.name.clone(),
            squad: id.squad.clone(),
            age: id.age.clone(),
            position: id.position.clone(),
            competition: id.competition.clone(),
            league: id.league.clone(),
            minutes: frame.get(MINUTES, row),
            league_factor: frame.get(LEAGUE_FACTOR, row),
            role,
        })
        .collect::<Vec<_>>();

    debug_assert!(frame.cols.values().all(|c| c.len() == players.len()));
    Ok(PreparedDataset {
        players,
        columns: frame.cols,
    })
}

/// Keeps forward/midfielder rows; also returns the raw row each survivor came from.
fn position_filter(raw: &RawTable) -> (Frame, Vec<usize>) {
    let col = |name: &str| raw.column_index(name);
    let (player, squad, pos, comp, age) = (col(PLAYER), col(SQUAD), col(POS), col(COMP), col(AGE));
    let text = |row: usize, idx: Option<usize>| {
        idx.map(|c| raw.cell(row, c).trim().to_string())
            .unwrap_or_default()
    };

    let mut ids = Vec::new();
    let mut source_rows = Vec::new();
    for row in 0..raw.len() {
        let position = text(row, pos);
        if !role::is_forward(&position) && !role::is_midfielder(&position) {
            continue;
        }
        ids.push(Identity {
            name: text(row, player),
            squad: text(row, squad),
            age: text(row, age),
            position,
            competition: text(row, comp),
            league: String::new(),
        });
        source_rows.push(row);
    }

    let frame = Frame {
        ids,
        cols: BTreeMap::new(),
    };
    (frame, source_rows)
}

fn coerce_numeric(raw: &RawTable, source_rows: &[usize], frame: &mut Frame) {
    for name in NUMERIC {
        let Some(col) = raw.column_index(name) else {
            debug!(column = name, "optional column absent");
            continue;
        };
        let values = source_rows
            .iter()
            .map(|&row| parse_number(raw.cell(row, col)).unwrap_or(0.0))
            .collect();
        frame.cols.insert(name.to_string(), values);
    }
}

fn retain_mask<T>(values: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter();
    values.retain(|_| flags.next().copied().unwrap_or(false));
}

fn per_90(count: f64, minutes: f64) -> f64 {
    if minutes > 0.0 {
        count / minutes * 90.0
    } else {
        0.0
    }
}

fn add_team_goal_share(frame: &mut Frame) {
    let mut team_goals: HashMap<String, f64> = HashMap::new();
    for (row, id) in frame.ids.iter().enumerate() {
        *team_goals.entry(id.squad.clone()).or_insert(0.0) += frame.get(GOALS, row);
    }
    frame.derive(TEAM_GOAL_SHARE, |f, row| {
        let total = team_goals.get(&f.ids[row].squad).copied().unwrap_or(0.0);
        if total > 0.0 {
            f.get(GOALS, row) / total
        } else {
            0.0
        }
    });
}

fn add_league_factor(frame: &mut Frame) {
    let mut unknown = BTreeSet::new();
    for id in &mut frame.ids {
        id.league = league::clean_league_name(&id.competition).to_string();
        if !league::is_known_league(&id.league) {
            unknown.insert(id.league.clone());
        }
    }
    if !unknown.is_empty() {
        debug!(leagues = ?unknown, "unrecognised leagues use the default factor");
    }
    frame.derive(LEAGUE_FACTOR, |f, row| league::league_factor(&f.ids[row].league));
}

fn add_adjusted_stats(frame: &mut Frame) {
    frame.derive(ADJ_GOALS, |f, row| {
        f.get(GOALS, row) * f.get(LEAGUE_FACTOR, row)
    });
    frame.derive(ADJ_ASSISTS, |f, row| {
        f.get(ASSISTS, row) * f.get(LEAGUE_FACTOR, row)
    });
    frame.derive(ADJ_GOALS_ASSISTS, |f, row| {
        (f.get(GOALS, row) + f.get(ASSISTS, row)) * f.get(LEAGUE_FACTOR, row)
    });

    if frame.has(NON_PENALTY_GOALS) {
        frame.derive(ADJ_NON_PENALTY_GOALS, |f, row| {
            f.get(NON_PENALTY_GOALS, row) * f.get(LEAGUE_FACTOR, row)
        });
    } else if frame.has(PENALTY_GOALS) {
        frame.derive(ADJ_NON_PENALTY_GOALS, |f, row| {
            (f.get(GOALS, row) - f.get(PENALTY_GOALS, row)) * f.get(LEAGUE_FACTOR, row)
        });
    }
}

/// Numeric cell parse. Accepts surrounding whitespace, one trailing `%` and
/// thousands separators; anything else must already be a valid float.
pub fn parse_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let s = s.strip_suffix('%').unwrap_or(s).trim_end();
    if s.is_empty() {
        return None;
    }
    s.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}
