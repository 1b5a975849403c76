use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};
use serde::Serialize;

use crate::columns::{ASSISTS, GOALS, GOALS_PER_SHOT, SHOT_ACCURACY};
use crate::prepare::{PlayerRecord, PreparedDataset};
use crate::role::Role;
use crate::similarity::{Metric, SimilarPlayer};

pub const ROW_HEADERS: [&str; 8] = [
    "Player",
    "Squad",
    "Role",
    "Gls",
    "Ast",
    "G/Sh",
    "SoT%",
    "Similarity_Score",
];

/// Output row handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityRow {
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "Squad")]
    pub squad: String,
    #[serde(rename = "Role")]
    pub role: Role,
    #[serde(rename = "Gls")]
    pub goals: f64,
    #[serde(rename = "Ast")]
    pub assists: f64,
    #[serde(rename = "G/Sh")]
    pub goals_per_shot: f64,
    #[serde(rename = "SoT%")]
    pub shot_accuracy: f64,
    #[serde(rename = "Similarity_Score")]
    pub score: f64,
}

impl SimilarityRow {
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.player.clone(),
            self.squad.clone(),
            self.role.to_string(),
            format!("{:.0}", self.goals),
            format!("{:.0}", self.assists),
            format!("{:.2}", self.goals_per_shot),
            format!("{:.1}", self.shot_accuracy),
            format!("{:.1}%", self.score),
        ]
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarityReport {
    pub generated_at: String,
    pub target: PlayerRecord,
    pub metric: Metric,
    pub neighbors: usize,
    pub rows: Vec<SimilarityRow>,
}

pub fn similarity_rows(dataset: &PreparedDataset, hits: &[SimilarPlayer<'_>]) -> Vec<SimilarityRow> {
    hits.iter()
        .map(|hit| {
            let stat = |name| dataset.value(hit.row, name).unwrap_or(0.0);
            SimilarityRow {
                player: hit.player.name.clone(),
                squad: hit.player.squad.clone(),
                role: hit.player.role,
                goals: stat(GOALS),
                assists: stat(ASSISTS),
                goals_per_shot: stat(GOALS_PER_SHOT),
                shot_accuracy: stat(SHOT_ACCURACY),
                score: hit.score,
            }
        })
        .collect()
}

pub fn build_report(
    dataset: &PreparedDataset,
    target: &PlayerRecord,
    metric: Metric,
    hits: &[SimilarPlayer<'_>],
) -> SimilarityReport {
    SimilarityReport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        target: target.clone(),
        metric,
        neighbors: hits.len(),
        rows: similarity_rows(dataset, hits),
    }
}

/// Fixed-width text table for terminals.
pub fn render_table(rows: &[SimilarityRow]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(SimilarityRow::cells).collect();
    let mut widths: Vec<usize> = ROW_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (idx, cell) in row.iter().enumerate() {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = ROW_HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = String::new();
    out.push_str(&line(&header));
    out.push('\n');
    for row in &body {
        out.push_str(&line(row));
        out.push('\n');
    }
    out
}

pub fn report_json(report: &SimilarityReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("serialize similarity report")
}

/// Workbook with a summary sheet and the ranked neighbors.
pub fn write_xlsx(path: &Path, report: &SimilarityReport) -> Result<()> {
    let mut workbook = Workbook::new();

    let summary = vec![
        vec!["Target".to_string(), report.target.name.clone()],
        vec!["Squad".to_string(), report.target.squad.clone()],
        vec!["League".to_string(), report.target.league.clone()],
        vec!["Role".to_string(), report.target.role.to_string()],
        vec!["Metric".to_string(), report.metric.to_string()],
        vec!["Neighbors".to_string(), report.neighbors.to_string()],
        vec!["Generated".to_string(), report.generated_at.clone()],
    ];
    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary").context("name summary sheet")?;
    write_rows(sheet, &summary)?;

    let mut rows = vec![ROW_HEADERS.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    rows.extend(report.rows.iter().map(SimilarityRow::cells));
    let sheet = workbook.add_worksheet();
    sheet.set_name("Similar Players").context("name results sheet")?;
    write_rows(sheet, &rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    Ok(())
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
