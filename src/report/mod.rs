//! JSON reports of a scoring run.
//!
//! A run writes one report per document (`<stem>.hiscore.json` next to the
//! document) and a batch summary (`<stem>.summary.hiscore.json`) next to the
//! query file. Keys are kebab-case.
//! Scores that cannot be normalized are written as `null`.

pub mod stats;

pub use stats::DescriptiveStats;

use crate::histogram::Histogram;
use crate::query::QuerySet;
use crate::runner::{BatchReport, ScoredDocument};
use crate::utils::app_data::ReportFlags;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Extension appended to the stem of a report's source file
pub const REPORT_EXTENSION: &str = "hiscore.json";

/// Extension of the batch summary, distinct from document reports
pub const SUMMARY_EXTENSION: &str = "summary.hiscore.json";

/// Where the report of `source` is written
pub fn report_path(source: &Path) -> PathBuf {
    source.with_extension(REPORT_EXTENSION)
}

/// Where the summary of a run over `query` is written
pub fn summary_path(query: &Path) -> PathBuf {
    query.with_extension(SUMMARY_EXTENSION)
}

/// Term with its occurrence count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

impl TermCount {
    fn sorted(mut counts: Vec<TermCount>) -> Vec<TermCount> {
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.term.cmp(&b.term)));
        counts
    }

    fn from_histogram(histogram: &Histogram, min_count: u64) -> Vec<TermCount> {
        histogram
            .sorted_by_count(min_count)
            .into_iter()
            .map(|(term, count)| TermCount {
                term: term.to_string(),
                count,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileInfo {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub last_modified: Option<DateTime<Local>>,
}

impl FileInfo {
    pub fn from_path(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).with_context(|| format!("Failed to stat {}", path.display()))?;
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        Ok(Self {
            name: crate::corpus::file_name(path),
            path: canonical.display().to_string(),
            size: metadata.len(),
            last_modified: metadata.modified().ok().map(DateTime::<Local>::from),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpressionScore {
    pub expression: String,
    pub weight: f64,
    pub score: f64,
}

/// Report of a single document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DocumentReport {
    pub query_date: DateTime<Local>,
    pub file_info: FileInfo,
    pub total_score: f64,
    pub total_score_normalized: Option<f64>,
    pub total_score_cut_normalized: Option<f64>,
    pub query_matches: Vec<TermCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_scores: Option<Vec<ExpressionScore>>,
    pub single_word_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub single_word_histogram: Option<Vec<TermCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compound_word_histogram: Option<Vec<TermCount>>,
}

impl DocumentReport {
    pub fn build(
        set: &QuerySet,
        doc: &ScoredDocument,
        flags: ReportFlags,
        min_count: u64,
        query_date: DateTime<Local>,
    ) -> Result<Self> {
        let record = &doc.record;
        let histograms = &doc.analysis.histograms;

        let query_matches = TermCount::sorted(
            set.term_counts(histograms.models())
                .into_iter()
                .map(|(term, count)| TermCount {
                    term: term.to_string(),
                    count,
                })
                .collect(),
        );

        let expression_scores = flags.explain.then(|| {
            set.queries()
                .iter()
                .zip(record.scores())
                .map(|(q, &score)| ExpressionScore {
                    expression: q.source.clone(),
                    weight: q.weight,
                    score,
                })
                .collect()
        });

        let (single_word_histogram, compound_word_histogram) = if flags.histograms {
            (
                Some(TermCount::from_histogram(&histograms.single, min_count)),
                Some(TermCount::from_histogram(&histograms.compound, min_count)),
            )
        } else {
            (None, None)
        };

        Ok(Self {
            query_date,
            file_info: FileInfo::from_path(&doc.analysis.path)?,
            total_score: record.total_score(),
            total_score_normalized: record.normalized().ok(),
            total_score_cut_normalized: record.cut_normalized().ok(),
            query_matches,
            expression_scores,
            single_word_count: doc.analysis.word_count,
            single_word_histogram,
            compound_word_histogram,
        })
    }
}

/// How often an expression held, or a term was present, across a batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Frequency {
    pub key: String,
    pub abs_frequency: u64,
    /// `None` for an empty batch
    pub rel_frequency: Option<f64>,
}

impl Frequency {
    fn new(key: &str, hits: u64, job_size: usize) -> Self {
        Self {
            key: key.to_string(),
            abs_frequency: hits,
            rel_frequency: (job_size > 0).then(|| hits as f64 / job_size as f64),
        }
    }
}

/// Total, normalized and cut-normalized score of one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct FileScores {
    pub file: String,
    pub score: f64,
    pub score_normalized: Option<f64>,
    pub score_cut_normalized: Option<f64>,
}

/// Summary of a whole batch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Summary {
    pub query_date: DateTime<Local>,
    pub query_job_size: usize,
    pub query_num_expressions: usize,
    pub query: Vec<Frequency>,
    pub query_matches: Vec<Frequency>,
    pub text_extraction_failures: Vec<String>,
    pub query_min_score: f64,
    pub query_max_score: f64,
    pub score: DescriptiveStats,
    pub score_normalized: DescriptiveStats,
    pub score_cut_normalized: DescriptiveStats,
    pub scores: Vec<FileScores>,
}

impl Summary {
    pub fn build(set: &QuerySet, batch: &BatchReport, query_date: DateTime<Local>) -> Self {
        let tally = &batch.tally;
        let job_size = tally.documents;

        let query = set
            .expressions()
            .zip(&tally.expression_hits)
            .map(|(expr, &hits)| Frequency::new(expr, hits, job_size))
            .collect();
        let query_matches = set
            .terms()
            .iter()
            .zip(&tally.term_hits)
            .map(|(term, &hits)| Frequency::new(term, hits, job_size))
            .collect();

        let scores: Vec<FileScores> = batch
            .scored()
            .map(|doc| FileScores {
                file: doc.analysis.name(),
                score: doc.record.total_score(),
                score_normalized: doc.record.normalized().ok(),
                score_cut_normalized: doc.record.cut_normalized().ok(),
            })
            .collect();

        let totals: Vec<f64> = scores.iter().map(|s| s.score).collect();
        let normalized: Vec<f64> = scores.iter().filter_map(|s| s.score_normalized).collect();
        let cut: Vec<f64> = scores.iter().filter_map(|s| s.score_cut_normalized).collect();

        Self {
            query_date,
            query_job_size: job_size,
            query_num_expressions: set.len(),
            query,
            query_matches,
            text_extraction_failures: tally
                .extraction_failures
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            query_min_score: set.min_score(),
            query_max_score: set.max_score(),
            score: DescriptiveStats::from_values(&totals),
            score_normalized: DescriptiveStats::from_values(&normalized),
            score_cut_normalized: DescriptiveStats::from_values(&cut),
            scores,
        }
    }
}

/// Serialize `value` as pretty JSON into `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the reports selected by `flags` and return the written paths.
///
/// A document report that cannot be written, or whose path is taken by the
/// summary, is logged and skipped; a failing summary is an error.
pub fn write_reports(
    set: &QuerySet,
    batch: &BatchReport,
    flags: ReportFlags,
    min_count: u64,
    query_path: &Path,
) -> Result<Vec<PathBuf>> {
    let query_date = Local::now();
    let summary_out = summary_path(query_path);
    let mut written = Vec::new();

    if flags.reports {
        for doc in batch.scored() {
            let out = report_path(&doc.analysis.path);
            if flags.summary && out == summary_out {
                tracing::warn!(
                    "skipping report {}: path is used by the summary of {}",
                    out.display(),
                    query_path.display()
                );
                continue;
            }
            let result = DocumentReport::build(set, doc, flags, min_count, query_date)
                .and_then(|report| write_json(&out, &report));
            match result {
                Ok(()) => {
                    tracing::info!("wrote report {}", out.display());
                    written.push(out);
                }
                Err(e) => tracing::warn!("failed to write report {}: {:#}", out.display(), e),
            }
        }
    }

    if flags.summary {
        write_json(&summary_out, &Summary::build(set, batch, query_date))?;
        tracing::info!("wrote summary {}", summary_out.display());
        written.push(summary_out);
    }

    Ok(written)
}
