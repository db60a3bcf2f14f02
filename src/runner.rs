//! Batch scoring of many documents against one query set.

use crate::corpus::DocumentAnalysis;
use crate::query::{QuerySet, ScoreRecord};
use crate::utils::app_data::AppConfig;
use crate::utils::progress::BatchProgress;
use crate::utils::tokenizer::Tokenizer;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Knobs of a batch run
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Worker threads, 0 for one per core
    pub threads: usize,
    pub tokenizer: Tokenizer,
    /// Hide the progress bar
    pub silent: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            threads: 0,
            tokenizer: Tokenizer::default(),
            silent: true,
        }
    }
}

impl RunOptions {
    pub fn from_config(config: &AppConfig, silent: bool) -> Self {
        Self {
            threads: config.effective_threads(),
            tokenizer: Tokenizer::new(config.word_split),
            silent,
        }
    }
}

/// A document that was read and evaluated
#[derive(Debug, Clone)]
pub struct ScoredDocument {
    pub analysis: DocumentAnalysis,
    pub record: ScoreRecord,
    /// Outcome of every expression, in query set order
    pub hits: Vec<bool>,
}

/// Result for one input of a batch
#[derive(Debug)]
pub struct DocumentOutcome {
    pub path: PathBuf,
    pub scored: Result<ScoredDocument>,
}

/// Aggregates over a whole batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchTally {
    /// Documents that satisfied each expression
    pub expression_hits: Vec<u64>,
    /// Documents containing each referenced term, aligned with `QuerySet::terms`
    pub term_hits: Vec<u64>,
    /// Documents that could not be read or yielded no words
    pub extraction_failures: Vec<PathBuf>,
    pub documents: usize,
}

impl BatchTally {
    fn new(set: &QuerySet) -> Self {
        Self {
            expression_hits: vec![0; set.len()],
            term_hits: vec![0; set.terms().len()],
            ..Self::default()
        }
    }

    fn record(&mut self, set: &QuerySet, outcome: &DocumentOutcome) {
        self.documents += 1;
        let doc = match &outcome.scored {
            Ok(doc) => doc,
            Err(_) => {
                self.extraction_failures.push(outcome.path.clone());
                return;
            }
        };

        if doc.analysis.is_extraction_failure() {
            self.extraction_failures.push(outcome.path.clone());
        }
        for (count, &hit) in self.expression_hits.iter_mut().zip(&doc.hits) {
            *count += u64::from(hit);
        }
        let models = doc.analysis.histograms.models();
        for (count, term) in self.term_hits.iter_mut().zip(set.terms()) {
            *count += u64::from(models.contains(term));
        }
    }
}

/// Outcomes in input order together with their aggregates
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub tally: BatchTally,
}

impl BatchReport {
    pub fn scored(&self) -> impl Iterator<Item = &ScoredDocument> {
        self.outcomes.iter().filter_map(|o| o.scored.as_ref().ok())
    }
}

/// Read, tokenize and evaluate one document
pub fn score_document(set: &QuerySet, path: &Path, tokenizer: Tokenizer) -> Result<ScoredDocument> {
    let analysis = DocumentAnalysis::from_path(path, tokenizer)?;
    let models = analysis.histograms.models();
    let hits: Vec<bool> = set.queries().iter().map(|q| q.matches(models)).collect();
    let record = ScoreRecord::from_outcomes(set, hits.iter().copied());
    Ok(ScoredDocument {
        analysis,
        record,
        hits,
    })
}

/// Score every input in parallel. Failing documents do not abort the batch.
pub fn score_documents(set: &QuerySet, inputs: &[PathBuf], options: RunOptions) -> Result<BatchReport> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.threads)
        .build()
        .context("Failed to build thread pool")?;

    let progress = BatchProgress::new(inputs.len() as u64, "Scoring documents...", options.silent);
    let failed = AtomicUsize::new(0);

    let outcomes: Vec<DocumentOutcome> = pool.install(|| {
        inputs
            .par_iter()
            .map(|path| {
                let scored = score_document(set, path, options.tokenizer);
                if let Err(e) = &scored {
                    failed.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
                progress.tick();
                DocumentOutcome {
                    path: path.clone(),
                    scored,
                }
            })
            .collect()
    });

    let failed = failed.into_inner();
    progress.finish(format!("Scored {} documents", inputs.len() - failed));

    let mut tally = BatchTally::new(set);
    for outcome in &outcomes {
        tally.record(set, outcome);
    }
    tracing::info!(
        "scored {} documents, {} extraction failures",
        tally.documents,
        tally.extraction_failures.len()
    );

    Ok(BatchReport { outcomes, tally })
}

/// A document whose total score is positive
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub path: PathBuf,
    pub name: String,
    /// Referenced terms present in the document with their counts
    pub matches: Vec<(String, u64)>,
}

/// Evaluate a single expression line against every input and keep the hits
pub fn search_documents(expression: &str, inputs: &[PathBuf], options: RunOptions) -> Result<Vec<SearchHit>> {
    let set = QuerySet::compile(std::iter::once(expression))?;
    if set.is_empty() {
        anyhow::bail!("Empty search expression");
    }

    let batch = score_documents(&set, inputs, options)?;
    let hits = batch
        .scored()
        .filter(|doc| doc.record.total_score() > 0.0)
        .map(|doc| SearchHit {
            path: doc.analysis.path.clone(),
            name: doc.analysis.name(),
            matches: set
                .term_counts(doc.analysis.histograms.models())
                .into_iter()
                .map(|(t, c)| (t.to_string(), c))
                .collect(),
        })
        .collect();
    Ok(hits)
}
