use crate::histogram::FrequencyModels;
use crate::query::error::CompileError;
use crate::query::eval::Evaluator;
use crate::query::parser::{QueryNode, parse_expression};
use crate::query::preprocess::preprocess;
use crate::query::scorer::ScoreRecord;
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

/// One compiled expression with its weight
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub expression: QueryNode,
    pub weight: f64,
    pub source: String,
}

impl CompiledQuery {
    pub fn matches(&self, models: FrequencyModels<'_>) -> bool {
        Evaluator::new(models).eval(&self.expression)
    }
}

/// An ordered, frozen collection of weighted HQL expressions
#[derive(Debug, Clone, Default)]
pub struct QuerySet {
    queries: Vec<CompiledQuery>,
    terms: Vec<String>,
    min_score: f64,
    max_score: f64,
}

impl QuerySet {
    /// Compile a batch of query source lines. Fails on the first invalid
    /// expression; nothing of the batch is kept in that case.
    pub fn compile<I, S>(lines: I) -> std::result::Result<Self, CompileError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut queries = Vec::new();

        for logical in preprocess(lines) {
            let expression = parse_expression(&logical.expression).map_err(|source| CompileError {
                expression: logical.expression.clone(),
                line: logical.line,
                source,
            })?;

            tracing::debug!(
                line = logical.line,
                weight = logical.options.weight,
                expression = %logical.expression,
                "compiled expression"
            );

            queries.push(CompiledQuery {
                expression,
                weight: logical.options.weight,
                source: logical.expression,
            });
        }

        Ok(Self::from_queries(queries))
    }

    /// Read and compile a query file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read query file {}", path.display()))?;
        let set = Self::compile(content.lines())
            .with_context(|| format!("Invalid histogram query in {}", path.display()))?;
        Ok(set)
    }

    fn from_queries(queries: Vec<CompiledQuery>) -> Self {
        let terms = {
            let mut seen = HashSet::new();
            let mut terms = Vec::new();
            for query in &queries {
                query.expression.for_each_term(&mut |term| {
                    if seen.insert(term) {
                        terms.push(term.to_string());
                    }
                });
            }
            terms
        };

        let min_score = queries.iter().map(|q| q.weight).filter(|&w| w < 0.0).sum();
        let max_score = queries.iter().map(|q| q.weight).filter(|&w| w > 0.0).sum();

        Self {
            queries,
            terms,
            min_score,
            max_score,
        }
    }

    pub fn queries(&self) -> &[CompiledQuery] {
        &self.queries
    }

    /// Normalized source text of every expression
    pub fn expressions(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.source.as_str())
    }

    pub fn weights(&self) -> impl Iterator<Item = f64> + '_ {
        self.queries.iter().map(|q| q.weight)
    }

    /// Every distinct term referenced by any expression, in first-seen order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Sum of all negative weights
    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    /// Sum of all positive weights
    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Evaluate every expression against one document
    pub fn evaluate(&self, models: FrequencyModels<'_>) -> ScoreRecord {
        let evaluator = Evaluator::new(models);
        ScoreRecord::from_outcomes(self, self.queries.iter().map(|q| evaluator.eval(&q.expression)))
    }

    /// Referenced terms present in the document, with their counts
    pub fn term_counts<'s>(&'s self, models: FrequencyModels<'_>) -> Vec<(&'s str, u64)> {
        self.terms
            .iter()
            .filter_map(|t| {
                let count = models.count(t);
                (count > 0).then_some((t.as_str(), count))
            })
            .collect()
    }
}

impl FromStr for QuerySet {
    type Err = CompileError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::compile(s.lines())
    }
}
