//! Weighted aggregation of expression outcomes.
//!
//! Each expression contributes its weight when it holds for a document and
//! nothing otherwise. The total is compared against the bounds of the query
//! set:
//!
//! - `min_score`: sum of the negative weights (only penalties satisfied)
//! - `max_score`: sum of the positive weights (every reward satisfied)
//!
//! Both bounds assume the expressions are independent, so they may not be
//! reachable by any real document.

use crate::query::error::DegenerateScoreError;
use crate::query::set::QuerySet;

/// Per-document scoring outcome of a query set
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    scores: Vec<f64>,
    total_score: f64,
    min_score: f64,
    max_score: f64,
}

impl ScoreRecord {
    /// Build a record from one outcome per expression of `set`, in order
    pub fn from_outcomes(set: &QuerySet, outcomes: impl IntoIterator<Item = bool>) -> Self {
        let scores: Vec<f64> = set
            .weights()
            .zip(outcomes)
            .map(|(weight, hit)| if hit { weight } else { 0.0 })
            .collect();
        debug_assert_eq!(scores.len(), set.len());

        let total_score = scores.iter().sum();

        Self {
            scores,
            total_score,
            min_score: set.min_score(),
            max_score: set.max_score(),
        }
    }

    /// Realized score of every expression
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    pub fn total_score(&self) -> f64 {
        self.total_score
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_score(&self) -> f64 {
        self.max_score
    }

    /// `(min + total) / (max - min)`
    pub fn normalized(&self) -> Result<f64, DegenerateScoreError> {
        let range = self.max_score - self.min_score;
        if range == 0.0 {
            return Err(self.degenerate());
        }
        Ok((self.min_score + self.total_score) / range)
    }

    /// `total / max`, with negative totals cut to zero
    pub fn cut_normalized(&self) -> Result<f64, DegenerateScoreError> {
        if self.total_score < 0.0 {
            return Ok(0.0);
        }
        if self.max_score == 0.0 {
            return Err(self.degenerate());
        }
        Ok(self.total_score / self.max_score)
    }

    fn degenerate(&self) -> DegenerateScoreError {
        DegenerateScoreError {
            total: self.total_score,
            min: self.min_score,
            max: self.max_score,
        }
    }
}
