//! # hiscore - Histogram Query Language document scorer
//!
//! hiscore scores plain text documents against a file of weighted Histogram
//! Query Language (HQL) expressions. Every document is reduced to two word
//! histograms (single words and pairs of consecutive words); each expression
//! is a boolean predicate over those counts and contributes its weight when
//! it holds.
//!
//! ## Architecture
//!
//! - [`query`] - HQL lexer, parser, preprocessor, evaluator and scorer
//! - [`histogram`] - Word frequency models
//! - [`corpus`] - Document discovery and analysis
//! - [`runner`] - Parallel batch scoring and search
//! - [`report`] - JSON document reports and batch summaries
//! - [`output`] - Terminal output
//! - [`utils`] - Configuration, logging, progress and tokenization
//!
//! ## Quick Start
//!
//! ```
//! use hiscore::histogram::Histogram;
//! use hiscore::histogram::FrequencyModels;
//! use hiscore::query::QuerySet;
//!
//! let set: QuerySet = "[weight=2] && neural network\n[weight=-1] > spam 3".parse().unwrap();
//!
//! let single: Histogram = [("neural", 4), ("network", 1), ("spam", 2)].into_iter().collect();
//! let record = set.evaluate(FrequencyModels::single(&single));
//!
//! assert_eq!(record.total_score(), 2.0);
//! assert_eq!(record.cut_normalized().unwrap(), 1.0);
//! ```

pub mod corpus;
pub mod histogram;
pub mod output;
pub mod query;
pub mod report;
pub mod runner;
pub mod utils;
