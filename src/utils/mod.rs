//! Utility functions and data structures.
//!
//! ## Modules
//!
//! - [`app_data`] - Application configuration and report flags
//! - [`logging`] - `tracing` subscriber setup
//! - [`progress`] - Progress bars (no-op without the `progress` feature)
//! - [`tokenizer`] - Word and compound word extraction
//!
//! ## Key Functions
//!
//! ```no_run
//! use hiscore::utils::Tokenizer;
//!
//! let text = Tokenizer::default().tokenize("Neural networks learn. Neural networks scale.");
//! assert_eq!(text.histograms.single.count("neural"), 2);
//! assert_eq!(text.histograms.compound.count("neural networks"), 2);
//! ```

pub mod app_data;
pub mod logging;
pub mod progress;
pub mod tokenizer;

pub use app_data::*;
pub use tokenizer::*;
