//! Source-level conveniences of query files.
//!
//! Query files hold one expression per logical line:
//!
//! ```text
//! # comments start with '#'
//! [weight=2.5] && neural network
//! [weight=-1] || 'lorem ipsum' \
//!     dolor
//! ```
//!
//! A trailing `\` continues the expression on the next line. An optional
//! `[name=value, ...]` options block at the very start of a logical line
//! carries per-expression options.

use regex::Regex;
use std::sync::LazyLock;

pub const DEFAULT_WEIGHT: f64 = 1.0;
const COMMENT_CHAR: char = '#';
const CONTINUATION_CHAR: char = '\\';

/// `[options] expression`, options end at the first `]`
static OPTIONS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\[([^\]]*)\](.*)$").expect("valid options block regex"));

/// `name = value`; anything after a second `=` is dropped
static OPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*([^=]+?)\s*=\s*([^=]*?)\s*(?:=.*)?$").expect("valid option regex"));

/// Options understood in an options block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionName {
    Weight,
}

impl OptionName {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "weight" => Some(OptionName::Weight),
            _ => None,
        }
    }
}

/// Options of one expression
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpressionOptions {
    pub weight: f64,
}

impl Default for ExpressionOptions {
    fn default() -> Self {
        Self {
            weight: DEFAULT_WEIGHT,
        }
    }
}

impl ExpressionOptions {
    /// Apply one `name=value` pair. Unknown names and malformed values are ignored.
    fn apply(&mut self, name: &str, value: &str) {
        match OptionName::from_name(name) {
            Some(OptionName::Weight) => {
                if let Some(weight) = parse_weight(value) {
                    self.weight = weight;
                }
            }
            None => {}
        }
    }
}

fn parse_weight(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|w| w.is_finite())
}

/// A complete expression ready for the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub expression: String,
    pub options: ExpressionOptions,
    /// 1-based number of the physical line that completed this logical line
    pub line: usize,
}

/// Split an options block off a complete logical line
pub fn split_options(line: &str) -> (ExpressionOptions, &str) {
    let mut options = ExpressionOptions::default();

    let Some(caps) = OPTIONS_BLOCK.captures(line) else {
        return (options, line);
    };

    let block = caps.get(1).map_or("", |m| m.as_str());
    for opt in block.split(',') {
        if let Some(pair) = OPTION.captures(opt) {
            options.apply(&pair[1], &pair[2]);
        }
    }

    let expression = caps.get(2).map_or("", |m| m.as_str()).trim();
    (options, expression)
}

/// Turn raw source lines into logical lines
pub fn preprocess<I, S>(lines: I) -> Vec<LogicalLine>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut logical = Vec::new();
    let mut buffer: Option<String> = None;
    let mut last_line = 0;

    for (idx, raw) in lines.into_iter().enumerate() {
        let line = raw.as_ref().to_lowercase();
        let line = line.trim();
        last_line = idx + 1;

        if line.is_empty() || line.starts_with(COMMENT_CHAR) {
            continue;
        }

        if let Some(stripped) = line.strip_suffix(CONTINUATION_CHAR) {
            buffer.get_or_insert_with(String::new).push_str(stripped);
            continue;
        }

        let mut complete = buffer.take().unwrap_or_default();
        complete.push_str(line);
        logical.push(finish(&complete, last_line));
    }

    if let Some(rest) = buffer {
        tracing::warn!("dropping unterminated continuation at line {}: {:?}", last_line, rest);
    }

    logical
}

fn finish(line: &str, number: usize) -> LogicalLine {
    let (options, expression) = split_options(line);
    LogicalLine {
        expression: expression.to_string(),
        options,
        line: number,
    }
}
