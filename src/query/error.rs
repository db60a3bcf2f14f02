//! Error types for HQL compilation and scoring.

use thiserror::Error;

/// Input the lexer could not turn into a token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected character '{found}' at offset {offset}")]
    UnexpectedChar { found: char, offset: usize },
    #[error("unterminated phrase starting at offset {offset}")]
    UnterminatedPhrase { offset: usize },
}

/// Token sequence that violates the HQL grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty expression")]
    Empty,
    #[error("expected {expected} but found '{found}' at offset {offset}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        offset: usize,
    },
    #[error("expected {expected} but reached the end of the expression")]
    UnexpectedEnd { expected: &'static str },
    #[error("operator '{operator}' needs at least one operand")]
    MissingOperand { operator: &'static str },
    #[error("'>' needs a trailing integer threshold")]
    MissingThreshold,
    #[error("threshold '{0}' is out of range")]
    ThresholdOverflow(String),
    #[error("unexpected '{found}' after the end of the expression at offset {offset}")]
    TrailingInput { found: String, offset: usize },
    #[error("expression nests deeper than {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure to compile a single expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),
    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),
}

/// Failure to build a query set; identifies the offending source expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid syntax on line {line}: \"{expression}\"")]
pub struct CompileError {
    pub expression: String,
    /// 1-based line number of the last physical line of the expression.
    pub line: usize,
    #[source]
    pub source: ParseError,
}

/// Score normalization with a zero denominator.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("degenerate score normalization (total {total}, min {min}, max {max})")]
pub struct DegenerateScoreError {
    pub total: f64,
    pub min: f64,
    pub max: f64,
}
