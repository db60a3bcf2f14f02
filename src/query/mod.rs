pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod preprocess;
pub mod scorer;
pub mod set;

pub use error::{CompileError, DegenerateScoreError, LexError, ParseError, SyntaxError};
pub use eval::{Evaluator, matches};
pub use parser::{QueryNode, parse_expression};
pub use scorer::ScoreRecord;
pub use set::{CompiledQuery, QuerySet};

/// Compile one expression for ad hoc matching. No preprocessing is applied
/// beyond lowercasing and trimming.
pub fn compile_expression(text: &str) -> Result<QueryNode, ParseError> {
    parse_expression(text.to_lowercase().trim())
}
