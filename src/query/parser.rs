use crate::query::error::{ParseError, SyntaxError};
use crate::query::lexer::{Token, TokenKind, tokenize};

/// Deepest nesting of `!` and parenthesized operators accepted in one expression
pub const MAX_DEPTH: usize = 256;

/// Compiled HQL expression tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// All children must hold
    And(Vec<QueryNode>),
    /// At least one child must hold
    Or(Vec<QueryNode>),
    /// Negation of exactly one child
    Not(Box<QueryNode>),
    /// Summed count of the terms must exceed the threshold
    GreaterThan { terms: Vec<String>, threshold: u64 },
    /// Term must be present
    Value(String),
}

impl QueryNode {
    /// Visit every term referenced by this tree, in source order
    pub fn for_each_term<'a>(&'a self, f: &mut impl FnMut(&'a str)) {
        match self {
            QueryNode::And(children) | QueryNode::Or(children) => {
                for child in children {
                    child.for_each_term(f);
                }
            }
            QueryNode::Not(child) => child.for_each_term(f),
            QueryNode::GreaterThan { terms, .. } => {
                for term in terms {
                    f(term);
                }
            }
            QueryNode::Value(term) => f(term),
        }
    }
}

/// Parse an already preprocessed expression into a tree
pub fn parse_expression(input: &str) -> Result<QueryNode, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = QueryParser::new(&tokens);
    Ok(parser.parse_prog()?)
}

/// Remove quote characters from a term
pub fn strip_quotes(term: &str) -> String {
    term.chars().filter(|&c| c != '"' && c != '\'').collect()
}

/// Recursive descent parser over a token slice
struct QueryParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl<'a> QueryParser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0, depth: 0 }
    }

    fn parse_prog(&mut self) -> Result<QueryNode, SyntaxError> {
        let Some(first) = self.peek() else {
            return Err(SyntaxError::Empty);
        };

        let root = match first.kind {
            TokenKind::And => {
                self.advance();
                QueryNode::And(self.parse_operands("&&")?)
            }
            TokenKind::Or => {
                self.advance();
                QueryNode::Or(self.parse_operands("||")?)
            }
            TokenKind::Gt => {
                self.advance();
                self.parse_greater_than()?
            }
            _ => {
                let mut nodes = self.parse_operands("expression")?;
                if nodes.len() == 1 {
                    nodes.pop().ok_or(SyntaxError::Empty)?
                } else {
                    QueryNode::And(nodes)
                }
            }
        };

        if let Some(token) = self.peek() {
            return Err(SyntaxError::TrailingInput {
                found: token.kind.text().to_string(),
                offset: token.offset,
            });
        }

        Ok(root)
    }

    /// `Expr+`: stops at the first token that cannot start an expression
    fn parse_operands(&mut self, operator: &'static str) -> Result<Vec<QueryNode>, SyntaxError> {
        let mut nodes = Vec::new();
        while self.peek().is_some_and(|t| starts_expr(&t.kind)) {
            nodes.push(self.parse_expr()?);
        }

        if nodes.is_empty() {
            return match self.peek() {
                Some(token) => Err(SyntaxError::UnexpectedToken {
                    expected: "an expression",
                    found: token.kind.text().to_string(),
                    offset: token.offset,
                }),
                None => Err(SyntaxError::MissingOperand { operator }),
            };
        }

        Ok(nodes)
    }

    fn parse_expr(&mut self) -> Result<QueryNode, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::TooDeep { limit: MAX_DEPTH });
        }
        let node = self.parse_nested();
        self.depth -= 1;
        node
    }

    /// One `Expr`; nested operands recurse through `parse_expr`
    fn parse_nested(&mut self) -> Result<QueryNode, SyntaxError> {
        let token = self.next("an expression")?;

        match &token.kind {
            TokenKind::LParen => {
                let op = self.next("an operator")?;
                let node = match op.kind {
                    TokenKind::And => QueryNode::And(self.parse_operands("&&")?),
                    TokenKind::Or => QueryNode::Or(self.parse_operands("||")?),
                    TokenKind::Gt => self.parse_greater_than()?,
                    _ => {
                        return Err(SyntaxError::UnexpectedToken {
                            expected: "'&&', '||' or '>' after '('",
                            found: op.kind.text().to_string(),
                            offset: op.offset,
                        });
                    }
                };
                self.expect_rparen()?;
                Ok(node)
            }
            TokenKind::Not => {
                if self.peek().is_none() {
                    return Err(SyntaxError::MissingOperand { operator: "!" });
                }
                Ok(QueryNode::Not(Box::new(self.parse_expr()?)))
            }
            kind if is_value(kind) => Ok(QueryNode::Value(strip_quotes(kind.text()))),
            kind => Err(SyntaxError::UnexpectedToken {
                expected: "an expression",
                found: kind.text().to_string(),
                offset: token.offset,
            }),
        }
    }

    /// `Value+ INT`, the `>` already consumed
    fn parse_greater_than(&mut self) -> Result<QueryNode, SyntaxError> {
        let mut terms = Vec::new();
        while let Some(token) = self.peek() {
            if !is_value(&token.kind) {
                break;
            }
            terms.push(strip_quotes(token.kind.text()));
            self.advance();
        }

        let Some(token) = self.peek() else {
            return Err(if terms.is_empty() {
                SyntaxError::MissingOperand { operator: ">" }
            } else {
                SyntaxError::MissingThreshold
            });
        };

        let TokenKind::Int(text) = &token.kind else {
            return Err(SyntaxError::UnexpectedToken {
                expected: "an integer threshold",
                found: token.kind.text().to_string(),
                offset: token.offset,
            });
        };

        if terms.is_empty() {
            return Err(SyntaxError::MissingOperand { operator: ">" });
        }

        let threshold = text
            .parse::<u64>()
            .map_err(|_| SyntaxError::ThresholdOverflow(text.clone()))?;
        self.advance();

        Ok(QueryNode::GreaterThan { terms, threshold })
    }

    fn expect_rparen(&mut self) -> Result<(), SyntaxError> {
        let token = self.next("')'")?;
        if token.kind == TokenKind::RParen {
            Ok(())
        } else {
            Err(SyntaxError::UnexpectedToken {
                expected: "')'",
                found: token.kind.text().to_string(),
                offset: token.offset,
            })
        }
    }

    fn next(&mut self, expected: &'static str) -> Result<&'a Token, SyntaxError> {
        let token = self
            .tokens
            .get(self.pos)
            .ok_or(SyntaxError::UnexpectedEnd { expected })?;
        self.pos += 1;
        Ok(token)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }
}

fn is_value(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Word(_) | TokenKind::SqPhrase(_) | TokenKind::DqPhrase(_)
    )
}

fn starts_expr(kind: &TokenKind) -> bool {
    is_value(kind) || matches!(kind, TokenKind::LParen | TokenKind::Not)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(term: &str) -> QueryNode {
        QueryNode::Value(term.to_string())
    }

    #[test]
    fn test_single_word() {
        assert_eq!(parse_expression("w1").unwrap(), value("w1"));
    }

    #[test]
    fn test_bare_sequence_is_and() {
        assert_eq!(
            parse_expression("w2 w3").unwrap(),
            QueryNode::And(vec![value("w2"), value("w3")])
        );
    }

    #[test]
    fn test_phrase_quotes_stripped() {
        assert_eq!(parse_expression("\"s1 s2\"").unwrap(), value("s1 s2"));
        assert_eq!(parse_expression("'s3 s4'").unwrap(), value("s3 s4"));
    }

    #[test]
    fn test_top_level_greater_than() {
        assert_eq!(
            parse_expression("> w29 w30 'a b' 30").unwrap(),
            QueryNode::GreaterThan {
                terms: vec!["w29".to_string(), "w30".to_string(), "a b".to_string()],
                threshold: 30
            }
        );
    }

    #[test]
    fn test_nested_operators() {
        let node = parse_expression("&& w26 (|| w27 (> w28 10))").unwrap();
        assert_eq!(
            node,
            QueryNode::And(vec![
                value("w26"),
                QueryNode::Or(vec![
                    value("w27"),
                    QueryNode::GreaterThan { terms: vec!["w28".to_string()], threshold: 10 }
                ])
            ])
        );
    }

    #[test]
    fn test_explicit_single_operand_and_is_kept() {
        assert_eq!(parse_expression("&& w1").unwrap(), QueryNode::And(vec![value("w1")]));
    }

    #[test]
    fn test_double_negation() {
        assert_eq!(
            parse_expression("!!w1").unwrap(),
            QueryNode::Not(Box::new(QueryNode::Not(Box::new(value("w1")))))
        );
    }

    #[test]
    fn test_not_binds_one_expression() {
        assert_eq!(
            parse_expression("!a b").unwrap(),
            QueryNode::And(vec![QueryNode::Not(Box::new(value("a"))), value("b")])
        );
    }

    #[test]
    fn test_empty_is_error() {
        assert_eq!(parse_expression(""), Err(ParseError::Syntax(SyntaxError::Empty)));
        assert_eq!(parse_expression("   "), Err(ParseError::Syntax(SyntaxError::Empty)));
    }

    #[test]
    fn test_missing_threshold() {
        assert_eq!(
            parse_expression("> w1 w2"),
            Err(ParseError::Syntax(SyntaxError::MissingThreshold))
        );
    }

    #[test]
    fn test_greater_than_without_terms() {
        assert_eq!(
            parse_expression("> 10"),
            Err(ParseError::Syntax(SyntaxError::MissingOperand { operator: ">" }))
        );
    }

    #[test]
    fn test_bare_operator_without_operands() {
        assert_eq!(
            parse_expression("&&"),
            Err(ParseError::Syntax(SyntaxError::MissingOperand { operator: "&&" }))
        );
    }

    #[test]
    fn test_unparenthesized_nested_operator() {
        assert!(matches!(
            parse_expression("|| w3 && w4"),
            Err(ParseError::Syntax(SyntaxError::TrailingInput { .. }))
        ));
        assert!(matches!(
            parse_expression("! || w1 w2"),
            Err(ParseError::Syntax(SyntaxError::UnexpectedToken { .. }))
        ));
    }

    #[test]
    fn test_unclosed_paren() {
        assert_eq!(
            parse_expression("(&& a b"),
            Err(ParseError::Syntax(SyntaxError::UnexpectedEnd { expected: "')'" }))
        );
    }

    #[test]
    fn test_paren_requires_operator() {
        assert!(parse_expression("(a b)").is_err());
        assert!(parse_expression("()").is_err());
    }

    #[test]
    fn test_trailing_tokens_after_threshold() {
        assert!(parse_expression("> w1 10 w2").is_err());
        assert!(parse_expression("w1 10").is_err());
    }

    #[test]
    fn test_threshold_overflow() {
        assert!(matches!(
            parse_expression("> w1 99999999999999999999999"),
            Err(ParseError::Syntax(SyntaxError::ThresholdOverflow(_)))
        ));
    }

    #[test]
    fn test_lex_error_propagates() {
        assert!(matches!(parse_expression("w1 & w2"), Err(ParseError::Lex(_))));
    }

    #[test]
    fn test_nesting_at_limit() {
        let input = format!("{}a", "!".repeat(MAX_DEPTH - 1));
        assert!(parse_expression(&input).is_ok());

        let input = format!("{}a", "!".repeat(MAX_DEPTH));
        assert_eq!(
            parse_expression(&input),
            Err(ParseError::Syntax(SyntaxError::TooDeep { limit: MAX_DEPTH }))
        );
    }

    #[test]
    fn test_deep_negation_chain_is_error() {
        let input = format!("{}a", "!".repeat(10_000));
        assert_eq!(
            parse_expression(&input),
            Err(ParseError::Syntax(SyntaxError::TooDeep { limit: MAX_DEPTH }))
        );
    }

    #[test]
    fn test_deep_parentheses_are_error() {
        let input = format!("{}a{}", "(&& ".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            parse_expression(&input),
            Err(ParseError::Syntax(SyntaxError::TooDeep { limit: MAX_DEPTH }))
        );
    }

    #[test]
    fn test_for_each_term() {
        let node = parse_expression("&& a (> b 'c d' 2) !e").unwrap();
        let mut terms = Vec::new();
        node.for_each_term(&mut |t| terms.push(t.to_string()));
        assert_eq!(terms, vec!["a", "b", "c d", "e"]);
    }
}
