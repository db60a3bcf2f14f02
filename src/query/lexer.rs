use crate::query::error::LexError;

/// Token kinds of the Histogram Query Language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `>`
    Gt,
    LParen,
    RParen,
    /// Unquoted word
    Word(String),
    /// Single-quoted phrase, quotes included
    SqPhrase(String),
    /// Double-quoted phrase, quotes included
    DqPhrase(String),
    /// Unsigned integer literal (kept as text, range checked by the parser)
    Int(String),
}

impl TokenKind {
    /// Source text of the token
    pub fn text(&self) -> &str {
        match self {
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            TokenKind::Gt => ">",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Word(s) | TokenKind::SqPhrase(s) | TokenKind::DqPhrase(s) | TokenKind::Int(s) => s,
        }
    }
}

/// A token with its byte offset in the expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub offset: usize,
}

/// Tokenize an expression. Returns the first lexical error, never a partial sequence.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();
            let Some(ch) = self.peek_char() else {
                break;
            };
            let offset = self.pos;

            let kind = match ch {
                '&' | '|' => self.lex_double(ch)?,
                '!' => self.single(TokenKind::Not),
                '>' => self.single(TokenKind::Gt),
                '(' => self.single(TokenKind::LParen),
                ')' => self.single(TokenKind::RParen),
                '\'' => TokenKind::SqPhrase(self.lex_phrase('\'')?),
                '"' => TokenKind::DqPhrase(self.lex_phrase('"')?),
                c if c.is_ascii_digit() => TokenKind::Int(self.lex_int()),
                c if is_word_start(c) => TokenKind::Word(self.lex_word()),
                found => return Err(LexError::UnexpectedChar { found, offset }),
            };

            tokens.push(Token { kind, offset });
        }

        Ok(tokens)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// `&&` and `||`; a lone `&` or `|` is not a token
    fn lex_double(&mut self, ch: char) -> Result<TokenKind, LexError> {
        let offset = self.pos;
        self.advance();
        if self.peek_char() != Some(ch) {
            return Err(LexError::UnexpectedChar { found: ch, offset });
        }
        self.advance();
        Ok(if ch == '&' { TokenKind::And } else { TokenKind::Or })
    }

    fn lex_phrase(&mut self, quote: char) -> Result<String, LexError> {
        let start = self.pos;
        self.advance();

        while let Some(ch) = self.peek_char() {
            self.advance();
            if ch == quote {
                return Ok(self.input[start..self.pos].to_string());
            }
        }

        Err(LexError::UnterminatedPhrase { offset: start })
    }

    fn lex_int(&mut self) -> String {
        let start = self.pos;
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    /// `[A-Za-z_-]+[A-Za-z0-9]*`
    fn lex_word(&mut self) -> String {
        let start = self.pos;
        while self.peek_char().is_some_and(is_word_start) {
            self.advance();
        }
        while self.peek_char().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }
        self.input[start..self.pos].to_string()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.pos += ch.len_utf8();
        }
    }
}

fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || ch == '-'
}
