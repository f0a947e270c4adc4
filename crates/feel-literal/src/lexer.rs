//! Literal classifier.
//!
//! Splits text into FEEL literal-level tokens and reports the kind of the
//! single token it contains. Anything that does not lex as exactly one token
//! is [`TokenKind::Ambiguous`].

use std::sync::OnceLock;

use regex::Regex;

/// Classification of a whole (trimmed) string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    /// A bare name; the decoder checks it against the boolean/null keywords.
    Name,
    /// A double-quoted string.
    String,
    DayTimeDuration,
    YearMonthDuration,
    Date,
    Time,
    DateTime,
    /// Zero tokens, more than one token, or a lone symbol.
    Ambiguous,
}

/// Lexical category of one token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lexeme {
    Number,
    Name,
    String,
    DayTimeDuration,
    YearMonthDuration,
    Date,
    Time,
    DateTime,
    /// Any other single non-whitespace character (`[`, `..`, `@`, `,`, …).
    Symbol,
}

impl Lexeme {
    fn token_kind(self) -> TokenKind {
        match self {
            Lexeme::Number => TokenKind::Number,
            Lexeme::Name => TokenKind::Name,
            Lexeme::String => TokenKind::String,
            Lexeme::DayTimeDuration => TokenKind::DayTimeDuration,
            Lexeme::YearMonthDuration => TokenKind::YearMonthDuration,
            Lexeme::Date => TokenKind::Date,
            Lexeme::Time => TokenKind::Time,
            Lexeme::DateTime => TokenKind::DateTime,
            Lexeme::Symbol => TokenKind::Ambiguous,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: Lexeme,
    pub text: &'a str,
}

// Duration component fields are lexed loosely (lowercase letters and dots
// allowed) so that a duration-shaped token with a bad field reaches the
// duration grammar and is rejected there instead of passing as a name. A
// field still needs a digit or an `x` placeholder, which keeps words such
// as `PaM` or `PeY` names.
const FIELD: &str = "[0-9a-z.]*[0-9x][0-9a-z.]*";
const ZONE: &str = r"(?:@[\p{L}_][\p{L}\p{N}_/+\-]*)";
const TIME: &str = r"[0-9]{2}:[0-9]{2}:[0-9]{2}(?:\.[0-9]+)?(?:Z|[+-][0-9]{2}:[0-9]{2})?";
const DATE: &str = r"[0-9]{4}-[0-9]{2}-[0-9]{2}";

/// Token rules in priority order; the longest match wins and ties go to the
/// earlier rule.
fn rules() -> &'static [(Lexeme, Regex)] {
    static RULES: OnceLock<Vec<(Lexeme, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        let time_components = format!(
            "(?:{FIELD}H(?:{FIELD}M)?(?:{FIELD}S)?|{FIELD}M(?:{FIELD}S)?|{FIELD}S)"
        );
        let patterns = [
            (Lexeme::DateTime, format!("{DATE}T{TIME}{ZONE}?")),
            (Lexeme::Date, format!("{DATE}{ZONE}?")),
            (Lexeme::Time, format!("{TIME}{ZONE}?")),
            (
                Lexeme::DayTimeDuration,
                format!(
                    "-?P(?:{FIELD}DT(?:{FIELD}H)?(?:{FIELD}M)?(?:{FIELD}S)?|[0-9]+D|T{time_components})"
                ),
            ),
            (
                Lexeme::YearMonthDuration,
                format!("-?P(?:{FIELD}Y(?:{FIELD}M)?|{FIELD}M)"),
            ),
            (Lexeme::Number, r"-?(?:[0-9]+(?:\.[0-9]+)?|\.[0-9]+)".to_owned()),
            (Lexeme::String, r#""(?:[^"\\]|\\.)*""#.to_owned()),
            (Lexeme::Name, r"[\p{L}_?][\p{L}\p{N}_?]*".to_owned()),
        ];
        patterns
            .into_iter()
            .map(|(lexeme, pattern)| {
                let regex = Regex::new(&format!("^(?:{pattern})")).expect("valid token pattern");
                (lexeme, regex)
            })
            .collect()
    })
}

/// Cursor over the input text.
#[derive(Debug, Clone)]
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn next_token(&mut self) -> Option<Token<'a>> {
        self.ws();
        if self.eof() {
            return None;
        }
        let rest = self.rest();
        let mut best: Option<(Lexeme, usize)> = None;
        for (lexeme, regex) in rules() {
            if let Some(found) = regex.find(rest) {
                let len = found.end();
                if len > 0 && best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((*lexeme, len));
                }
            }
        }
        let (kind, len) = best.unwrap_or_else(|| {
            let width = rest.chars().next().map_or(1, char::len_utf8);
            (Lexeme::Symbol, width)
        });
        let text = &rest[..len];
        self.pos += len;
        Some(Token { kind, text })
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

/// Split `text` into literal-level tokens, skipping whitespace.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    Scanner::new(text).collect()
}

/// Classify `text` by the single token it lexes to.
pub fn classify(text: &str) -> TokenKind {
    let mut tokens = Scanner::new(text);
    match (tokens.next(), tokens.next()) {
        (Some(token), None) => token.kind.token_kind(),
        _ => TokenKind::Ambiguous,
    }
}
