use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    errors::{errors::ErrorImpl, reporter::ErrorReporter},
    MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Literal, Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    // Every pattern is anchored; the first one matching at the cursor wins,
    // so longer operators come before their prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]+)?").unwrap(), handler: number_handler },
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\"[^\"]*\"").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^\"[^\"]*").unwrap(), handler: unterminated_string_handler },
        RegexPattern { regex: Regex::new("^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    errors: Vec<(usize, ErrorImpl)>,
    source: String,
    pos: usize,
    pub line: usize,
}

impl Lexer {
    pub fn new(source: String) -> Lexer {
        Lexer {
            tokens: vec![],
            errors: vec![],
            source,
            pos: 0,
            line: 1,
        }
    }

    /// Moves the cursor `n` bytes forward, counting the newlines passed over.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        self.line += self.source[self.pos..end].matches('\n').count();
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn error(&mut self, line: usize, error: ErrorImpl) {
        self.errors.push((line, error));
    }

    pub fn at(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn matched(&self, regex: &Regex) -> Option<String> {
        regex.find(self.remainder()).map(|found| found.as_str().to_string())
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(matched) = lexer.matched(regex) else {
        return;
    };

    // The pattern only admits digits with an optional fraction, which always parses.
    let value = matched.parse::<f64>().unwrap_or_default();
    let line = lexer.line;
    lexer.push(MK_TOKEN!(TokenKind::Number, matched.clone(), Some(Literal::Number(value)), line));
    lexer.advance_n(matched.len());
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(matched) = lexer.matched(regex) {
        lexer.advance_n(matched.len());
    }
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(matched) = lexer.matched(regex) else {
        return;
    };

    lexer.advance_n(matched.len());

    let value = matched[1..matched.len() - 1].to_string();
    let line = lexer.line;
    lexer.push(MK_TOKEN!(TokenKind::String, matched, Some(Literal::String(value)), line));
}

fn unterminated_string_handler(lexer: &mut Lexer, regex: &Regex) {
    if let Some(matched) = lexer.matched(regex) {
        lexer.advance_n(matched.len());
        let line = lexer.line;
        lexer.error(line, ErrorImpl::UnterminatedString);
    }
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let Some(value) = lexer.matched(regex) else {
        return;
    };

    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);
    let line = lexer.line;

    lexer.advance_n(value.len());
    lexer.push(MK_TOKEN!(kind, value, None, line));
}

/// Converts source text into tokens terminated by an `EOF` token.
///
/// Unrecognised characters and unterminated strings are reported and skipped,
/// so every lexical error in the source surfaces in one pass.
#[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len()))]
pub fn tokenize(source: String, reporter: &mut dyn ErrorReporter) -> Vec<Token> {
    let mut lex = Lexer::new(source);

    while !lex.at_eof() {
        let pattern = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()));

        match pattern {
            Some(pattern) => (pattern.handler)(&mut lex, &pattern.regex),
            None => {
                let character = lex.at().unwrap_or('\0');
                let line = lex.line;
                lex.error(line, ErrorImpl::UnexpectedCharacter { character });
                lex.advance_n(character.len_utf8());
            }
        }
    }

    let line = lex.line;
    lex.push(MK_TOKEN!(TokenKind::EOF, String::new(), None, line));

    for (line, error) in lex.errors.drain(..) {
        reporter.lexical_error(line, error);
    }

    debug!(tokens = lex.tokens.len(), "tokenized");
    lex.tokens
}
