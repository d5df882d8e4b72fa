//! Character-level scanner for `{? ... ?}` tags.
//!
//! The lexer is an explicit state machine: [`LexState::step`] consumes one
//! character and returns the next state together with at most one emitted
//! [`Token`]. [`lex`] drives the machine over a whole template, collecting the
//! tokens of every tag that closes cleanly along with the tag's verbatim source
//! text.
//!
//! A character that has no transition from the current state abandons the tag
//! being scanned. Its tokens are dropped and the text is left as ordinary
//! content, so a malformed tag is never substituted.

use std::ops::Range;

/// Whether a tag names a parameter or calls a helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Parameter,
    Helper,
}

/// Lexical class of a call argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    StringLit,
    NumberLit,
    VarRef,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    OpenTag,
    ParamKey(KeyKind, String),
    DefaultValue(String),
    FilterKey(String),
    ArgValue(ArgKind, String),
    CloseTag,
}

/// One cleanly closed tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedTag {
    pub tokens: Vec<Token>,
    /// Exact source text of the tag, from `{?` through `?}`.
    pub code: String,
    /// Byte range of `code` within the scanned text.
    pub span: Range<usize>,
}

/// Body of a double-quoted literal.
///
/// A quote preceded by a backslash does not terminate the literal; `\"` is
/// unescaped to `"` when the literal is finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quoted {
    raw: String,
    after_backslash: bool,
}

impl Quoted {
    /// Feed one character. Returns the finished text on an unescaped quote.
    fn push(mut self, ch: char) -> Result<String, Self> {
        if ch == '"' && !self.after_backslash {
            return Ok(self.raw.replace("\\\"", "\""));
        }
        self.after_backslash = ch == '\\';
        self.raw.push(ch);
        Err(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexState {
    /// Ordinary text. `brace` is set when the previous character was `{`.
    Content { brace: bool },
    OpenTag,
    ParamKey(String),
    OpenDefaultValue,
    DefaultValue(Quoted),
    CloseDefaultValue,
    FilterKey(String),
    OpenFilterParams,
    ParamStr(Quoted),
    ParamNum(String),
    ParamVar(String),
    ClosingParam,
    CloseFilterParams,
    /// Waiting for `?}`. `question` is set when the previous character was `?`.
    ClosingTag { question: bool },
}

impl Default for LexState {
    fn default() -> Self {
        LexState::Content { brace: false }
    }
}

/// Outcome of feeding one character to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Move to the given state, optionally emitting a token.
    Next(LexState, Option<Token>),
    /// The character completed a `?}`.
    Close,
    /// The character is not valid here; the current tag is abandoned.
    Reset,
}

fn next(state: LexState) -> Step {
    Step::Next(state, None)
}

fn emit(state: LexState, token: Token) -> Step {
    Step::Next(state, Some(token))
}

fn closing(question: bool) -> LexState {
    LexState::ClosingTag { question }
}

/// Characters allowed after the first letter of a key, filter or variable.
fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || ch == '-'
}

impl LexState {
    /// Consume one character.
    pub fn step(self, ch: char) -> Step {
        use LexState::*;

        match self {
            Content { brace } => {
                if brace && ch == '?' {
                    emit(OpenTag, Token::OpenTag)
                } else {
                    next(Content { brace: ch == '{' })
                }
            }

            OpenTag => match ch {
                c if c.is_whitespace() => next(OpenTag),
                c if c.is_ascii_alphabetic() => next(ParamKey(c.to_string())),
                _ => Step::Reset,
            },

            ParamKey(mut name) => match ch {
                c if is_ident_continue(c) => {
                    name.push(c);
                    next(ParamKey(name))
                }
                '[' => emit(OpenDefaultValue, Token::ParamKey(KeyKind::Parameter, name)),
                '(' => emit(OpenFilterParams, Token::ParamKey(KeyKind::Helper, name)),
                '.' => emit(
                    FilterKey(String::new()),
                    Token::ParamKey(KeyKind::Parameter, name),
                ),
                '?' => emit(closing(true), Token::ParamKey(KeyKind::Parameter, name)),
                c if c.is_whitespace() => {
                    emit(closing(false), Token::ParamKey(KeyKind::Parameter, name))
                }
                _ => Step::Reset,
            },

            OpenDefaultValue => match ch {
                '"' => next(DefaultValue(Quoted::default())),
                _ => Step::Reset,
            },

            DefaultValue(quoted) => match quoted.push(ch) {
                Ok(text) => emit(CloseDefaultValue, Token::DefaultValue(text)),
                Err(quoted) => next(DefaultValue(quoted)),
            },

            CloseDefaultValue => match ch {
                ']' => next(CloseDefaultValue),
                '.' => next(FilterKey(String::new())),
                '?' => next(closing(true)),
                c if c.is_whitespace() => next(closing(false)),
                _ => Step::Reset,
            },

            FilterKey(mut name) => {
                let valid = if name.is_empty() {
                    ch.is_ascii_alphabetic()
                } else {
                    is_ident_continue(ch)
                };
                if valid {
                    name.push(ch);
                    return next(FilterKey(name));
                }
                if name.is_empty() {
                    return Step::Reset;
                }
                match ch {
                    '(' => emit(OpenFilterParams, Token::FilterKey(name)),
                    '.' => emit(FilterKey(String::new()), Token::FilterKey(name)),
                    '?' => emit(closing(true), Token::FilterKey(name)),
                    c if c.is_whitespace() => emit(closing(false), Token::FilterKey(name)),
                    _ => Step::Reset,
                }
            }

            OpenFilterParams => match ch {
                c if c.is_whitespace() => next(OpenFilterParams),
                '"' => next(ParamStr(Quoted::default())),
                c if c.is_ascii_digit() => next(ParamNum(c.to_string())),
                c if c.is_ascii_alphabetic() => next(ParamVar(c.to_string())),
                ')' => next(CloseFilterParams),
                _ => Step::Reset,
            },

            ParamStr(quoted) => match quoted.push(ch) {
                Ok(text) => emit(ClosingParam, Token::ArgValue(ArgKind::StringLit, text)),
                Err(quoted) => next(ParamStr(quoted)),
            },

            ParamNum(mut text) => {
                if ch.is_ascii_digit() || (ch == '.' && !text.contains('.')) {
                    text.push(ch);
                    return next(ParamNum(text));
                }
                end_argument(ArgKind::NumberLit, text, ch)
            }

            ParamVar(mut text) => {
                if is_ident_continue(ch) {
                    text.push(ch);
                    return next(ParamVar(text));
                }
                end_argument(ArgKind::VarRef, text, ch)
            }

            ClosingParam => match ch {
                c if c.is_whitespace() => next(ClosingParam),
                ',' => next(OpenFilterParams),
                ')' => next(CloseFilterParams),
                _ => Step::Reset,
            },

            CloseFilterParams => match ch {
                '.' => next(FilterKey(String::new())),
                '?' => next(closing(true)),
                c if c.is_whitespace() => next(closing(false)),
                _ => Step::Reset,
            },

            ClosingTag { question } => match ch {
                '}' if question => Step::Close,
                '?' => next(closing(true)),
                c if c.is_whitespace() => next(closing(false)),
                _ => Step::Reset,
            },
        }
    }
}

/// Finish an unquoted argument on the character that follows it.
fn end_argument(kind: ArgKind, text: String, ch: char) -> Step {
    let token = Token::ArgValue(kind, text);
    match ch {
        ')' => emit(LexState::CloseFilterParams, token),
        ',' => emit(LexState::OpenFilterParams, token),
        c if c.is_whitespace() => emit(LexState::ClosingParam, token),
        _ => Step::Reset,
    }
}

/// Scan `source` and return every well-formed tag in order of appearance.
pub fn lex(source: &str) -> Vec<LexedTag> {
    let mut tags = Vec::new();
    let mut tokens = Vec::new();
    let mut state = LexState::default();
    let mut start = 0;

    for (idx, ch) in source.char_indices() {
        state = match state.step(ch) {
            Step::Next(next, token) => {
                if let Some(token) = token {
                    if token == Token::OpenTag {
                        start = idx - '{'.len_utf8();
                        tokens.clear();
                    }
                    tokens.push(token);
                }
                next
            }
            Step::Close => {
                tokens.push(Token::CloseTag);
                let span = start..idx + ch.len_utf8();
                tags.push(LexedTag {
                    tokens: std::mem::take(&mut tokens),
                    code: source[span.clone()].to_string(),
                    span,
                });
                LexState::default()
            }
            Step::Reset => {
                tracing::trace!(offset = start, "discarding malformed tag");
                tokens.clear();
                // The offending character may itself start a new tag.
                LexState::Content { brace: ch == '{' }
            }
        };
    }

    tags
}
