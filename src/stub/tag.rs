//! Structured model of a lexed tag.

use std::collections::HashSet;

use super::lexer::{ArgKind, KeyKind, LexedTag, Token, lex};

/// A call argument as written in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    StringLit(String),
    /// Decimal text, converted to a number when resolved.
    NumberLit(String),
    /// Name of another parameter whose value is passed.
    VarRef(String),
}

impl Argument {
    fn from_token(kind: ArgKind, text: String) -> Self {
        match kind {
            ArgKind::StringLit => Argument::StringLit(text),
            ArgKind::NumberLit => Argument::NumberLit(text),
            ArgKind::VarRef => Argument::VarRef(text),
        }
    }

    pub fn var_ref(&self) -> Option<&str> {
        match self {
            Argument::VarRef(name) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<Argument>,
}

/// One parsed tag occurrence, or an implicit parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Parameter or helper name.
    pub key: String,
    pub kind: KeyKind,
    /// Declared default; empty when none was given.
    pub default: String,
    /// Direct call arguments of a helper.
    pub args: Vec<Argument>,
    pub filters: Vec<FilterCall>,
    /// Verbatim tag text used as the substitution anchor. Empty for synthetic
    /// placeholders.
    pub code: String,
    /// Set for keys that only appear as variable arguments of other tags.
    pub synthetic: bool,
}

impl Placeholder {
    /// Fold the tokens of one tag into a placeholder.
    pub fn from_tag(tag: &LexedTag) -> Self {
        let mut placeholder = Placeholder {
            key: String::new(),
            kind: KeyKind::Parameter,
            default: String::new(),
            args: Vec::new(),
            filters: Vec::new(),
            code: tag.code.clone(),
            synthetic: false,
        };

        for token in &tag.tokens {
            match token {
                Token::ParamKey(kind, name) if placeholder.key.is_empty() => {
                    placeholder.kind = *kind;
                    placeholder.key = name.clone();
                }
                Token::DefaultValue(text) => placeholder.default = text.clone(),
                Token::FilterKey(name) => placeholder.filters.push(FilterCall {
                    name: name.clone(),
                    args: Vec::new(),
                }),
                Token::ArgValue(kind, text) => {
                    let arg = Argument::from_token(*kind, text.clone());
                    match placeholder.filters.last_mut() {
                        Some(filter) => filter.args.push(arg),
                        None => placeholder.args.push(arg),
                    }
                }
                Token::OpenTag | Token::CloseTag | Token::ParamKey(..) => {}
            }
        }

        placeholder
    }

    /// An implicit parameter with no default, filters or source span.
    pub fn synthetic(key: impl Into<String>) -> Self {
        Placeholder {
            key: key.into(),
            kind: KeyKind::Parameter,
            default: String::new(),
            args: Vec::new(),
            filters: Vec::new(),
            code: String::new(),
            synthetic: true,
        }
    }

    pub fn is_helper(&self) -> bool {
        self.kind == KeyKind::Helper
    }

    /// Names referenced as variable arguments, in order of appearance.
    pub fn var_refs(&self) -> impl Iterator<Item = &str> {
        self.args
            .iter()
            .chain(self.filters.iter().flat_map(|f| f.args.iter()))
            .filter_map(Argument::var_ref)
    }
}

/// Parse every tag of a template, then append a synthetic placeholder for each
/// variable argument that is not declared as a parameter anywhere.
pub fn parse_placeholders(source: &str) -> Vec<Placeholder> {
    let mut placeholders: Vec<Placeholder> = lex(source)
        .iter()
        .map(Placeholder::from_tag)
        .collect();

    let mut known: HashSet<&str> = placeholders
        .iter()
        .filter(|p| !p.is_helper())
        .map(|p| p.key.as_str())
        .collect();

    let mut synthetic = Vec::new();
    for placeholder in &placeholders {
        for name in placeholder.var_refs() {
            if known.insert(name) {
                synthetic.push(Placeholder::synthetic(name));
            }
        }
    }

    placeholders.extend(synthetic);
    placeholders
}
