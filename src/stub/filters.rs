//! Built-in string filters.
//!
//! Case operations are ASCII-only. `words` is the canonical splitter the other
//! case styles build on: `PostCategory` becomes `post category`.

use std::sync::Arc;

use super::error::StubError;
use super::inflector::{EnglishInflector, register_inflector};
use super::registry::{Registry, Value};

/// Register the default filter catalog.
pub(crate) fn register_defaults(registry: &mut Registry) {
    registry.filter("lower", |value, _| Ok(value.to_ascii_lowercase()));
    registry.filter("upper", |value, _| Ok(value.to_ascii_uppercase()));
    registry.filter("ucfirst", |value, _| Ok(ucfirst(value)));
    registry.filter("ucwords", |value, _| Ok(ucwords(value)));
    registry.filter("words", |value, _| Ok(words(value)));
    registry.filter("kebab", |value, _| Ok(kebab(value)));
    registry.filter("snake", |value, _| Ok(snake(value)));
    registry.filter("studly", |value, _| Ok(studly(value)));
    registry.filter("pascal", |value, _| Ok(studly(value)));
    registry.filter("camel", |value, _| Ok(camel(value)));
    registry.filter("title", |value, _| Ok(title(value)));
    registry.filter("replace", replace);
    register_inflector(registry, Arc::new(EnglishInflector));
}

pub fn ucfirst(s: &str) -> String {
    let mut out = s.to_string();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    out
}

pub fn lcfirst(s: &str) -> String {
    let mut out = s.to_string();
    if let Some(first) = out.get_mut(0..1) {
        first.make_ascii_lowercase();
    }
    out
}

/// Uppercase the first character of every whitespace-separated word.
pub fn ucwords(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if at_word_start {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = matches!(ch, ' ' | '\t' | '\r' | '\n' | '\x0B' | '\x0C');
    }
    out
}

/// Split into lowercase space-separated words.
///
/// An all-lowercase input is returned unchanged. Otherwise word starts are
/// capitalized, whitespace is removed, a space is inserted before every
/// uppercase letter after the first character and the result is lowercased.
pub fn words(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_lowercase()) {
        return s.to_string();
    }

    let compact: String = ucwords(s).chars().filter(|c| !c.is_whitespace()).collect();
    let mut out = String::with_capacity(compact.len() + 8);
    for (i, ch) in compact.chars().enumerate() {
        if i > 0 && ch.is_ascii_uppercase() {
            out.push(' ');
        }
        out.push(ch);
    }
    out.to_ascii_lowercase()
}

pub fn kebab(s: &str) -> String {
    words(s).replace(' ', "-")
}

pub fn snake(s: &str) -> String {
    words(s).replace(' ', "_")
}

pub fn studly(s: &str) -> String {
    ucwords(&s.replace(['-', '_'], " ")).replace(' ', "")
}

pub fn camel(s: &str) -> String {
    lcfirst(&studly(s))
}

pub fn title(s: &str) -> String {
    ucwords(&words(s))
}

/// `replace(from, to)`: literal substring replacement.
fn replace(value: &str, args: &[Value]) -> Result<String, StubError> {
    match args {
        [from, to, ..] => {
            let from = from.as_str();
            Ok(value.replace(&*from, &to.as_str()))
        }
        _ => Err(StubError::invalid_arguments(
            "replace",
            format!("expected 2 arguments, got {}", args.len()),
        )),
    }
}
