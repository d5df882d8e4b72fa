//! English noun inflection for the `plural` and `singular` filters.
//!
//! The filters delegate to an [`Inflector`], so a project can swap in its own
//! rules with [`register_inflector`].

use std::sync::Arc;

use super::registry::Registry;

pub trait Inflector: Send + Sync {
    fn pluralize(&self, word: &str) -> String;
    fn singularize(&self, word: &str) -> String;
}

/// Register `plural` and `singular` filters backed by `inflector`.
pub fn register_inflector(registry: &mut Registry, inflector: Arc<dyn Inflector>) {
    let plural = Arc::clone(&inflector);
    registry.filter("plural", move |value, _| Ok(plural.pluralize(value)));
    registry.filter("singular", move |value, _| Ok(inflector.singularize(value)));
}

/// Rule-based English inflector.
///
/// Covers uncountable nouns, common irregulars and the regular suffix rules.
/// The case of the first letter of the input is preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

const UNCOUNTABLE: &[&str] = &[
    "audio", "data", "equipment", "feedback", "fish", "information", "knowledge", "media",
    "metadata", "money", "news", "police", "rice", "series", "sheep", "species", "staff",
    "traffic",
];

// (singular, plural)
const IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("foot", "feet"),
    ("goose", "geese"),
    ("man", "men"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("person", "people"),
    ("tooth", "teeth"),
    ("woman", "women"),
    ("criterion", "criteria"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("status", "statuses"),
    ("alias", "aliases"),
    ("leaf", "leaves"),
    ("life", "lives"),
    ("knife", "knives"),
    ("wife", "wives"),
    ("half", "halves"),
    ("cookie", "cookies"),
    ("movie", "movies"),
    ("cache", "caches"),
    ("shelf", "shelves"),
    ("wolf", "wolves"),
    ("thief", "thieves"),
    ("bus", "buses"),
    ("bonus", "bonuses"),
    ("campus", "campuses"),
    ("census", "censuses"),
    ("virus", "viruses"),
    ("analysis", "analyses"),
    ("crisis", "crises"),
    ("diagnosis", "diagnoses"),
    ("hypothesis", "hypotheses"),
    ("parenthesis", "parentheses"),
    ("synopsis", "synopses"),
    ("thesis", "theses"),
];

// (suffix, replacement), first match wins
const PLURAL_RULES: &[(&str, &str)] = &[
    ("quiz", "quizzes"),
    ("sis", "ses"),
    ("ch", "ches"),
    ("sh", "shes"),
    ("ss", "sses"),
    ("x", "xes"),
    ("z", "zes"),
    ("us", "uses"),
    ("ay", "ays"),
    ("ey", "eys"),
    ("oy", "oys"),
    ("uy", "uys"),
    ("y", "ies"),
    ("s", "s"),
];

// `-ses`, `-ces` and `-ves` fall through to the final rule: `courses`,
// `prices`, `drives`. Exceptions are listed in IRREGULAR.
const SINGULAR_RULES: &[(&str, &str)] = &[
    ("quizzes", "quiz"),
    ("sses", "ss"),
    ("xes", "x"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("ies", "y"),
    ("ss", "ss"),
    ("us", "us"),
    ("is", "is"),
    ("s", ""),
];

impl Inflector for EnglishInflector {
    fn pluralize(&self, word: &str) -> String {
        inflect(word, |lower| {
            if let Some((_, plural)) = IRREGULAR.iter().find(|(s, p)| *s == lower || *p == lower) {
                return plural.to_string();
            }
            apply_rules(lower, PLURAL_RULES).unwrap_or_else(|| format!("{lower}s"))
        })
    }

    fn singularize(&self, word: &str) -> String {
        inflect(word, |lower| {
            if let Some((singular, _)) = IRREGULAR.iter().find(|(s, p)| *p == lower || *s == lower) {
                return singular.to_string();
            }
            if lower.ends_with("sis") {
                return lower.to_string();
            }
            apply_rules(lower, SINGULAR_RULES).unwrap_or_else(|| lower.to_string())
        })
    }
}

/// Inflect the last word of `word`, leaving any leading text and the case of
/// the word's first letter intact. `PostCategory` inflects `Category`.
fn inflect(word: &str, rule: impl Fn(&str) -> String) -> String {
    let start = word
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_alphabetic())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let tail = &word[start..];
    let all_caps = tail.chars().all(|c| c.is_ascii_uppercase());
    let split = if all_caps {
        start
    } else {
        tail.char_indices()
            .skip(1)
            .filter(|(_, c)| c.is_ascii_uppercase())
            .last()
            .map(|(i, _)| start + i)
            .unwrap_or(start)
    };

    let (head, last) = word.split_at(split);
    if last.is_empty() {
        return word.to_string();
    }

    let lower = last.to_ascii_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }

    let mut inflected = rule(&lower);
    if last.len() > 1 && all_caps {
        inflected.make_ascii_uppercase();
    } else if last.starts_with(|c: char| c.is_ascii_uppercase()) {
        if let Some(first) = inflected.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
    }
    format!("{head}{inflected}")
}

fn apply_rules(lower: &str, rules: &[(&str, &str)]) -> Option<String> {
    rules.iter().find_map(|(suffix, replacement)| {
        lower
            .strip_suffix(suffix)
            .map(|stem| format!("{stem}{replacement}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pluralize_regular() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.pluralize("post"), "posts");
        assert_eq!(inflector.pluralize("category"), "categories");
        assert_eq!(inflector.pluralize("day"), "days");
        assert_eq!(inflector.pluralize("box"), "boxes");
        assert_eq!(inflector.pluralize("branch"), "branches");
        assert_eq!(inflector.pluralize("analysis"), "analyses");
    }

    #[test]
    fn test_pluralize_irregular_and_uncountable() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.pluralize("person"), "people");
        assert_eq!(inflector.pluralize("Child"), "Children");
        assert_eq!(inflector.pluralize("news"), "news");
        assert_eq!(inflector.pluralize("people"), "people");
    }

    #[test]
    fn test_singularize() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.singularize("posts"), "post");
        assert_eq!(inflector.singularize("Categories"), "Category");
        assert_eq!(inflector.singularize("boxes"), "box");
        assert_eq!(inflector.singularize("people"), "person");
        assert_eq!(inflector.singularize("status"), "status");
        assert_eq!(inflector.singularize("analysis"), "analysis");
        assert_eq!(inflector.singularize("class"), "class");
    }

    #[test]
    fn test_singularize_words_ending_in_e() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.singularize("courses"), "course");
        assert_eq!(inflector.singularize("Responses"), "Response");
        assert_eq!(inflector.singularize("excuses"), "excuse");
        assert_eq!(inflector.singularize("prices"), "price");
        assert_eq!(inflector.singularize("drives"), "drive");
        assert_eq!(inflector.singularize("caches"), "cache");
        assert_eq!(inflector.singularize("shelves"), "shelf");
        assert_eq!(inflector.singularize("SchoolBuses"), "SchoolBus");
        assert_eq!(inflector.singularize("abuses"), "abuse");
        assert_eq!(inflector.singularize("analyses"), "analysis");
    }

    #[test]
    fn test_singular_of_plural_round_trips() {
        let inflector = EnglishInflector;
        for word in [
            "course", "response", "case", "cause", "license", "purchase", "house", "box",
            "category", "status", "post", "branch", "class", "virus", "crisis", "person",
        ] {
            let plural = inflector.pluralize(word);
            assert_eq!(inflector.singularize(&plural), word, "via {plural}");
        }
    }

    #[test]
    fn test_inflects_last_word_only() {
        let inflector = EnglishInflector;
        assert_eq!(inflector.pluralize("blog post"), "blog posts");
        assert_eq!(inflector.pluralize("PostCategory"), "PostCategories");
        assert_eq!(inflector.pluralize("user_role"), "user_roles");
    }

    struct Shouting;
    impl Inflector for Shouting {
        fn pluralize(&self, word: &str) -> String {
            format!("{word}S")
        }
        fn singularize(&self, word: &str) -> String {
            word.trim_end_matches('S').to_string()
        }
    }

    #[test]
    fn test_register_custom_inflector() {
        let mut registry = Registry::new();
        register_inflector(&mut registry, Arc::new(Shouting));
        assert_eq!(registry.apply_filter("plural", "CAT", &[]).unwrap(), "CATS");
        assert_eq!(registry.apply_filter("singular", "CATS", &[]).unwrap(), "CAT");
    }
}
