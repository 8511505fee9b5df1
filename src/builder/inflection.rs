//! English noun pluralization
//!
//! Rule-based: irregular and uncountable nouns first, then suffix rules
//! tried in order.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static IRREGULAR: &[(&str, &str)] = &[
    ("child", "children"),
    ("person", "people"),
    ("man", "men"),
    ("woman", "women"),
    ("foot", "feet"),
    ("tooth", "teeth"),
    ("goose", "geese"),
    ("mouse", "mice"),
    ("ox", "oxen"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("vertex", "vertices"),
    ("datum", "data"),
    ("medium", "media"),
    ("criterion", "criteria"),
    ("phenomenon", "phenomena"),
];

static UNCOUNTABLE: &[&str] = &[
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
    "metadata",
];

static O_TO_OES: &[&str] = &["echo", "hero", "potato", "tomato", "veto", "torpedo"];

static F_TO_VES: &[&str] = &[
    "calf", "half", "knife", "leaf", "life", "loaf", "self", "shelf", "thief", "wife", "wolf",
];

/// Suffix rules; the first match wins
static RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)([^aeiouy])y$", "${1}ies"),
        (r"(?i)(quiz)$", "${1}zes"),
        (r"(?i)(ss|sh|ch|x|z)$", "${1}es"),
        (r"(?i)(analys|ax|bas|cris|diagnos|ellips|parenthes|synops|thes)is$", "${1}es"),
        (r"(?i)(bus|alias|status|virus)$", "${1}es"),
        (r"(?i)([^aeiou])s$", "${1}ses"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Literals accepted by [`plural_literal`]
static LITERAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$").unwrap());

/// Plural of an English noun
pub fn pluralize(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();
    if UNCOUNTABLE.contains(&lower.as_str()) {
        return word.to_string();
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return plural.to_string();
    }
    if O_TO_OES.contains(&lower.as_str()) {
        return format!("{}es", word);
    }
    if F_TO_VES.contains(&lower.as_str()) {
        let stem = word.trim_end_matches('e').trim_end_matches('f');
        return format!("{}ves", stem);
    }

    for (rule, replacement) in RULES.iter() {
        if rule.is_match(word) {
            return rule.replace(word, *replacement).into_owned();
        }
    }

    format!("{}s", word)
}

/// Pluralized identifier component for an enumeration literal.
///
/// `-` becomes `_` and the last `_` separated segment is pluralized:
/// `entry` gives `entries`, `user-defined` gives `user_defineds`.
/// Anything outside lowercase ASCII letters, digits, `-` and `_` is
/// rejected.
pub fn plural_literal(literal: &str) -> Result<String> {
    if !LITERAL.is_match(literal) {
        return Err(Error::name_derivation(
            literal,
            "enumeration literal must consist of lowercase ASCII letters, digits, '-' and '_'",
        ));
    }

    let identifier = literal.replace('-', "_");
    let (head, last) = match identifier.rfind('_') {
        Some(index) => identifier.split_at(index + 1),
        None => ("", identifier.as_str()),
    };
    Ok(format!("{}{}", head, pluralize(last)))
}
