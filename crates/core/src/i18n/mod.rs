//! English, Hindi and Marathi interface strings.
//!
//! Keys are dotted paths such as `dashboard.cards.chatbot.title`. Lookups
//! fall back from the requested language to English and finally to the key
//! itself, so a missing string shows up as its key instead of failing.

mod table;

use serde_json::{Map, Value};

use crate::types::Language;
use table::{ENTRIES, Entry};

const fn column(lang: Language) -> usize {
    match lang {
        Language::En => 0,
        Language::Hi => 1,
        Language::Mr => 2,
    }
}

fn entry(key: &str) -> Option<&'static Entry> {
    ENTRIES.iter().find(|(k, _)| *k == key)
}

fn lookup(entry: &'static Entry, lang: Language) -> Option<&'static str> {
    entry.1.get(column(lang)).copied().filter(|s| !s.is_empty())
}

/// Translate `key` into `lang`.
///
/// Falls back to English, then to the key itself.
#[must_use]
pub fn translate<'a>(lang: Language, key: &'a str) -> &'a str {
    entry(key)
        .and_then(|e| lookup(e, lang).or_else(|| lookup(e, Language::En)))
        .unwrap_or(key)
}

/// Every translation key, in table order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    ENTRIES.iter().map(|(k, _)| *k)
}

/// All strings for one language as a nested JSON object.
///
/// `cart.total` becomes `{"cart": {"total": "..."}}`, matching the shape
/// the client's `t()` helper walks.
#[must_use]
pub fn bundle(lang: Language) -> Value {
    let mut root = Map::new();
    for key in keys() {
        insert_path(&mut root, key, translate(lang, key));
    }
    Value::Object(root)
}

fn insert_path(root: &mut Map<String, Value>, key: &str, text: &str) {
    let mut node = root;
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            node.insert(segment.to_owned(), Value::String(text.to_owned()));
            return;
        }
        let child = node
            .entry(segment.to_owned())
            .or_insert_with(|| Value::Object(Map::new()));
        let Some(map) = child.as_object_mut() else {
            // A leaf already occupies this path; keep it.
            return;
        };
        node = map;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_every_key_resolves_in_every_language() {
        for key in keys() {
            for lang in Language::ALL {
                let text = translate(lang, key);
                assert!(!text.is_empty(), "{key} is empty for {lang}");
                assert_ne!(text, key, "{key} fell back to the raw key for {lang}");
                let own = entry(key).and_then(|e| lookup(e, lang));
                assert!(own.is_some(), "{key} has no {lang} string");
            }
        }
    }

    #[test]
    fn test_keys_are_unique_and_not_prefixes() {
        let all: Vec<&str> = keys().collect();
        let unique: HashSet<&str> = all.iter().copied().collect();
        assert_eq!(unique.len(), all.len());
        for a in &all {
            let prefix = format!("{a}.");
            assert!(
                !all.iter().any(|b| b.starts_with(&prefix)),
                "{a} is both a string and a group"
            );
        }
    }

    #[test]
    fn test_unknown_key_returns_key() {
        assert_eq!(translate(Language::Hi, "nope.missing"), "nope.missing");
    }

    #[test]
    fn test_translate_picks_language() {
        assert_eq!(translate(Language::En, "cart.total"), "Total");
        assert_eq!(translate(Language::Hi, "cart.total"), "कुल");
        assert_eq!(translate(Language::Mr, "cart.total"), "एकूण");
    }

    #[test]
    fn test_bundle_is_nested() {
        let bundle = bundle(Language::Mr);
        assert_eq!(
            bundle["dashboard"]["cards"]["chatbot"]["title"],
            "तज्ञांना विचारा"
        );
        assert_eq!(bundle["weather"]["wind"], "वारा");
    }
}
