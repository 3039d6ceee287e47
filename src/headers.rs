//! Ordered, case-insensitive header collection and the duplicate-header
//! casing workaround.
//!
//! Some gateways collapse duplicate header keys when replying in single-value
//! mode. The workaround, reproduced here for compatibility, spreads a key's
//! duplicate values across distinct case-variant spellings of that key.
//! See: <https://github.com/logandk/serverless-wsgi/issues/11>

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered multimap of header names to values. Lookups are
/// case-insensitive; insertion order and duplicate keys are preserved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// First value for `name`, matched case-insensitively.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// All values for `name` in insertion order.
    #[must_use]
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .collect()
    }

    /// Distinct keys in first-seen order, deduplicated case-insensitively
    /// under their first-seen spelling.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (name, _) in &self.entries {
            if !keys.iter().any(|key| key.eq_ignore_ascii_case(name)) {
                keys.push(name);
            }
        }
        keys
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a Headers {
    type Item = (&'a str, &'a str);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a str)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// One header entry on the wire: a scalar in single-value events, a list in
/// multi-value events.
#[derive(Deserialize)]
#[serde(untagged)]
enum HeaderValues {
    One(String),
    Many(Vec<String>),
}

/// Deserializes a JSON header object into the ordered collection, streaming
/// entries in the order the source deserializer yields them so duplicate-key
/// resolution stays deterministic.
impl<'de> Deserialize<'de> for Headers {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct HeadersVisitor;

        impl<'de> Visitor<'de> for HeadersVisitor {
            type Value = Headers;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of header names to a value or a list of values")
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut headers = Headers::new();
                while let Some((name, values)) = access.next_entry::<String, HeaderValues>()? {
                    match values {
                        HeaderValues::One(value) => headers.add(name, value),
                        HeaderValues::Many(values) => {
                            for value in values {
                                headers.add(name.clone(), value);
                            }
                        }
                    }
                }
                Ok(headers)
            }
        }

        deserializer.deserialize_map(HeadersVisitor)
    }
}

/// Lazily enumerates every casing of `input` in a fixed order: the empty
/// string yields itself; a caseless first character is prepended unchanged to
/// every casing of the remainder; a cased one is prepended lower-then-upper.
/// The first character therefore toggles fastest.
#[must_use]
pub fn all_casings(input: &str) -> Box<dyn Iterator<Item = String>> {
    let mut chars = input.chars();
    match chars.next() {
        None => Box::new(std::iter::once(String::new())),
        Some(first) => {
            let rest: String = chars.collect();
            if first.to_ascii_lowercase() == first.to_ascii_uppercase() {
                Box::new(all_casings(&rest).map(move |sub| format!("{first}{sub}")))
            } else {
                let lower = first.to_ascii_lowercase();
                let upper = first.to_ascii_uppercase();
                Box::new(
                    all_casings(&rest)
                        .flat_map(move |sub| [format!("{lower}{sub}"), format!("{upper}{sub}")]),
                )
            }
        }
    }
}

/// Flattens a header collection into a single-value map. A key with one
/// value passes through unchanged; a key with duplicates gets one entry per
/// value, each under the next case-variant spelling from [`all_casings`].
#[must_use]
pub fn split_headers(headers: &Headers) -> BTreeMap<String, String> {
    let mut split = BTreeMap::new();

    for key in headers.keys() {
        let values = headers.get_all(key);
        if values.len() > 1 {
            for (value, casing) in values.iter().zip(all_casings(key)) {
                split.insert(casing, (*value).to_string());
            }
        } else if let Some(value) = values.first() {
            split.insert(key.to_string(), (*value).to_string());
        }
    }

    split
}

/// Groups a header collection into a multi-value map, each key mapped to its
/// ordered values under its first-seen spelling.
#[must_use]
pub fn group_headers(headers: &Headers) -> BTreeMap<String, Vec<String>> {
    let mut grouped = BTreeMap::new();

    for key in headers.keys() {
        grouped.insert(
            key.to_string(),
            headers
                .get_all(key)
                .into_iter()
                .map(ToString::to_string)
                .collect(),
        );
    }

    grouped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_all_casings_empty() {
        let casings: Vec<String> = all_casings("").collect();
        assert_eq!(casings, vec![String::new()]);
    }

    #[test]
    fn test_all_casings_caseless_character() {
        let casings: Vec<String> = all_casings("x2").collect();
        assert_eq!(casings, vec!["x2", "X2"]);
    }

    #[test]
    fn test_all_casings_order() {
        let casings: Vec<String> = all_casings("ab").collect();
        assert_eq!(casings, vec!["ab", "Ab", "aB", "AB"]);
    }

    #[test]
    fn test_all_casings_count() {
        assert_eq!(all_casings("abc-1").count(), 8);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "application/json");

        assert_eq!(headers.get("content-type"), Some("application/json"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(headers.get("Accept"), None);
    }

    #[test]
    fn test_get_all_preserves_order() {
        let mut headers = Headers::new();
        headers.add("Set-Cookie", "a=1");
        headers.add("set-cookie", "b=2");

        assert_eq!(headers.get_all("Set-Cookie"), vec!["a=1", "b=2"]);
        assert_eq!(headers.keys(), vec!["Set-Cookie"]);
    }

    #[test]
    fn test_split_headers_single_value() {
        let mut headers = Headers::new();
        headers.add("Content-Type", "text/html");

        let split = split_headers(&headers);
        assert_eq!(split.len(), 1);
        assert_eq!(
            split.get("Content-Type").map(String::as_str),
            Some("text/html")
        );
    }

    #[test]
    fn test_split_headers_duplicates_consume_casings_in_order() {
        let mut headers = Headers::new();
        headers.add("Set-Cookie", "a=1");
        headers.add("Set-Cookie", "b=2");
        headers.add("Set-Cookie", "c=3");

        let split = split_headers(&headers);
        assert_eq!(split.len(), 3);
        assert_eq!(split.get("set-cookie").map(String::as_str), Some("a=1"));
        assert_eq!(split.get("Set-cookie").map(String::as_str), Some("b=2"));
        assert_eq!(split.get("sEt-cookie").map(String::as_str), Some("c=3"));
    }

    #[test]
    fn test_deserialize_single_value_map() {
        let headers: Headers =
            serde_json::from_value(serde_json::json!({"Host": "example.com"})).unwrap();
        assert_eq!(headers.get("host"), Some("example.com"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_deserialize_multi_value_map() {
        let headers: Headers =
            serde_json::from_value(serde_json::json!({"Set-Cookie": ["a=1", "b=2"]})).unwrap();
        assert_eq!(headers.get_all("set-cookie"), vec!["a=1", "b=2"]);
    }

    #[test]
    fn test_deserialize_case_variant_keys_is_deterministic() {
        let payload = serde_json::json!({"X-Tag": "a", "x-tag": "b"});

        let first: Headers = serde_json::from_value(payload.clone()).unwrap();
        let second: Headers = serde_json::from_value(payload).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.get("x-tag"), Some("a"));
        assert_eq!(first.get_all("X-Tag"), vec!["a", "b"]);
    }

    #[test]
    fn test_group_headers() {
        let mut headers = Headers::new();
        headers.add("Set-Cookie", "a=1");
        headers.add("Set-Cookie", "b=2");
        headers.add("Content-Type", "text/html");

        let grouped = group_headers(&headers);
        assert_eq!(grouped.len(), 2);
        assert_eq!(
            grouped.get("Set-Cookie"),
            Some(&vec!["a=1".to_string(), "b=2".to_string()])
        );
        assert_eq!(
            grouped.get("Content-Type"),
            Some(&vec!["text/html".to_string()])
        );
    }
}
