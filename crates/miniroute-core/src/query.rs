//! Query-string codec for route descriptors.
//!
//! Route queries are flat string-to-string mappings with unique keys and no
//! significant ordering. [`parse`] and [`stringify`] form a round-trip-safe
//! pair: for any [`Query`] `q`, `parse(&stringify(&q)) == q`.

use std::collections::HashMap;

/// A flat query mapping. Keys are unique; insertion order is irrelevant.
pub type Query = HashMap<String, String>;

/// Parses a raw query string (e.g. `"id=7&tab=posts"`) into a [`Query`].
///
/// Handles percent-encoding and `+`-as-space form encoding. Pairs without a
/// `=` yield an empty value; empty pairs are skipped. A later duplicate key
/// replaces an earlier one.
///
/// # Examples
///
/// ```
/// use miniroute_core::query::parse;
///
/// let q = parse("name=hello%20world&id=7");
/// assert_eq!(q.get("name").map(String::as_str), Some("hello world"));
/// assert_eq!(q.get("id").map(String::as_str), Some("7"));
/// ```
pub fn parse(raw: &str) -> Query {
    let mut query = Query::new();

    for pair in raw.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .find('=')
            .map_or((pair, ""), |eq_pos| (&pair[..eq_pos], &pair[eq_pos + 1..]));

        query.insert(percent_decode(key), percent_decode(value));
    }

    query
}

/// Encodes a [`Query`] as a raw query string.
///
/// Keys and values are percent-encoded. Pairs are emitted in sorted key
/// order so that equal queries stringify identically.
///
/// # Examples
///
/// ```
/// use miniroute_core::query::stringify;
///
/// let mut q = miniroute_core::Query::new();
/// q.insert("b".to_string(), "2".to_string());
/// q.insert("a".to_string(), "1".to_string());
/// assert_eq!(stringify(&q), "a=1&b=2");
/// ```
pub fn stringify(query: &Query) -> String {
    let mut parts: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect();

    parts.sort();
    parts.join("&")
}

/// Returns `defaults` with `overrides` layered on top.
///
/// Keys present in both mappings take the value from `overrides`.
pub fn merged(defaults: &Query, overrides: &Query) -> Query {
    let mut result = defaults.clone();
    for (key, value) in overrides {
        result.insert(key.clone(), value.clone());
    }
    result
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}
