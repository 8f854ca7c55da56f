//! Query string codec.
//!
//! # Responsibilities
//! - Decode a raw query string into ordered, percent-decoded parameters
//! - Encode ordered parameters back into a `?`-prefixed query string
//!
//! # Design Decisions
//! - A pair without `=` decodes to an empty value
//! - Empty segments (`a=1&&b=2`, trailing `&`) are skipped
//! - Only the first `=` splits a pair; later ones belong to the value
//! - Repeated keys: the last value wins, the first position is kept
//! - A malformed escape (`%zz`, or bytes that aren't UTF-8) decodes to `""`
//! - Encoding leaves `A-Z a-z 0-9 - _ . ! ~ * ' ( )` as is, like
//!   `encodeURIComponent`; literal rules are written against that form

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::QueryParams;

/// Characters escaped when encoding a key or value.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Decode a raw query string. A single leading `?` is ignored.
pub fn decode(raw: &str) -> QueryParams {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params = QueryParams::new();

    for pair in raw.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        params.insert(decode_component(key), decode_component(value));
    }

    params
}

/// Encode parameters as `?k=v&k2=v2`. Empty params encode to `""`.
pub fn encode(params: &QueryParams) -> String {
    if params.is_empty() {
        return String::new();
    }

    let pairs: Vec<String> = params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, COMPONENT),
                utf8_percent_encode(value, COMPONENT)
            )
        })
        .collect();

    format!("?{}", pairs.join("&"))
}

fn decode_component(segment: &str) -> String {
    if !has_valid_escapes(segment) {
        return String::new();
    }
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}

/// Every `%` is followed by two hex digits.
fn has_valid_escapes(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode("").is_empty());
        assert!(decode("?").is_empty());
    }

    #[test]
    fn test_decode_preserves_order() {
        let decoded = decode("?b=2&a=1&c=3");
        let keys: Vec<&str> = decoded.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(decoded["a"], "1");
    }

    #[test]
    fn test_decode_without_leading_question_mark() {
        assert_eq!(decode("param=123"), params(&[("param", "123")]));
    }

    #[test]
    fn test_decode_percent_escapes() {
        let decoded = decode("?q=hello%20world&na%26me=a%3Db");
        assert_eq!(decoded["q"], "hello world");
        assert_eq!(decoded["na&me"], "a=b");
    }

    #[test]
    fn test_decode_pair_without_equals_is_empty_value() {
        assert_eq!(decode("?flag&x=1"), params(&[("flag", ""), ("x", "1")]));
    }

    #[test]
    fn test_decode_splits_on_first_equals() {
        assert_eq!(decode("?a=b=c"), params(&[("a", "b=c")]));
    }

    #[test]
    fn test_decode_skips_empty_segments() {
        assert_eq!(decode("?a=1&&b=2&"), params(&[("a", "1"), ("b", "2")]));
    }

    #[test]
    fn test_decode_malformed_escape_is_empty() {
        let decoded = decode("?a=%zz&b=%FF&c=50%&d=ok");
        assert_eq!(decoded["a"], "");
        assert_eq!(decoded["b"], "");
        assert_eq!(decoded["c"], "");
        assert_eq!(decoded["d"], "ok");
    }

    #[test]
    fn test_decode_duplicate_key_last_wins() {
        let decoded = decode("?a=1&b=2&a=3");
        assert_eq!(decoded, params(&[("a", "3"), ("b", "2")]));
        assert_eq!(decoded.get_index(0).map(|(k, _)| k.as_str()), Some("a"));
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode(&QueryParams::new()), "");
    }

    #[test]
    fn test_encode_escapes_reserved_characters() {
        let encoded = encode(&params(&[("param", "123"), ("q", "a b&c=d")]));
        assert_eq!(encoded, "?param=123&q=a%20b%26c%3Dd");
    }

    #[test]
    fn test_encode_keeps_component_safe_characters() {
        let encoded = encode(&params(&[("q", "it's(1)!*~-_.")]));
        assert_eq!(encoded, "?q=it's(1)!*~-_.");
    }

    #[test]
    fn test_encode_escapes_non_ascii() {
        assert_eq!(encode(&params(&[("city", "Zürich")])), "?city=Z%C3%BCrich");
    }

    #[test]
    fn test_round_trip() {
        let original = params(&[("utm_source", "news letter"), ("id", "42"), ("path", "/a/b?c")]);
        assert_eq!(decode(&encode(&original)), original);
    }
}
