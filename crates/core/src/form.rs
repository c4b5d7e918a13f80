use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Multi-valued form parameters, keyed by field name.
///
/// Keys iterate in byte-wise ascending order. Values for a single key keep
/// the order they were inserted (or parsed) in, so [`first`](Self::first)
/// always returns the earliest one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, Vec<String>>);

impl FormData {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value for `key`, keeping any existing values.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.entry(key.into()).or_default().push(value.into());
    }

    /// Builder-style [`append`](Self::append).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.append(key, value);
        self
    }

    /// Replace every value for `key` with a single value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), vec![value.into()]);
    }

    /// All values recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.0.get(key).map(Vec::as_slice)
    }

    /// The first value recorded for `key`.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate keys in sorted order together with their values.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }

    /// Encode as `application/x-www-form-urlencoded`.
    ///
    /// Multi-valued keys are emitted as repeated `key=value` pairs.
    pub fn encode(&self) -> Result<String, FormError> {
        let pairs: Vec<(&str, &str)> = self
            .0
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |v| (key.as_str(), v.as_str())))
            .collect();
        Ok(serde_urlencoded::to_string(pairs)?)
    }

    /// Parse an `application/x-www-form-urlencoded` body.
    ///
    /// Rejects bodies that are not UTF-8 or that contain a `%` not followed
    /// by two hex digits.
    pub fn parse(body: &[u8]) -> Result<Self, FormError> {
        let text = std::str::from_utf8(body)
            .map_err(|e| FormError::Malformed(format!("body is not UTF-8: {e}")))?;
        check_percent_escapes(text)?;
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(text)?;
        Ok(pairs.into_iter().collect())
    }
}

fn check_percent_escapes(text: &str) -> Result<(), FormError> {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return Err(FormError::Malformed(format!(
                    "invalid percent escape at byte {i}"
                )));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    Ok(())
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (key, value) in iter {
            form.append(key, value);
        }
        form
    }
}

impl From<BTreeMap<String, Vec<String>>> for FormData {
    fn from(map: BTreeMap<String, Vec<String>>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a FormData {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_single_values() {
        let form = FormData::new()
            .with("To", "+15559876543")
            .with("Body", "Hello from Rust!");
        let encoded = form.encode().unwrap();
        assert_eq!(encoded, "Body=Hello+from+Rust%21&To=%2B15559876543");
    }

    #[test]
    fn encode_repeats_multi_valued_keys() {
        let form = FormData::new()
            .with("MediaUrl", "https://a.example/1.png")
            .with("MediaUrl", "https://a.example/2.png");
        let encoded = form.encode().unwrap();
        assert_eq!(
            encoded,
            "MediaUrl=https%3A%2F%2Fa.example%2F1.png&MediaUrl=https%3A%2F%2Fa.example%2F2.png"
        );
    }

    #[test]
    fn encode_empty() {
        assert_eq!(FormData::new().encode().unwrap(), "");
    }

    #[test]
    fn keys_iterate_bytewise() {
        let form: FormData = [("b", "1"), ("B", "2"), ("a", "3"), ("A", "4")]
            .into_iter()
            .collect();
        let keys: Vec<&str> = form.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["A", "B", "a", "b"]);
    }

    #[test]
    fn first_keeps_insertion_order() {
        let form = FormData::new().with("A", "first").with("A", "second");
        assert_eq!(form.first("A"), Some("first"));
        assert_eq!(form.get("A").unwrap().len(), 2);
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn set_replaces_values() {
        let mut form = FormData::new().with("A", "1").with("A", "2");
        form.set("A", "3");
        assert_eq!(form.get("A").unwrap(), ["3".to_owned()]);
    }

    #[test]
    fn parse_body() {
        let form = FormData::parse(b"To=%2B15559876543&Body=Hello+there&Body=again").unwrap();
        assert_eq!(form.first("To"), Some("+15559876543"));
        assert_eq!(form.first("Body"), Some("Hello there"));
        assert_eq!(form.get("Body").unwrap().len(), 2);
    }

    #[test]
    fn parse_empty_body() {
        let form = FormData::parse(b"").unwrap();
        assert!(form.is_empty());
    }

    #[test]
    fn parse_rejects_bad_percent_escape() {
        let err = FormData::parse(b"A=%zz").unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)));

        let err = FormData::parse(b"A=50%").unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)));
    }

    #[test]
    fn parse_rejects_non_utf8() {
        let err = FormData::parse(&[b'A', b'=', 0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, FormError::Malformed(_)));
    }

    #[test]
    fn serializes_as_map() {
        let form = FormData::new().with("A", "1");
        let json = serde_json::to_string(&form).unwrap();
        assert_eq!(json, r#"{"A":["1"]}"#);
    }
}
