//! Query string decoding.

use std::borrow::Cow;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::error::{DeeplinkError, Result};

/// Query parameters extracted from a deep link.
///
/// Names are unique and iterate in the order they first appeared in the
/// query string. Inserting an existing name replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterSet {
    entries: Vec<(String, String)>,
}

impl ParameterSet {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a parameter, overwriting the value of an existing name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Gets a parameter value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the parameter is present.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Gets a parameter value or returns an error.
    ///
    /// # Errors
    ///
    /// Returns [`DeeplinkError::MissingParameter`] if `name` is absent.
    pub fn require(&self, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| DeeplinkError::MissingParameter(name.to_string()))
    }

    /// Parses a parameter as a specific type.
    pub fn parse<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|v| v.parse().ok())
    }

    /// Returns the parameter names in first-occurrence order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Returns an iterator over the parameters.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the parameters back into a query string.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_deeplink::{ParameterSet, decode};
    ///
    /// let mut params = ParameterSet::new();
    /// params.insert("name", "Ada Lovelace");
    /// let query = params.to_query_string();
    /// assert_eq!(query, "name=Ada%20Lovelace");
    /// assert_eq!(decode(&query), params);
    /// ```
    pub fn to_query_string(&self) -> String {
        self.entries
            .iter()
            .map(|(n, v)| format!("{}={}", urlencoding::encode(n), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// Serialized as a map so screens receive their extras as a JSON object.
impl Serialize for ParameterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Decodes a raw (still percent-encoded) query string.
///
/// Segments are separated by `&`. Within a segment the name runs up to the
/// first `=` and the value is the remainder; a segment without `=` yields
/// the name with an empty value. Empty segments and empty names are skipped.
/// A repeated name keeps its first position and takes the last value.
///
/// Values also decode `+` as a space; names do not. Malformed escapes are
/// kept verbatim, so this never fails.
///
/// # Example
///
/// ```
/// use oxide_deeplink::decode;
///
/// let params = decode("a=1&b=2&a=3");
/// assert_eq!(params.names().collect::<Vec<_>>(), vec!["a", "b"]);
/// assert_eq!(params.get("a"), Some("3"));
/// ```
pub fn decode(query: &str) -> ParameterSet {
    let mut params = ParameterSet::new();

    for segment in query.split('&').filter(|s| !s.is_empty()) {
        let (name, value) = segment.split_once('=').unwrap_or((segment, ""));
        if name.is_empty() {
            continue;
        }
        params.insert(decode_component(name, false), decode_component(value, true));
    }

    params
}

/// Percent-decodes one name or value. Escapes whose bytes are not UTF-8 are
/// kept verbatim; the rest of the component is still decoded.
fn decode_component(raw: &str, plus_as_space: bool) -> String {
    let text: Cow<'_, str> = if plus_as_space && raw.contains('+') {
        Cow::Owned(raw.replace('+', " "))
    } else {
        Cow::Borrowed(raw)
    };

    let mut out = String::with_capacity(text.len());
    let mut rest: &str = &text;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let run_len = escape_run_len(rest);
        if run_len == 0 {
            out.push('%');
            rest = &rest[1..];
        } else {
            push_escape_run(&mut out, &rest[..run_len]);
            rest = &rest[run_len..];
        }
    }
    out.push_str(rest);
    out
}

/// Length of the leading run of `%XX` escapes in `s`.
fn escape_run_len(s: &str) -> usize {
    s.as_bytes()
        .chunks(3)
        .take_while(|c| {
            matches!(c, [b'%', hi, lo] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
        })
        .count()
        * 3
}

/// Decodes a run of `%XX` escapes, copying invalid UTF-8 sequences raw.
fn push_escape_run(out: &mut String, run: &str) {
    let decoded = urlencoding::decode_binary(run.as_bytes());
    let mut bytes: &[u8] = &decoded;
    // Each decoded byte came from exactly three characters of `run`.
    let mut offset = 0;
    loop {
        match std::str::from_utf8(bytes) {
            Ok(valid) => {
                out.push_str(valid);
                return;
            }
            Err(err) => {
                let valid_len = err.valid_up_to();
                let bad_len = err.error_len().unwrap_or(bytes.len() - valid_len);
                if let Ok(valid) = std::str::from_utf8(&bytes[..valid_len]) {
                    out.push_str(valid);
                }
                let raw = &run[(offset + valid_len) * 3..(offset + valid_len + bad_len) * 3];
                debug!(escape = %raw, "Keeping undecodable percent escape");
                out.push_str(raw);
                offset += valid_len + bad_len;
                bytes = &bytes[valid_len + bad_len..];
            }
        }
    }
}
