//! Syntax tree for the legacy property-list dialect.
//!
//! The dialect only knows three shapes: strings, arrays and dictionaries.
//! Numbers are plain unquoted strings and are interpreted by the consumer.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A string scalar plus the rendering hints captured around it.
///
/// Equality, ordering and hashing only look at the text. The trailing
/// `/* ... */` comment and whether the source spelled the value in quotes are
/// presentation details that the writer echoes back.
#[derive(Debug, Clone, Default)]
pub struct PlistString {
    value: String,
    comment: Option<String>,
    quoted: bool,
}

impl PlistString {
    /// Create a plain string without comment.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: None,
            quoted: false,
        }
    }

    /// Create a string followed by an inline comment.
    pub fn with_comment(value: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            comment: Some(comment.into()),
            quoted: false,
        }
    }

    /// Always render this value in double quotes, even when it would be safe bare.
    #[must_use]
    pub fn quoted(mut self) -> Self {
        self.quoted = true;
        self
    }

    pub(crate) fn from_parts(value: String, comment: Option<String>, quoted: bool) -> Self {
        Self {
            value,
            comment,
            quoted,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn set_comment(&mut self, comment: Option<String>) {
        self.comment = comment;
    }

    /// Whether the value was quoted in the source (or forced with [`Self::quoted`]).
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }
}

impl PartialEq for PlistString {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for PlistString {}

impl PartialOrd for PlistString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PlistString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl Hash for PlistString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for PlistString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<&str> for PlistString {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlistString {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A node of the plist tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlistValue {
    String(PlistString),
    Array(Vec<PlistValue>),
    Dictionary(PlistDictionary),
}

impl PlistValue {
    /// Shorthand for a comment-free string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(PlistString::new(value))
    }

    pub fn as_string(&self) -> Option<&PlistString> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_string().map(PlistString::as_str)
    }

    pub fn as_array(&self) -> Option<&[PlistValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dictionary(&self) -> Option<&PlistDictionary> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    pub fn as_dictionary_mut(&mut self) -> Option<&mut PlistDictionary> {
        match self {
            Self::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }

    /// Human-readable shape name used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Dictionary(_) => "dictionary",
        }
    }
}

impl From<PlistString> for PlistValue {
    fn from(value: PlistString) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PlistValue {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for PlistValue {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl From<Vec<PlistValue>> for PlistValue {
    fn from(items: Vec<PlistValue>) -> Self {
        Self::Array(items)
    }
}

impl From<PlistDictionary> for PlistValue {
    fn from(dict: PlistDictionary) -> Self {
        Self::Dictionary(dict)
    }
}

/// Insertion-ordered dictionary.
///
/// Parsed dictionaries keep the order of the source so that writing them back
/// is lossless. [`PlistDictionary::insert`] places new keys at their byte-wise
/// sorted position, which is where the legacy tools put them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlistDictionary {
    entries: Vec<(PlistString, PlistValue)>,
}

impl PlistDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        self.position(key).map(|idx| &self.entries[idx].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PlistValue> {
        self.position(key).map(|idx| &mut self.entries[idx].1)
    }

    /// Key (with its captured comment) and value for `key`.
    pub fn get_entry(&self, key: &str) -> Option<(&PlistString, &PlistValue)> {
        self.position(key).map(|idx| {
            let (k, v) = &self.entries[idx];
            (k, v)
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    /// Insert or replace a value.
    ///
    /// An existing key keeps its position and returns the previous value.
    pub fn insert(
        &mut self,
        key: impl Into<PlistString>,
        value: impl Into<PlistValue>,
    ) -> Option<PlistValue> {
        let key = key.into();
        let value = value.into();
        if let Some(idx) = self.position(key.as_str()) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }
        let at = self
            .entries
            .iter()
            .position(|(existing, _)| existing.as_str() > key.as_str())
            .unwrap_or(self.entries.len());
        self.entries.insert(at, (key, value));
        None
    }

    /// Append an entry at the end, keeping source order.
    pub fn push(&mut self, key: impl Into<PlistString>, value: impl Into<PlistValue>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn remove(&mut self, key: &str) -> Option<PlistValue> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &str) -> Option<(PlistString, PlistValue)> {
        self.position(key).map(|idx| self.entries.remove(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlistString, &PlistValue)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.as_str() == key)
    }
}

impl FromIterator<(PlistString, PlistValue)> for PlistDictionary {
    fn from_iter<I: IntoIterator<Item = (PlistString, PlistValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for PlistDictionary {
    type Item = (PlistString, PlistValue);
    type IntoIter = std::vec::IntoIter<(PlistString, PlistValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
