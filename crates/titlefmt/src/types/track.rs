use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The values a record holds for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// The record has no value for this field.
    Missing,
    Single(Cow<'a, str>),
    Multi(Vec<Cow<'a, str>>),
}

impl<'a> FieldValue<'a> {
    /// Flatten into a list of values (empty for [`FieldValue::Missing`]).
    pub fn into_values(self) -> Vec<Cow<'a, str>> {
        match self {
            FieldValue::Missing => Vec::new(),
            FieldValue::Single(value) => vec![value],
            FieldValue::Multi(values) => values,
        }
    }
}

/// A metadata record that scripts are evaluated against.
///
/// Implementations decide how field names map to values. Names arrive as
/// written in the script, so implementations that store lowercase keys should
/// normalize before looking up.
pub trait Metadata {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl<T: Metadata + ?Sized> Metadata for &T {
    fn field(&self, name: &str) -> FieldValue<'_> {
        (**self).field(name)
    }
}

/// A simple in-memory track: lowercase field names mapped to one or more
/// values.
///
/// Deserializes from a JSON object whose values are strings or arrays of
/// strings:
///
/// ```
/// use titlefmt::Track;
///
/// let track: Track = serde_json::from_str(r#"{"Title": "Song", "genre": ["Rock", "Jazz"]}"#).unwrap();
/// assert_eq!(track.values("title"), ["Song"]);
/// assert_eq!(track.values("genre").len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, FieldInput>", into = "BTreeMap<String, Vec<String>>")]
pub struct Track {
    fields: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldInput {
    One(String),
    Many(Vec<String>),
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: set a single-valued field.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder-style: set a multi-valued field.
    pub fn with_values<I, S>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_values(name, values);
        self
    }

    /// Replace a field with a single value.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.fields.insert(normalize(name), vec![value.into()]);
    }

    /// Replace a field with a list of values.
    pub fn set_values<I, S>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.fields.insert(normalize(name), values);
    }

    /// Add a value to a field, creating it if needed.
    pub fn push(&mut self, name: &str, value: impl Into<String>) {
        self.fields
            .entry(normalize(name))
            .or_default()
            .push(value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
        self.fields.remove(&normalize(name))
    }

    /// All values of a field; empty if the field is absent.
    pub fn values(&self, name: &str) -> &[String] {
        self.fields
            .get(normalize(name).as_str())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Field names in sorted order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Metadata for Track {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match self.values(name) {
            [] => FieldValue::Missing,
            [single] => FieldValue::Single(Cow::Borrowed(single)),
            many => FieldValue::Multi(many.iter().map(|v| Cow::Borrowed(v.as_str())).collect()),
        }
    }
}

impl From<BTreeMap<String, FieldInput>> for Track {
    fn from(input: BTreeMap<String, FieldInput>) -> Self {
        let fields = input
            .into_iter()
            .map(|(name, value)| {
                let values = match value {
                    FieldInput::One(v) => vec![v],
                    FieldInput::Many(vs) => vs,
                };
                (normalize(&name), values)
            })
            .collect();
        Self { fields }
    }
}

impl From<Track> for BTreeMap<String, Vec<String>> {
    fn from(track: Track) -> Self {
        track.fields
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_is_case_insensitive() {
        let track = Track::new().with("Title", "Song");
        assert_eq!(
            track.field("TITLE"),
            FieldValue::Single(Cow::Borrowed("Song"))
        );
    }

    #[test]
    fn multi_values_surface_as_multi() {
        let track = Track::new().with_values("genre", ["Rock", "Jazz"]);
        assert_eq!(
            track.field("genre").into_values(),
            vec![Cow::Borrowed("Rock"), Cow::Borrowed("Jazz")]
        );
    }

    #[test]
    fn absent_and_emptied_fields_are_missing() {
        let mut track = Track::new().with_values("genre", Vec::<String>::new());
        assert_eq!(track.field("genre"), FieldValue::Missing);
        assert_eq!(track.field("artist"), FieldValue::Missing);
        track.push("genre", "Rock");
        assert_eq!(track.values("genre"), ["Rock"]);
    }
}
