//! A [Composition] is an ordered mapping of labels to counts. It describes both the contents of a
//! [Hat](crate::hat::Hat) and the minimum number of each label that a draw must contain.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde::ser::SerializeMap;
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InvalidComposition {
    #[error("empty label")]
    EmptyLabel,

    #[error("malformed entry '{0}'")]
    MalformedEntry(String),

    #[error("invalid count for '{label}': {err}")]
    InvalidCount { label: String, err: ParseIntError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Composition {
    entries: Vec<Entry>,
}
impl Composition {
    /// Adds (or replaces) the count for `label`.
    ///
    /// # Panics
    /// If the label is empty.
    pub fn with(self, label: impl Into<String>, count: usize) -> Self {
        self.try_with(label, count).unwrap()
    }

    pub fn try_with(mut self, label: impl Into<String>, count: usize) -> Result<Self, InvalidComposition> {
        self.insert(label, count)?;
        Ok(self)
    }

    /// Sets the count for `label`, replacing any existing count while retaining the label's
    /// original position.
    pub fn insert(&mut self, label: impl Into<String>, count: usize) -> Result<(), InvalidComposition> {
        let label = label.into();
        if label.is_empty() {
            return Err(InvalidComposition::EmptyLabel);
        }
        match self.position(&label) {
            Some(index) => self.entries[index].count = count,
            None => self.entries.push(Entry { label, count }),
        }
        Ok(())
    }

    pub fn try_from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, usize)>,
    ) -> Result<Self, InvalidComposition> {
        let mut composition = Self::default();
        for (label, count) in pairs {
            composition.insert(label, count)?;
        }
        Ok(composition)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.label == label)
    }

    /// The count for `label`, or zero if the label is absent.
    pub fn count(&self, label: &str) -> usize {
        self.position(label)
            .map(|index| self.entries[index].count)
            .unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Number of distinct labels, including those with a zero count.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Display for Composition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, entry) in self.entries.iter().enumerate() {
            if index != 0 {
                write!(f, ",")?;
            }
            write!(f, "{}={}", entry.label, entry.count)?;
        }
        Ok(())
    }
}

/// Parses the `red=5,blue=2` form. Whitespace around entries is ignored and an empty string
/// yields an empty composition.
impl FromStr for Composition {
    type Err = InvalidComposition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut composition = Self::default();
        for frag in s.split(',').map(str::trim).filter(|frag| !frag.is_empty()) {
            let (label, count) = frag
                .split_once('=')
                .ok_or_else(|| InvalidComposition::MalformedEntry(frag.to_string()))?;
            let label = label.trim();
            let count = count
                .trim()
                .parse()
                .map_err(|err| InvalidComposition::InvalidCount {
                    label: label.to_string(),
                    err,
                })?;
            composition.insert(label, count)?;
        }
        Ok(composition)
    }
}

impl<'a> From<Composition> for Cow<'a, Composition> {
    fn from(composition: Composition) -> Self {
        Cow::Owned(composition)
    }
}

impl<'a> From<&'a Composition> for Cow<'a, Composition> {
    fn from(composition: &'a Composition) -> Self {
        Cow::Borrowed(composition)
    }
}

impl Serialize for Composition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.label, &entry.count)?;
        }
        map.end()
    }
}

/// Deserialises from a map, keeping the order in which the keys appear.
impl<'de> Deserialize<'de> for Composition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CompositionVisitor;

        impl<'de> Visitor<'de> for CompositionVisitor {
            type Value = Composition;

            fn expecting(&self, f: &mut Formatter) -> std::fmt::Result {
                write!(f, "a map of labels to counts")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut composition = Composition::default();
                while let Some((label, count)) = access.next_entry::<String, usize>()? {
                    composition
                        .insert(label, count)
                        .map_err(serde::de::Error::custom)?;
                }
                Ok(composition)
            }
        }

        deserializer.deserialize_map(CompositionVisitor)
    }
}
