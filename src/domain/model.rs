use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One input row (CSV) or object (JSON).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Text form of a field as it appears in resolved templates.
    ///
    /// Strings are inserted verbatim, numbers and booleans use their JSON
    /// text, null and missing fields become an empty string, and nested
    /// values are written as compact JSON.
    pub fn text(&self, key: &str) -> String {
        match self.data.get(key) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

impl<K: Into<String>, V: Into<serde_json::Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record {
            data: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered, deduplicated field names shared by every record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet(Vec<String>);

impl HeaderSet {
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|h| h == key)
    }
}

impl<S: Into<String>> FromIterator<S> for HeaderSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut headers: Vec<String> = Vec::new();
        for name in iter {
            let name = name.into();
            if !headers.contains(&name) {
                headers.push(name);
            }
        }
        HeaderSet(headers)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub headers: HeaderSet,
    pub records: Vec<Record>,
}

/// Group name -> (resolved filename -> resolved payload).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    groups: BTreeMap<String, BTreeMap<String, String>>,
}

impl Manifest {
    pub const DEFAULT_GROUP: &'static str = "default";

    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the payload it replaced on a filename collision.
    pub fn insert(
        &mut self,
        group: impl Into<String>,
        filename: impl Into<String>,
        payload: impl Into<String>,
    ) -> Option<String> {
        self.groups
            .entry(group.into())
            .or_default()
            .insert(filename.into(), payload.into())
    }

    pub fn group(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.groups.get(name)
    }

    pub fn groups(&self) -> impl Iterator<Item = (&str, &BTreeMap<String, String>)> {
        self.groups.iter().map(|(name, entries)| (name.as_str(), entries))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of filename entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Outcome of the load stage of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub groups: usize,
    pub entries: usize,
    pub manifest_path: Option<String>,
    pub images: Vec<String>,
}

impl LoadReport {
    pub fn saved(&self) -> bool {
        self.manifest_path.is_some()
    }
}
