//! Export Table
//!
//! Original name -> generated name(s), in insertion order. This is what
//! the importing module receives. Callers own the table and may reuse one
//! across several stylesheets to aggregate a project-wide mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::naming::camelize;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ExportEntry {
    value: String,
    /// Stylesheet that produced the entry; `None` for pre-seeded entries.
    origin: Option<String>,
    /// Set for camelCase aliases: the key the alias was derived from.
    alias_of: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportTable {
    entries: IndexMap<String, ExportEntry>,
}

impl ExportTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds a fixed mapping. Seeded entries are reused verbatim by
    /// every stylesheet that declares `name`.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(
            name.into(),
            ExportEntry {
                value: value.into(),
                origin: None,
                alias_of: None,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|entry| entry.value.as_str())
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.as_str(), entry.value.as_str()))
    }

    /// Returns the stored value if `file` may reuse it: the entry was
    /// pre-seeded or produced by `file` itself.
    pub(crate) fn reusable(&self, name: &str, file: &str) -> Option<&str> {
        let entry = self.entries.get(name)?;
        match &entry.origin {
            Some(origin) if origin != file => None,
            _ => Some(entry.value.as_str()),
        }
    }

    pub(crate) fn is_foreign(&self, name: &str, file: &str) -> bool {
        matches!(
            self.entries.get(name),
            Some(ExportEntry { origin: Some(origin), .. }) if origin != file
        )
    }

    /// Records a name generated for `file`. An entry owned by another
    /// stylesheet is taken over, along with dropping aliases derived from it.
    pub(crate) fn record(&mut self, name: &str, value: &str, file: &str) {
        if self.is_foreign(name, file) {
            tracing::debug!(name, file, "export entry taken over from another stylesheet");
            self.entries
                .retain(|_, entry| entry.alias_of.as_deref() != Some(name));
        }
        self.entries.insert(
            name.to_string(),
            ExportEntry {
                value: value.to_string(),
                origin: Some(file.to_string()),
                alias_of: None,
            },
        );
    }

    /// Appends space separated aliases to an existing entry.
    pub(crate) fn append(&mut self, name: &str, aliases: &str) {
        if let Some(entry) = self.entries.get_mut(name) {
            entry.value.push(' ');
            entry.value.push_str(aliases);
        }
    }

    /// Adds a camelCase alias for every key whose camelCase form is not a
    /// key yet. Existing keys always win; aliases are not re-camelized.
    pub fn finalize_aliases(&mut self) {
        let snapshot: Vec<(String, ExportEntry)> = self
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.clone()))
            .collect();

        for (name, entry) in snapshot {
            let camel = camelize(&name);
            if self.entries.contains_key(&camel) {
                continue;
            }
            self.entries.insert(
                camel,
                ExportEntry {
                    value: entry.value,
                    origin: entry.origin,
                    alias_of: Some(name),
                },
            );
        }
    }

    pub fn to_map(&self) -> IndexMap<String, String> {
        self.iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ExportTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut table = ExportTable::new();
        for (name, value) in iter {
            table.insert(name, value);
        }
        table
    }
}

impl Serialize for ExportTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for ExportTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = IndexMap::<String, String>::deserialize(deserializer)?;
        Ok(map.into_iter().collect())
    }
}
