//! Name table access
//!
//! Package headers intern every name they reference; serialized objects refer
//! to names by index. The texture codec only needs lookup and interning.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// A string-interning table addressed by integer ids
pub trait NameTable {
    /// Resolve a name id
    fn lookup(&self, id: u64) -> Option<&str>;

    /// Return the id of `name`, appending it when missing
    fn intern(&mut self, name: &str) -> u64;
}

/// In-memory name table preserving insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameMap {
    names: IndexSet<String>,
}

impl NameMap {
    /// Create an empty name table
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of interned names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate names in id order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl NameTable for NameMap {
    fn lookup(&self, id: u64) -> Option<&str> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.names.get_index(index))
            .map(String::as_str)
    }

    fn intern(&mut self, name: &str) -> u64 {
        if let Some(index) = self.names.get_index_of(name) {
            return index as u64;
        }
        let (index, _) = self.names.insert_full(name.to_string());
        index as u64
    }
}

impl<S: Into<String>> FromIterator<S> for NameMap {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
