//! In-memory view of a split cooked package
//!
//! A cooked package is split into a header file (`.uasset`, holding the name
//! table), the export data (`.uexp`, the primary stream) and optionally the
//! streamed bulk data (`.ubulk`, the secondary stream). Parsing the header
//! itself is outside this crate; callers supply its size and name table.

use std::io::Cursor;
use ue_texture_core::{NameMap, NameTable};

/// Streams and name table of one cooked package
#[derive(Debug, Clone, Default)]
pub struct AssetContainer {
    /// Export data stream (`.uexp`)
    pub primary: Cursor<Vec<u8>>,
    /// Bulk data stream (`.ubulk`)
    pub secondary: Cursor<Vec<u8>>,
    /// Package name table
    pub names: NameMap,
    /// Size of the package header file preceding the export data
    pub header_size: u64,
}

impl AssetContainer {
    /// Create a container from existing stream contents
    pub fn new(primary: Vec<u8>, secondary: Vec<u8>, names: NameMap, header_size: u64) -> Self {
        Self {
            primary: Cursor::new(primary),
            secondary: Cursor::new(secondary),
            names,
            header_size,
        }
    }

    /// Create an empty container to serialize into
    pub fn empty(names: NameMap, header_size: u64) -> Self {
        Self::new(Vec::new(), Vec::new(), names, header_size)
    }

    /// Current size of the primary stream
    pub fn primary_size(&self) -> u64 {
        self.primary.get_ref().len() as u64
    }

    /// Current size of the secondary stream
    pub fn secondary_size(&self) -> u64 {
        self.secondary.get_ref().len() as u64
    }

    /// Rewind both streams to their start
    pub fn rewind(&mut self) {
        self.primary.set_position(0);
        self.secondary.set_position(0);
    }

    /// Resolve a name id
    pub fn lookup_name(&self, id: u64) -> Option<&str> {
        self.names.lookup(id)
    }
}
