//! Recursive decoding of resource directory tables.
//!
//! A resource directory table is one header-plus-entries record in the tree of resource
//! metadata: a fixed 16-byte header, then `name_entries + id_entries` consecutive 8-byte
//! slots. Slots whose target dword has the high bit set reference a child table
//! elsewhere in the same resource section; decoding one table therefore recursively
//! decodes every reachable descendant before returning. There is no lazy or partial
//! state - [`ResourceDirectoryTable::decode`] hands back a fully constructed, immutable
//! tree.
//!
//! # Address Arithmetic
//!
//! Stored subdirectory addresses are relative to the start of the resource section,
//! while each table decodes against a buffer that is itself a suffix of that section:
//! a table at relative address `offset` sees `section[offset..]` as its buffer. A child
//! reference at relative address `rva` is resolved to buffer index `rva - offset`,
//! checked for underflow and overrun before slicing. A reference that cannot be sliced
//! prunes only that child - an entry-identifying record goes to the
//! [`Diagnostics`](crate::directory::diagnostics::Diagnostics) collaborator and sibling
//! decoding continues.
//!
//! # Termination
//!
//! The format's addresses are expected to strictly increase into later byte regions,
//! but that is a property of well-formed data, not a guarantee. Adversarial input can
//! encode reference cycles or arbitrarily deep chains, so the walk carries a
//! visited-offset set and an explicit depth cap ([`MAX_DEPTH`]); a revisited address or
//! an over-deep reference is pruned exactly like an out-of-range one.
//!
//! # Usage Examples
//!
//! ```rust
//! use rsrcscope::directory::{
//!     diagnostics::Diagnostics, fieldspec::FieldSpec, table::ResourceDirectoryTable,
//! };
//!
//! // A single leaf table: header only, zero entries of either kind.
//! let section = [0u8; 16];
//! let diagnostics = Diagnostics::new();
//! let table = ResourceDirectoryTable::decode(
//!     &FieldSpec::standard(), &section, 0, 0, &diagnostics,
//! )?;
//!
//! assert!(table.entries().is_empty());
//! assert!(table.children().is_empty());
//! # Ok::<(), rsrcscope::Error>(())
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    directory::{
        diagnostics::{DiagnosticCategory, Diagnostics},
        entry::{ResourceDirectoryEntry, ENTRY_SIZE},
        fieldspec::{DirectoryFieldKey, FieldSpec, StandardField},
    },
    file::io::read_uint_le,
    Error::OutOfBounds,
    Result,
};

/// Size in bytes of the fixed directory table header record.
pub const HEADER_SIZE: usize = 16;

/// Maximum depth of the decoded tree.
///
/// Well-formed resource sections are three levels deep (type / name / language);
/// the cap exists purely to bound adversarial reference chains.
pub const MAX_DEPTH: usize = 32;

/// One fully decoded resource directory table and all of its descendants.
///
/// The tree is built depth-first during construction and is immutable afterwards.
/// Each node exclusively owns its entries and child tables; the underlying byte
/// buffer is only borrowed during decoding and carries no lifetime into the tree.
///
/// # Identity
///
/// `id` is a pre-order visitation counter, not a stable identity: the root receives
/// the caller-supplied seed and every subsequently decoded table receives the next
/// counter value, parent before children, left-to-right among siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirectoryTable {
    /// Pre-order visitation counter value assigned to this table
    id: u32,
    /// Relative address at which this table's byte region begins
    offset: u32,
    /// Decoded header attributes, keyed by field
    header: BTreeMap<DirectoryFieldKey, StandardField>,
    /// Calendar form of the `TIME_DATE_STAMP` field
    time_date_stamp: DateTime<Utc>,
    /// Count of name-indexed entries declared by the header
    name_entries: u32,
    /// Count of ID-indexed entries declared by the header
    id_entries: u32,
    /// Decoded entry slots, name-indexed run first
    entries: Vec<ResourceDirectoryEntry>,
    /// Child tables reachable through subdirectory references, in entry order
    children: Vec<ResourceDirectoryTable>,
}

impl ResourceDirectoryTable {
    /// Decodes the table at the start of `data` together with every reachable child.
    ///
    /// # Arguments
    ///
    /// * `spec` - Field specification for the 16-byte header record
    /// * `data` - Byte buffer whose index 0 corresponds to relative address `offset`
    /// * `id` - Seed for the pre-order id counter; assigned to this table
    /// * `offset` - Relative address at which `data` begins
    /// * `diagnostics` - Collector for pruned-child records
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `data` is smaller than the fixed
    /// header or than the entry region the header declares. Subdirectory references
    /// that cannot be resolved are not errors: those children are pruned and
    /// reported through `diagnostics`.
    pub fn decode(
        spec: &FieldSpec,
        data: &[u8],
        id: u32,
        offset: u32,
        diagnostics: &Diagnostics,
    ) -> Result<ResourceDirectoryTable> {
        let mut next_id = id;
        let mut visited = HashSet::new();
        visited.insert(offset);

        Self::decode_at(
            spec,
            data,
            id,
            offset,
            diagnostics,
            &mut next_id,
            &mut visited,
            0,
        )
    }

    /// Decodes one node of the tree; recursion state is threaded through explicitly.
    fn decode_at(
        spec: &FieldSpec,
        data: &[u8],
        id: u32,
        offset: u32,
        diagnostics: &Diagnostics,
        next_id: &mut u32,
        visited: &mut HashSet<u32>,
        depth: usize,
    ) -> Result<ResourceDirectoryTable> {
        if data.len() < HEADER_SIZE {
            return Err(OutOfBounds);
        }

        let mut header = BTreeMap::new();
        let mut stamp = 0_u32;
        let mut name_entries = 0_u32;
        let mut id_entries = 0_u32;

        for field in spec.fields() {
            let value = read_uint_le(data, field.offset, field.width)?;

            match field.key {
                DirectoryFieldKey::TimeDateStamp => stamp = value,
                DirectoryFieldKey::NrOfNameEntries => name_entries = value,
                DirectoryFieldKey::NrOfIdEntries => id_entries = value,
                _ => {}
            }

            header.insert(
                field.key,
                StandardField {
                    key: field.key,
                    description: field.description.clone(),
                    value,
                },
            );
        }

        // u32 seconds always fall inside chrono's representable range.
        let time_date_stamp = DateTime::from_timestamp(i64::from(stamp), 0).unwrap_or_default();

        let mut table = ResourceDirectoryTable {
            id,
            offset,
            header,
            time_date_stamp,
            name_entries,
            id_entries,
            entries: Vec::new(),
            children: Vec::new(),
        };

        if name_entries == 0 && id_entries == 0 {
            return Ok(table);
        }

        table.decode_entries(data)?;
        table.decode_children(spec, data, diagnostics, next_id, visited, depth);

        Ok(table)
    }

    /// Decodes the `name_entries + id_entries` slots following the header, in slot
    /// order: the name-indexed run first, then the ID-indexed run.
    #[allow(clippy::cast_possible_truncation)] // slot numbers bounded by the buffer size check
    fn decode_entries(&mut self, data: &[u8]) -> Result<()> {
        let total = u64::from(self.name_entries) + u64::from(self.id_entries);

        for index in 0..total {
            let start = HEADER_SIZE as u64 + index * ENTRY_SIZE as u64;
            if start + ENTRY_SIZE as u64 > data.len() as u64 {
                return Err(OutOfBounds);
            }

            let is_name_entry = index < u64::from(self.name_entries);
            let entry = ResourceDirectoryEntry::from_bytes(
                is_name_entry,
                &data[start as usize..],
                (index + 1) as u32,
                self.id,
            )?;

            self.entries.push(entry);
        }

        Ok(())
    }

    /// Resolves every subdirectory reference among the decoded entries into a child
    /// table. Failures here are per-child and recoverable: the offending child is
    /// pruned with a diagnostic record while sibling decoding continues.
    fn decode_children(
        &mut self,
        spec: &FieldSpec,
        data: &[u8],
        diagnostics: &Diagnostics,
        next_id: &mut u32,
        visited: &mut HashSet<u32>,
        depth: usize,
    ) {
        for entry in &self.entries {
            let Some(address) = entry.subdir_rva() else {
                continue;
            };

            if depth >= MAX_DEPTH {
                diagnostics.warning(
                    DiagnosticCategory::Child,
                    format!(
                        "Recursion depth cap {MAX_DEPTH} reached, pruning {}",
                        entry.info()
                    ),
                );
                continue;
            }

            if !visited.insert(address) {
                diagnostics.warning(
                    DiagnosticCategory::Child,
                    format!(
                        "Subdirectory address 0x{address:x} was already visited, pruning {}",
                        entry.info()
                    ),
                );
                continue;
            }

            // The buffer begins at this table's relative address, so a child at
            // `address` starts `address - offset` bytes in.
            let Some(relative) = address.checked_sub(self.offset) else {
                diagnostics.warning(
                    DiagnosticCategory::Child,
                    format!(
                        "Subdirectory address 0x{address:x} precedes table offset 0x{:x}, pruning {}",
                        self.offset,
                        entry.info()
                    ),
                );
                continue;
            };

            let start = relative as usize;
            if start > data.len() {
                diagnostics.warning(
                    DiagnosticCategory::Child,
                    format!(
                        "Subdirectory address 0x{address:x} is beyond the buffer end, pruning {}",
                        entry.info()
                    ),
                );
                continue;
            }

            // The child consumes its id before its own children are assigned.
            *next_id += 1;
            let child_id = *next_id;

            match Self::decode_at(
                spec,
                &data[start..],
                child_id,
                address,
                diagnostics,
                next_id,
                visited,
                depth + 1,
            ) {
                Ok(child) => self.children.push(child),
                Err(error) => diagnostics.error(
                    DiagnosticCategory::Child,
                    format!(
                        "Failed to decode subdirectory at 0x{address:x}: {error}, pruning {}",
                        entry.info()
                    ),
                ),
            }
        }
    }

    /// Returns this table's pre-order visitation id.
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the relative address at which this table's byte region begins.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the decoded header attributes, keyed by field.
    #[must_use]
    pub fn header(&self) -> &BTreeMap<DirectoryFieldKey, StandardField> {
        &self.header
    }

    /// Returns one decoded header attribute, if the specification carried its key.
    #[must_use]
    pub fn get(&self, key: DirectoryFieldKey) -> Option<&StandardField> {
        self.header.get(&key)
    }

    /// Returns the raw value of one header field, if present.
    #[must_use]
    pub fn value(&self, key: DirectoryFieldKey) -> Option<u32> {
        self.header.get(&key).map(|field| field.value)
    }

    /// Returns the `TIME_DATE_STAMP` field as a calendar instant, interpreting the
    /// raw value as whole seconds since the Unix epoch.
    #[must_use]
    pub fn time_date_stamp(&self) -> DateTime<Utc> {
        self.time_date_stamp
    }

    /// Returns the header-declared count of name-indexed entries.
    #[must_use]
    pub fn name_entry_count(&self) -> u32 {
        self.name_entries
    }

    /// Returns the header-declared count of ID-indexed entries.
    #[must_use]
    pub fn id_entry_count(&self) -> u32 {
        self.id_entries
    }

    /// Returns the decoded entries in slot order.
    #[must_use]
    pub fn entries(&self) -> &[ResourceDirectoryEntry] {
        &self.entries
    }

    /// Returns the decoded child tables in entry order.
    #[must_use]
    pub fn children(&self) -> &[ResourceDirectoryTable] {
        &self.children
    }
}

/// Pre-order textual dump of the tree: header fields, then each entry, then each
/// child recursively. A convenience view only - nothing in the format is load-bearing.
impl fmt::Display for ResourceDirectoryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "** resource directory table {} **", self.id)?;
        writeln!(f)?;

        for field in self.header.values() {
            if field.key == DirectoryFieldKey::TimeDateStamp {
                writeln!(f, "{}: {}", field.description, self.time_date_stamp)?;
            } else {
                writeln!(f, "{field}")?;
            }
        }

        for entry in &self.entries {
            writeln!(f, "{}", entry.info())?;
        }

        for child in &self.children {
            writeln!(f)?;
            write!(f, "{child}")?;
        }

        Ok(())
    }
}
