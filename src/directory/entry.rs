//! Decoding of individual resource directory entry slots.
//!
//! Every resource directory table header is followed by a run of fixed-size 8-byte
//! entry slots. The slot layout is position-dependent, not self-describing: the parent
//! table's header declares how many leading slots are name-indexed and how many
//! ID-indexed slots follow, so the name-vs-id interpretation is an input to the
//! decoder, never derived from the bytes.
//!
//! # Slot Layout
//!
//! Little-endian, per the PE resource directory entry standard:
//!
//! ```text
//! Bytes [0,4): name entries - relative pointer to a length-prefixed name string
//!              id entries   - 32-bit numeric resource ID
//! Bytes [4,8): target dword - high bit set: subdirectory RVA (mask the bit off)
//!                             high bit clear: data entry RVA (leaf metadata)
//! ```
//!
//! Any 8 bytes decode structurally; whether the resulting addresses resolve to
//! anything is the concern of [`crate::directory::table`], which prunes children with
//! invalid addresses during tree construction.

use crate::{file::io::read_le_at, Result};

/// Size in bytes of one directory entry slot.
pub const ENTRY_SIZE: usize = 8;

/// High bit of the target dword, marking the remainder as a subdirectory RVA.
const SUBDIR_BIT: u32 = 0x8000_0000;

/// What a directory entry points at.
///
/// Exactly one of the two kinds applies per entry, selected by the high bit of the
/// slot's second dword.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryTarget {
    /// Relative address of a child directory table, high bit already cleared
    Subdirectory(u32),
    /// Relative address of leaf data-entry metadata (decoded outside this crate)
    Data(u32),
}

/// One decoded 8-byte directory entry slot.
///
/// Carries enough identity (sequence number, parent table id, name-vs-id flag) to
/// support diagnostic reporting without re-traversing the tree.
///
/// # Examples
///
/// ```rust
/// use rsrcscope::directory::entry::ResourceDirectoryEntry;
///
/// let slot = [0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80];
/// let entry = ResourceDirectoryEntry::from_bytes(true, &slot, 1, 0)?;
///
/// assert!(entry.is_name_entry());
/// assert_eq!(entry.name_rva(), Some(5));
/// assert_eq!(entry.subdir_rva(), Some(0));
/// assert_eq!(entry.data_rva(), None);
/// # Ok::<(), rsrcscope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDirectoryEntry {
    /// Whether this slot was in the name-indexed run of its parent table
    is_name_entry: bool,
    /// 1-based position within the parent table's slot run
    number: u32,
    /// Id of the table that decoded this entry
    parent_id: u32,
    /// First dword: name pointer for name entries, numeric ID otherwise
    name_or_id: u32,
    /// Second dword, resolved to its subdirectory/data interpretation
    target: EntryTarget,
}

impl ResourceDirectoryEntry {
    /// Decodes one entry from exactly 8 little-endian bytes.
    ///
    /// # Arguments
    ///
    /// * `is_name_entry` - Whether the slot sits in the parent's name-indexed run
    /// * `data` - The slot bytes; at least [`ENTRY_SIZE`] bytes must be present
    /// * `number` - 1-based position of the slot within its parent
    /// * `parent_id` - Id of the decoding parent table
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::OutOfBounds`] if `data` holds fewer than 8 bytes;
    /// any 8 bytes are structurally decodable.
    pub fn from_bytes(
        is_name_entry: bool,
        data: &[u8],
        number: u32,
        parent_id: u32,
    ) -> Result<ResourceDirectoryEntry> {
        let mut offset = 0_usize;
        let name_or_id = read_le_at(data, &mut offset)?;
        let target_dword: u32 = read_le_at(data, &mut offset)?;

        let target = if target_dword & SUBDIR_BIT != 0 {
            EntryTarget::Subdirectory(target_dword & !SUBDIR_BIT)
        } else {
            EntryTarget::Data(target_dword)
        };

        Ok(ResourceDirectoryEntry {
            is_name_entry,
            number,
            parent_id,
            name_or_id,
            target,
        })
    }

    /// Returns `true` if this entry sits in its parent's name-indexed run.
    #[must_use]
    pub fn is_name_entry(&self) -> bool {
        self.is_name_entry
    }

    /// Returns the 1-based position of this entry within its parent table.
    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Returns the id of the table that decoded this entry.
    #[must_use]
    pub fn parent_id(&self) -> u32 {
        self.parent_id
    }

    /// Returns what this entry points at.
    #[must_use]
    pub fn target(&self) -> EntryTarget {
        self.target
    }

    /// Returns the child table's relative address, only when the subdirectory bit
    /// was set. The high bit is already cleared.
    #[must_use]
    pub fn subdir_rva(&self) -> Option<u32> {
        match self.target {
            EntryTarget::Subdirectory(rva) => Some(rva),
            EntryTarget::Data(_) => None,
        }
    }

    /// Returns the leaf data entry's relative address, only when the subdirectory
    /// bit was clear.
    #[must_use]
    pub fn data_rva(&self) -> Option<u32> {
        match self.target {
            EntryTarget::Data(rva) => Some(rva),
            EntryTarget::Subdirectory(_) => None,
        }
    }

    /// Returns the relative pointer to the resource name string, only for name
    /// entries.
    #[must_use]
    pub fn name_rva(&self) -> Option<u32> {
        self.is_name_entry.then_some(self.name_or_id)
    }

    /// Returns the numeric resource ID, only for ID entries.
    #[must_use]
    pub fn resource_id(&self) -> Option<u32> {
        (!self.is_name_entry).then_some(self.name_or_id)
    }

    /// Returns a diagnostic one-liner identifying this entry within the tree.
    #[must_use]
    pub fn info(&self) -> String {
        let kind = if self.is_name_entry {
            "name entry"
        } else {
            "id entry"
        };
        let target = match self.target {
            EntryTarget::Subdirectory(rva) => format!("subdirectory at 0x{rva:x}"),
            EntryTarget::Data(rva) => format!("data entry at 0x{rva:x}"),
        };

        format!(
            "{} {} of table {} ({}: 0x{:x}, {})",
            kind,
            self.number,
            self.parent_id,
            if self.is_name_entry { "name rva" } else { "id" },
            self.name_or_id,
            target
        )
    }
}
