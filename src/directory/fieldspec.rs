//! Field specifications for resource directory table headers.
//!
//! A resource directory table starts with a fixed 16-byte header record. Rather than
//! hard-coding that layout into a struct, the decoder extracts header fields through a
//! [`FieldSpec`]: an ordered, immutable sequence of (key, description, offset, width)
//! descriptors supplied by the caller. This keeps the header layout configurable as
//! runtime data while the extraction itself stays a single bounds-checked
//! little-endian routine ([`crate::file::io::read_uint_le`]).
//!
//! The symbolic keys form a closed set, [`DirectoryFieldKey`]; a specification naming a
//! key outside that set is a configuration error and fails fast with
//! [`crate::Error::UnknownField`] instead of surfacing later as mysteriously malformed
//! data.
//!
//! # Usage Examples
//!
//! ```rust
//! use rsrcscope::directory::fieldspec::{DirectoryFieldKey, FieldSpec};
//!
//! // The standard PE header layout.
//! let spec = FieldSpec::standard();
//! assert_eq!(spec.fields().len(), 6);
//!
//! // The same layout built from external configuration data.
//! let spec = FieldSpec::from_entries([
//!     ("CHARACTERISTICS", "resource flags", 0, 4),
//!     ("TIME_DATE_STAMP", "time date stamp", 4, 4),
//!     ("MAJOR_VERSION", "major version", 8, 2),
//!     ("MINOR_VERSION", "minor version", 10, 2),
//!     ("NR_OF_NAME_ENTRIES", "number of name entries", 12, 2),
//!     ("NR_OF_ID_ENTRIES", "number of id entries", 14, 2),
//! ])?;
//! assert_eq!(spec.fields()[1].key, DirectoryFieldKey::TimeDateStamp);
//! # Ok::<(), rsrcscope::Error>(())
//! ```

use std::{fmt, str::FromStr};

use strum::{Display, EnumString};

use crate::{directory::table::HEADER_SIZE, Error::UnknownField, Result};

/// Symbolic keys of the fields a resource directory table header can carry.
///
/// The string form of each key is its canonical upper-snake spelling, which is also
/// the spelling accepted by [`FieldSpec::from_entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString)]
pub enum DirectoryFieldKey {
    /// Resource flags, reserved as zero in the standard layout
    #[strum(serialize = "CHARACTERISTICS")]
    Characteristics,
    /// Creation time as whole seconds since the Unix epoch
    #[strum(serialize = "TIME_DATE_STAMP")]
    TimeDateStamp,
    /// Major version of the resource data layout
    #[strum(serialize = "MAJOR_VERSION")]
    MajorVersion,
    /// Minor version of the resource data layout
    #[strum(serialize = "MINOR_VERSION")]
    MinorVersion,
    /// Count of name-indexed entries following the header
    #[strum(serialize = "NR_OF_NAME_ENTRIES")]
    NrOfNameEntries,
    /// Count of ID-indexed entries following the header
    #[strum(serialize = "NR_OF_ID_ENTRIES")]
    NrOfIdEntries,
}

/// Layout of one header field: where it sits in the 16-byte record and how wide it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Symbolic key the extracted value is stored under
    pub key: DirectoryFieldKey,
    /// Human-readable description, carried through to the decoded attributes
    pub description: String,
    /// Byte offset of the field within the header record
    pub offset: usize,
    /// Field width in bytes, 1 to 4
    pub width: usize,
}

/// An ordered, immutable field specification for the 16-byte header record.
///
/// Shared by reference across every table node of a decoded tree; construction
/// validates that each field stays within the fixed header record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    fields: Vec<FieldDescriptor>,
}

impl FieldSpec {
    /// Creates a specification from already-typed descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Malformed`] if any descriptor has a width outside
    /// `1..=4` or extends past the 16-byte header record.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<FieldSpec> {
        for field in &fields {
            if field.width == 0 || field.width > 4 {
                return Err(malformed_error!(
                    "Field {} has width {} outside the supported 1-4 byte range",
                    field.key,
                    field.width
                ));
            }

            let Some(end) = field.offset.checked_add(field.width) else {
                return Err(malformed_error!(
                    "Field {} overflows the header record",
                    field.key
                ));
            };
            if end > HEADER_SIZE {
                return Err(malformed_error!(
                    "Field {} at offset {} width {} extends past the {}-byte header",
                    field.key,
                    field.offset,
                    field.width,
                    HEADER_SIZE
                ));
            }
        }

        Ok(FieldSpec { fields })
    }

    /// Creates a specification from externally supplied string-keyed entries.
    ///
    /// This is the runtime-configurable path: keys arrive as strings and are resolved
    /// against the closed symbolic key set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownField`] for a key outside the expected symbolic
    /// set, or [`crate::Error::Malformed`] for an out-of-record layout.
    pub fn from_entries<'a>(
        entries: impl IntoIterator<Item = (&'a str, &'a str, usize, usize)>,
    ) -> Result<FieldSpec> {
        let mut fields = Vec::new();
        for (key, description, offset, width) in entries {
            let key = DirectoryFieldKey::from_str(key)
                .map_err(|_| UnknownField(key.to_string()))?;

            fields.push(FieldDescriptor {
                key,
                description: description.to_string(),
                offset,
                width,
            });
        }

        FieldSpec::new(fields)
    }

    /// Returns the standard PE resource directory header layout.
    #[must_use]
    pub fn standard() -> FieldSpec {
        let fields = [
            (DirectoryFieldKey::Characteristics, "resource flags", 0, 4),
            (DirectoryFieldKey::TimeDateStamp, "time date stamp", 4, 4),
            (DirectoryFieldKey::MajorVersion, "major version", 8, 2),
            (DirectoryFieldKey::MinorVersion, "minor version", 10, 2),
            (
                DirectoryFieldKey::NrOfNameEntries,
                "number of name entries",
                12,
                2,
            ),
            (
                DirectoryFieldKey::NrOfIdEntries,
                "number of id entries",
                14,
                2,
            ),
        ];

        FieldSpec {
            fields: fields
                .into_iter()
                .map(|(key, description, offset, width)| FieldDescriptor {
                    key,
                    description: description.to_string(),
                    offset,
                    width,
                })
                .collect(),
        }
    }

    /// Returns the descriptors in specification order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }
}

/// One decoded header attribute: the field's key, its description from the
/// specification, and the extracted unsigned little-endian value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardField {
    /// Symbolic key of the field
    pub key: DirectoryFieldKey,
    /// Description carried over from the field specification
    pub description: String,
    /// Extracted value, widened to u32
    pub value: u32,
}

impl fmt::Display for StandardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.value)
    }
}
