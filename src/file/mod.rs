//! PE container loading and resource section location.
//!
//! This module is the external collaborator of the directory decoders: it loads a PE
//! executable from disk or memory, validates that a resource data directory is present,
//! and translates that directory's RVA through the section table into a byte range of the
//! underlying file. The decoders in [`crate::directory`] never see the container - they
//! receive the resource section bytes plus the RVA at which those bytes begin.
//!
//! # Architecture
//!
//! Data access is abstracted behind the [`Backend`] trait with two implementations:
//!
//! - [`Physical`] - memory-mapped file access via `memmap2`
//! - [`Memory`] - plain `Vec<u8>` buffers, for already-loaded or synthetic data
//!
//! [`File`] resolves the resource data directory eagerly at load time and stores plain
//! offsets, so no parsed PE state has to outlive the constructor.
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use rsrcscope::{directory::fieldspec::FieldSpec, directory::diagnostics::Diagnostics, File};
//! use std::path::Path;
//!
//! let file = File::from_file(Path::new("app.exe"))?;
//! println!("Resource section: {} bytes at RVA 0x{:x}",
//!          file.resource_section().len(), file.resource_rva());
//!
//! let diagnostics = Diagnostics::new();
//! let root = file.decode_resources(&FieldSpec::standard(), &diagnostics)?;
//! println!("{} top-level entries", root.entries().len());
//! # Ok::<(), rsrcscope::Error>(())
//! ```

pub(crate) mod io;
mod memory;
mod physical;

pub use memory::Memory;
pub use physical::Physical;

use std::path::Path;

use goblin::pe::{data_directories::DataDirectoryType, section_table::SectionTable, PE};

use crate::{
    directory::{diagnostics::Diagnostics, fieldspec::FieldSpec, table::ResourceDirectoryTable},
    Error::Empty,
    Result,
};

/// Abstraction over the data source a PE file is read from.
///
/// Both backends provide bounds-checked slice access over an immutable byte region;
/// all higher layers are written against this trait rather than a concrete source.
pub trait Backend {
    /// Returns a slice of the underlying data, bounds-checked.
    ///
    /// # Arguments
    /// * `offset` - The offset to start the slice from
    /// * `len` - The length of the slice
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the requested range is out of bounds.
    fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]>;

    /// Returns the complete underlying data.
    fn data(&self) -> &[u8];

    /// Returns the total length of the underlying data in bytes.
    fn len(&self) -> usize;
}

/// A loaded PE executable with its resource section located.
///
/// `File` performs the container-level work that the resource directory decoders treat
/// as out of scope: parsing the PE headers with goblin, finding the resource data
/// directory, and mapping its RVA to a file offset through the section table. Once
/// constructed, it hands out the resource section as a plain byte slice addressed so
/// that index 0 corresponds to the section's base RVA.
///
/// # Examples
///
/// ```rust,no_run
/// use rsrcscope::File;
/// use std::path::Path;
///
/// let file = File::from_file(Path::new("app.exe"))?;
/// let section = file.resource_section();
/// println!("Resource section starts with {:02x?}", &section[..4.min(section.len())]);
/// # Ok::<(), rsrcscope::Error>(())
/// ```
pub struct File {
    /// The underlying data source (memory or file).
    data: Box<dyn Backend>,
    /// File offset of the resource section content.
    resource_offset: usize,
    /// RVA at which the resource section begins.
    resource_rva: u32,
    /// Size of the resource section content, clamped to the file's end.
    resource_size: usize,
}

impl File {
    /// Loads a PE file from the given path.
    ///
    /// The file is memory-mapped for efficient access and must contain a resource
    /// data directory.
    ///
    /// # Arguments
    ///
    /// * `file` - Path to the PE file on disk.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file cannot be read or opened
    /// - The file is not a valid PE format
    /// - The PE file does not contain a resource data directory
    /// - The file is empty
    pub fn from_file(file: &Path) -> Result<File> {
        let input = Physical::new(file)?;

        Self::load(input)
    }

    /// Loads a PE file from a memory buffer.
    ///
    /// Useful when working with embedded or downloaded files, and for crafted
    /// buffers in tests.
    ///
    /// # Arguments
    ///
    /// * `data` - The bytes of the PE file.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, the data is not a valid PE format,
    /// or the PE file does not contain a resource data directory.
    pub fn from_mem(data: Vec<u8>) -> Result<File> {
        let input = Memory::new(data);

        Self::load(input)
    }

    /// Internal loader for any backend.
    ///
    /// # Arguments
    ///
    /// * `data` - The backend providing the PE data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is empty, not a valid PE, or missing a resource
    /// data directory.
    fn load<T: Backend + 'static>(data: T) -> Result<File> {
        if data.len() == 0 {
            return Err(Empty);
        }

        let (resource_rva, resource_size, resource_offset) = {
            let pe = PE::parse(data.data())?;

            let Some(optional_header) = pe.header.optional_header else {
                return Err(malformed_error!("File does not have an OptionalHeader"));
            };

            let Some((rva, size)) = optional_header
                .data_directories
                .dirs()
                .find(|(directory_type, directory)| {
                    *directory_type == DataDirectoryType::ResourceTable
                        && directory.virtual_address != 0
                        && directory.size != 0
                })
                .map(|(_, directory)| (directory.virtual_address, directory.size))
            else {
                return Err(malformed_error!(
                    "File does not have a resource directory"
                ));
            };

            let offset = rva_to_offset(&pe.sections, rva)?;
            if offset >= data.len() {
                return Err(malformed_error!(
                    "Resource section offset {} is beyond the end of the file",
                    offset
                ));
            }

            // The declared directory size may overshoot the raw data present in the
            // file; clamp so the exposed slice always stays in bounds.
            let size = std::cmp::min(size as usize, data.len() - offset);

            (rva, size, offset)
        };

        Ok(File {
            data: Box::new(data),
            resource_offset,
            resource_rva,
            resource_size,
        })
    }

    /// Returns the total size of the loaded file in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the file has a length of zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the complete raw data of the loaded file.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.data.data()
    }

    /// Returns a slice of the file's raw data, bounds-checked.
    ///
    /// # Arguments
    ///
    /// * `offset` - The offset to start the slice from.
    /// * `len` - The length of the slice.
    ///
    /// # Errors
    ///
    /// Returns an error if the requested range is out of bounds.
    pub fn data_slice(&self, offset: usize, len: usize) -> Result<&[u8]> {
        self.data.data_slice(offset, len)
    }

    /// Returns the RVA at which the resource section begins.
    #[must_use]
    pub fn resource_rva(&self) -> u32 {
        self.resource_rva
    }

    /// Returns the resource section's content.
    ///
    /// The slice is addressed so that index 0 corresponds to the start of the
    /// resource section; all relative addresses stored inside the resource
    /// directory tree are relative to this slice's start.
    #[must_use]
    pub fn resource_section(&self) -> &[u8] {
        // Bounds verified during load.
        &self.data.data()[self.resource_offset..self.resource_offset + self.resource_size]
    }

    /// Decodes the complete resource directory tree rooted at the section's first table.
    ///
    /// This is the high-level entry point tying the container layer to the decoders:
    /// the root table is decoded at relative address 0 with id 0, and every reachable
    /// child table is decoded depth-first.
    ///
    /// # Arguments
    ///
    /// * `spec` - The field specification describing the 16-byte header layout.
    /// * `diagnostics` - Collector for recoverable per-child decoding failures.
    ///
    /// # Errors
    ///
    /// Returns an error if the root table (or any reachable table whose buffer slicing
    /// succeeded) declares entries its buffer cannot hold.
    pub fn decode_resources(
        &self,
        spec: &FieldSpec,
        diagnostics: &Diagnostics,
    ) -> Result<ResourceDirectoryTable> {
        ResourceDirectoryTable::decode(spec, self.resource_section(), 0, 0, diagnostics)
    }
}

/// Converts a relative virtual address to a file offset through the section table.
///
/// # Errors
///
/// Returns an error if the RVA falls outside every section or a section's bounds
/// overflow.
fn rva_to_offset(sections: &[SectionTable], rva: u32) -> Result<usize> {
    for section in sections {
        let Some(section_max) = section.virtual_address.checked_add(section.virtual_size) else {
            return Err(malformed_error!(
                "Section malformed, causing integer overflow - {} + {}",
                section.virtual_address,
                section.virtual_size
            ));
        };

        if section.virtual_address <= rva && rva < section_max {
            return Ok(
                (rva - section.virtual_address) as usize + section.pointer_to_raw_data as usize
            );
        }
    }

    Err(malformed_error!(
        "RVA could not be converted to offset - {}",
        rva
    ))
}
