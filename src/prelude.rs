//! # rsrcscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types from the
//! library. Import this module to get quick access to the essential types for resource
//! directory decoding.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all operations
pub use crate::Error;

/// The result type used throughout the crate
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// PE container loading and resource section location
pub use crate::File;

/// Data source backends for loaded files
pub use crate::{Backend, Memory, Physical};

// ================================================================================================
// Directory Decoding
// ================================================================================================

/// The recursive directory tree decoder and its constants
pub use crate::directory::table::{ResourceDirectoryTable, HEADER_SIZE, MAX_DEPTH};

/// Individual 8-byte entry slots
pub use crate::directory::entry::{EntryTarget, ResourceDirectoryEntry, ENTRY_SIZE};

/// Runtime field specifications for header extraction
pub use crate::directory::fieldspec::{
    DirectoryFieldKey, FieldDescriptor, FieldSpec, StandardField,
};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Decode diagnostics collection
pub use crate::directory::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};
