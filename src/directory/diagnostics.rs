//! Diagnostics collection for resource tree decoding.
//!
//! This module provides types for collecting and reporting diagnostic messages during
//! decoding. The decoder is lenient at the granularity of a table's children: a
//! subdirectory reference that resolves to an out-of-range byte range, revisits an
//! already-decoded offset, or exceeds the recursion depth cap prunes that single child
//! while sibling decoding continues. Each pruned child is reported here rather than
//! aborting the decode.
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for lock-free append operations, so
//! it can be shared by plain reference across the recursive walk (and across threads,
//! should sibling subtrees ever be decoded in parallel).
//!
//! # Usage Examples
//!
//! ```rust
//! use rsrcscope::directory::diagnostics::{DiagnosticCategory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//!
//! diagnostics.warning(
//!     DiagnosticCategory::Child,
//!     "Subdirectory address 0x9000 is beyond the resource section",
//! );
//!
//! if diagnostics.has_any() {
//!     for entry in diagnostics.iter() {
//!         println!("[{:?}] {}: {}", entry.severity, entry.category, entry.message);
//!     }
//! }
//! ```

use std::fmt;

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Informational message, no action needed
    Info,
    /// Something unexpected that decoding recovered from
    Warning,
    /// A failure that pruned part of the output
    Error,
}

/// The part of the decoding pipeline a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    /// Header field extraction of a directory table
    Header,
    /// Decoding of an individual 8-byte entry slot
    Entry,
    /// Resolution of a subdirectory reference to a child table
    Child,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::Header => write!(f, "header"),
            DiagnosticCategory::Entry => write!(f, "entry"),
            DiagnosticCategory::Child => write!(f, "child"),
        }
    }
}

/// A single diagnostic entry with severity, category, and message.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// How serious the reported condition is
    pub severity: DiagnosticSeverity,
    /// Which part of decoding reported it
    pub category: DiagnosticCategory,
    /// Human-readable description, including the offending entry's identity
    pub message: String,
}

/// Thread-safe, append-only container for diagnostic entries.
///
/// Decoding functions take this by shared reference and push entries as they prune
/// children; the caller inspects the collected entries afterwards.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates a new, empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Diagnostics {
            entries: boxcar::Vec::new(),
        }
    }

    /// Records an informational diagnostic.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: DiagnosticSeverity::Info,
            category,
            message: message.into(),
        });
    }

    /// Records a warning diagnostic.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: DiagnosticSeverity::Warning,
            category,
            message: message.into(),
        });
    }

    /// Records an error diagnostic.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic {
            severity: DiagnosticSeverity::Error,
            category,
            message: message.into(),
        });
    }

    /// Appends a pre-constructed diagnostic entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns `true` if any diagnostics were collected.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns `true` if any warning-level diagnostics were collected.
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        self.iter()
            .any(|d| d.severity == DiagnosticSeverity::Warning)
    }

    /// Returns `true` if any error-level diagnostics were collected.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.iter().any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns the number of collected diagnostics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Iterates over all collected diagnostics in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, diagnostic)| diagnostic)
    }
}
