//! Resource directory tree decoding.
//!
//! This module implements the recursive, byte-precise decoding of the PE resource
//! directory format: tables of a fixed 16-byte header followed by 8-byte entry slots,
//! where slots may reference child tables elsewhere in the same resource section.
//! Decoding is eager - one call produces a complete, immutable tree - and lenient at
//! child granularity: references that cannot be resolved are pruned with a diagnostic
//! record while the rest of the tree decodes normally.
//!
//! # Architecture
//!
//! - [`fieldspec`] - runtime field specifications driving header extraction
//! - [`entry`] - decoding of individual 8-byte entry slots
//! - [`table`] - the recursive table decoder and the resulting tree type
//! - [`diagnostics`] - append-only collection of pruned-child records
//!
//! The decoders operate on plain byte slices and know nothing about PE containers;
//! [`crate::File`] performs the container-level work of locating the resource section.

pub mod diagnostics;
pub mod entry;
pub mod fieldspec;
pub mod table;
