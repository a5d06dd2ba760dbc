// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(dead_code)]
#![allow(clippy::too_many_arguments)]
//#![deny(unsafe_code)]
// - 'file/physical.rs' uses mmap to map a file into memory

//! # rsrcscope
//!
//! A cross-platform library for decoding the resource directory tree of PE
//! executables. Built in pure Rust, `rsrcscope` parses the recursive table
//! structure of the `.rsrc` section - headers, entry slots, and subdirectory
//! references - into a fully materialized, immutable tree, without requiring
//! Windows APIs.
//!
//! ## Features
//!
//! - **Efficient memory access** - Memory-mapped file access with minimal allocations
//! - **Complete tree decoding** - One call yields every reachable directory table
//! - **Robust against malformed input** - Reference cycles, over-deep chains, and
//!   out-of-range child addresses are pruned per child, never crash the decode
//! - **Configurable header layout** - Field extraction is driven by runtime
//!   specifications instead of a hard-coded struct
//! - **Decode diagnostics** - Every pruned child is reported with its exact identity
//!
//! ## Quick Start
//!
//! Add `rsrcscope` to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! rsrcscope = "0.1"
//! ```
//!
//! ### Using the Prelude
//!
//! For convenient access to the most commonly used types, import the prelude:
//!
//! ```rust,no_run
//! use rsrcscope::prelude::*;
//!
//! let file = File::from_file("app.exe".as_ref())?;
//! let diagnostics = Diagnostics::new();
//! let root = file.decode_resources(&FieldSpec::standard(), &diagnostics)?;
//!
//! println!("{root}");
//! # Ok::<(), rsrcscope::Error>(())
//! ```
//!
//! ### Decoding a Raw Resource Section
//!
//! The decoders operate on plain byte slices, so a resource section extracted by
//! other means decodes without any PE container:
//!
//! ```rust
//! use rsrcscope::prelude::*;
//!
//! let section = [0u8; 16]; // a single empty table
//! let diagnostics = Diagnostics::new();
//! let root = ResourceDirectoryTable::decode(
//!     &FieldSpec::standard(), &section, 0, 0, &diagnostics,
//! )?;
//!
//! assert!(root.children().is_empty());
//! # Ok::<(), rsrcscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `rsrcscope` is organized into two layers:
//!
//! - [`File`] - the container layer: PE parsing, resource data directory lookup,
//!   RVA-to-offset translation through the section table
//! - [`directory`] - the decoding layer: field specifications, entry slots, the
//!   recursive table decoder, and decode diagnostics
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, Error>`](Result). Fatal errors are reserved for
//! broken input contracts (short headers, missing entry slots, not-a-PE containers);
//! everything recoverable is reported through
//! [`directory::diagnostics::Diagnostics`] instead:
//!
//! ```rust,no_run
//! use rsrcscope::{Error, File};
//!
//! match File::from_file(std::path::Path::new("app.exe")) {
//!     Ok(file) => println!("Resource section at RVA 0x{:x}", file.resource_rva()),
//!     Err(Error::Malformed { message, .. }) => println!("Malformed file: {}", message),
//!     Err(e) => println!("Other error: {}", e),
//! }
//! ```

#[macro_use]
pub(crate) mod error;
pub(crate) mod file;

/// Convenient re-exports of the most commonly used types and traits.
///
/// This module provides a curated selection of the most frequently used types
/// from across the library, allowing for convenient glob imports.
///
/// # Example
///
/// ```rust,no_run
/// use rsrcscope::prelude::*;
///
/// let file = File::from_file("app.exe".as_ref())?;
/// let diagnostics = Diagnostics::new();
/// let root = file.decode_resources(&FieldSpec::standard(), &diagnostics)?;
/// # Ok::<(), rsrcscope::Error>(())
/// ```
pub mod prelude;

/// Decoding of the recursive resource directory structure.
///
/// This module contains the field specifications, entry slot decoding, the recursive
/// table decoder, and the diagnostics container. See [`directory`] for details.
pub mod directory;

pub use crate::error::Error;
pub use crate::file::{Backend, File, Memory, Physical};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
