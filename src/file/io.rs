//! Low-level byte order and safe reading utilities for PE resource parsing.
//!
//! This module provides bounds-checked, little-endian extraction of primitive values from
//! byte buffers. It is the foundational layer for all binary data access in this crate:
//! the directory decoders never index raw slices directly, they go through these helpers
//! so that truncated or adversarial input surfaces as [`crate::Error::OutOfBounds`] instead
//! of a panic.
//!
//! # Key Components
//!
//! - [`crate::file::io::ByteIO`] - Trait defining little-endian conversion for the unsigned
//!   integer types used by the PE resource format
//! - [`crate::file::io::read_le`] - Read a value from the start of a buffer
//! - [`crate::file::io::read_le_at`] - Read a value at a specific offset with auto-advance
//! - [`crate::file::io::read_uint_le`] - Read a variable-width (1-4 byte) unsigned integer,
//!   the primitive behind specification-driven header field extraction
//!
//! # Usage Examples
//!
//! ```rust,ignore
//! use rsrcscope::file::io::{read_le, read_uint_le};
//!
//! let data = [0x01, 0x00, 0x00, 0x00];
//! let value: u32 = read_le(&data)?;
//! assert_eq!(value, 1);
//!
//! // Extract a 2-byte field at offset 2, widened to u32
//! let field = read_uint_le(&data, 2, 2)?;
//! assert_eq!(field, 0);
//! # Ok::<(), rsrcscope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All reading functions return [`crate::Result<T>`] and will return
//! [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer to complete
//! the operation.

use crate::{Error::OutOfBounds, Result};

/// Trait for implementing type-specific safe binary data reading operations.
///
/// This trait provides a unified interface for reading primitive unsigned integers from
/// byte slices in little-endian order, the only byte order the PE resource format uses.
/// Each implementation defines a `Bytes` associated type that represents the fixed-size
/// byte array required for that particular type (e.g., `[u8; 4]` for `u32`).
pub trait ByteIO: Sized {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

impl ByteIO for u8 {
    type Bytes = [u8; 1];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u8::from_le_bytes(bytes)
    }
}

impl ByteIO for u16 {
    type Bytes = [u8; 2];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u16::from_le_bytes(bytes)
    }
}

impl ByteIO for u32 {
    type Bytes = [u8; 4];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u32::from_le_bytes(bytes)
    }
}

impl ByteIO for u64 {
    type Bytes = [u8; 8];

    fn from_le_bytes(bytes: Self::Bytes) -> Self {
        u64::from_le_bytes(bytes)
    }
}

/// Safely reads a value of type `T` in little-endian byte order from a data buffer.
///
/// This function reads from the beginning of the buffer and supports all types that
/// implement the [`crate::file::io::ByteIO`] trait (u8, u16, u32, u64).
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le<T: ByteIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Safely reads a value of type `T` in little-endian byte order at a specific offset.
///
/// This function reads from the specified offset and automatically advances the offset
/// by the number of bytes read.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Mutable reference to the offset position (will be advanced after reading)
///
/// # Errors
///
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes.
pub fn read_le_at<T: ByteIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    if (type_len + *offset) > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..*offset + type_len].try_into() else {
        return Err(OutOfBounds);
    };

    *offset += type_len;

    Ok(T::from_le_bytes(read))
}

/// Reads a variable-width unsigned little-endian integer, widened to `u32`.
///
/// This is the extraction primitive behind specification-driven header decoding: a field
/// specification names a byte offset and a width of 1 to 4 bytes, and this function pulls
/// the value out of the raw record without any compile-time struct layout.
///
/// # Arguments
///
/// * `data` - The byte buffer to read from
/// * `offset` - Byte offset of the field within `data`
/// * `width` - Field width in bytes, must be in `1..=4`
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] for a width outside `1..=4`, or
/// [`crate::Error::OutOfBounds`] if the field extends past the end of `data`.
pub fn read_uint_le(data: &[u8], offset: usize, width: usize) -> Result<u32> {
    if width == 0 || width > 4 {
        return Err(malformed_error!(
            "Field width {} outside the supported 1-4 byte range",
            width
        ));
    }

    let Some(end) = offset.checked_add(width) else {
        return Err(OutOfBounds);
    };
    if end > data.len() {
        return Err(OutOfBounds);
    }

    let mut value = 0_u32;
    for (index, byte) in data[offset..end].iter().enumerate() {
        value |= u32::from(*byte) << (8 * index);
    }

    Ok(value)
}
