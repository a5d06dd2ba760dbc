use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// This enum covers the failure modes of resource directory decoding: fatal structural errors
/// (a buffer too small for the fixed header or a declared entry slot), caller contract
/// violations (a field specification with an unknown key), and the I/O and container-format
/// errors of the PE loading layer.
///
/// # Error Categories
///
/// ## Decoding Errors
/// - [`Error::OutOfBounds`] - Attempted to read beyond the buffer's end
/// - [`Error::Malformed`] - Corrupted or invalid structure
/// - [`Error::Empty`] - Empty input provided
///
/// ## Contract Violations
/// - [`Error::UnknownField`] - A field specification key outside the expected symbolic set
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::GoblinErr`] - PE parsing errors from the goblin crate
///
/// # Examples
///
/// ```rust,no_run
/// use rsrcscope::{Error, File};
/// use std::path::Path;
///
/// match File::from_file(Path::new("app.exe")) {
///     Ok(file) => {
///         println!("Resource section at RVA 0x{:x}", file.resource_rva());
///     }
///     Err(Error::Malformed { message, file, line }) => {
///         eprintln!("Malformed file: {} ({}:{})", message, file, line);
///     }
///     Err(Error::FileError(io_err)) => {
///         eprintln!("I/O error: {}", io_err);
///     }
///     Err(e) => {
///         eprintln!("Other error: {}", e);
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The file is damaged and could not be parsed.
    ///
    /// This error indicates that the structure is corrupted or doesn't conform
    /// to the PE resource format. The error includes the source location where
    /// the malformation was detected for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding.
    ///
    /// This error occurs when a fixed header record or a declared entry slot
    /// extends beyond the end of the supplied buffer. For a directory table it
    /// is fatal for that node: the input contract requires the buffer to cover
    /// the 16-byte header and every declared 8-byte entry slot.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// Provided input was empty.
    ///
    /// This error occurs when an empty file or buffer is provided where
    /// actual PE data was expected.
    #[error("Provided input was empty")]
    Empty,

    /// A field specification key outside the expected symbolic key set.
    ///
    /// Field specifications are caller-supplied configuration; an unrecognized
    /// key indicates a broken specification rather than malformed binary data,
    /// so it is surfaced immediately when the specification is constructed.
    #[error("Unrecognized field specification key - {0}")]
    UnknownField(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur during file operations
    /// such as reading from disk, permission issues, or filesystem errors.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error from the goblin crate during PE parsing.
    ///
    /// The goblin crate is used for low-level PE container parsing.
    /// This error wraps any failures from that parsing layer.
    #[error("{0}")]
    GoblinErr(#[from] goblin::error::Error),
}
