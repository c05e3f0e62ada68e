//! Centralized registry of diagnostic error codes used throughout hydrenv.
//!
//! These constants document all error codes used in `#[diagnostic(code(...))]`
//! attributes. While Rust's proc-macro system requires literal strings in
//! attributes, this module provides a single source of truth for:
//!
//! - Error code documentation
//! - Programmatic error code matching
//!
//! # Error Code Format
//!
//! All codes follow the pattern `hydrenv::<category>`:
//!
//! | Code | Description |
//! |------|-------------|
//! | `hydrenv::invalid_utf8` | Environment variable contains non-UTF8 bytes |
//! | `hydrenv::env::value_error` | Environment value failed to convert |
//! | `hydrenv::file::*` | File-related errors |
//! | `hydrenv::dotenv::parse_error` | Malformed dotenv syntax |
//! | `hydrenv::coerce::*` | Per-field conversion failures |
//!
//! # Example
//!
//! ```rust,ignore
//! use hydrenv::diagnostic_codes;
//! use miette::Diagnostic;
//!
//! if error.code().map(|c| c.to_string()).as_deref() == Some(diagnostic_codes::FILE_NOT_FOUND) {
//!     println!("configuration file is missing");
//! }
//! ```

/// Environment variable contains invalid UTF-8.
pub const INVALID_UTF8: &str = "hydrenv::invalid_utf8";

/// An environment value could not be assigned.
pub const ENV_VALUE_ERROR: &str = "hydrenv::env::value_error";

/// Configuration file not found.
pub const FILE_NOT_FOUND: &str = "hydrenv::file::not_found";

/// Configuration file could not be read.
pub const FILE_READ_ERROR: &str = "hydrenv::file::read_error";

/// A file value could not be assigned.
pub const FILE_VALUE_ERROR: &str = "hydrenv::file::value_error";

/// dotenv file syntax error.
#[cfg(feature = "dotenv")]
pub const DOTENV_PARSE_ERROR: &str = "hydrenv::dotenv::parse_error";

/// Value outside the boolean vocabulary.
pub const INVALID_BOOL: &str = "hydrenv::coerce::invalid_bool";

/// Value is not an integer that fits the field.
pub const INVALID_INTEGER: &str = "hydrenv::coerce::invalid_integer";

/// Value for a non-byte `Vec` field.
pub const UNSUPPORTED_SEQUENCE: &str = "hydrenv::coerce::unsupported_sequence";

/// Value for a field of unsupported type in strict mode.
pub const UNSUPPORTED_TYPE: &str = "hydrenv::coerce::unsupported_type";
