//! # hydrenv
//!
//! Hydrate configuration structs in place from environment variables and
//! `key=value` files.
//!
//! `#[derive(Hydrate)]` builds a field table for a struct at compile time.
//! At runtime each source (the process environment, a file, an environment
//! snapshot) is applied to an existing value: fields with a matching key are
//! converted and overwritten, every other field is left alone. Applying
//! sources one after another therefore layers them, with later sources
//! winning and the starting value acting as defaults.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hydrenv::Hydrate;
//!
//! #[derive(Default, Hydrate)]
//! struct Config {
//!     #[env(key = "DATABASE_URL")]
//!     db_url: String,
//!
//!     #[env(key = "PORT")]
//!     port: u16,
//!
//!     #[env(key = "API_KEY", secret)]
//!     api_key: String,
//!
//!     // looked up as `verbose`
//!     verbose: bool,
//! }
//!
//! fn main() -> Result<(), hydrenv::Error> {
//!     let mut config = Config::from_files(["config/base.env", "config/local.env"])?;
//!     config.apply_env()?;
//!
//!     println!("Server running on port {}", config.port);
//!     Ok(())
//! }
//! ```
//!
//! ## Field Attributes
//!
//! | Attribute | Description |
//! |-----------|-------------|
//! | `key = "NAME"` | Key to look up; defaults to the field name |
//! | `secret` | Masks the raw value in error messages |
//!
//! ## Field Types
//!
//! | Type | Accepted values |
//! |------|-----------------|
//! | `String` | anything, verbatim |
//! | `bool` | `true t yes 1 on` / empty `false f no 0 off`, any case |
//! | `i8`..`i64`, `isize` | base-10 integers |
//! | `u8`..`u64`, `usize` | base-10 integers; negatives wrap to two's complement |
//! | `Vec<u8>` | the raw UTF-8 bytes |
//! | `Vec<T>` | rejected whenever a value arrives |
//! | anything else | skipped (rejected by [`Loader::strict`]) |
//!
//! ## Layered Loading
//!
//! [`Loader`] applies any mix of sources in order and reports where each
//! field came from:
//!
//! ```rust,ignore
//! let (config, sources) = hydrenv::Loader::new()
//!     .file("config/base.env")
//!     .file_optional("config/local.env")
//!     .env()
//!     .load_with_sources::<Config>()?;
//!
//! println!("{sources}");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|---------|
//! | `dotenv` | [`Loader::dotenv_file`] via `dotenvy` | Yes |
//! | `tracing` | `tracing` events for applied sources and fields | No |
//!
//! ## Error Handling
//!
//! All errors are reported through the [`Error`] type, which integrates with
//! [`miette`] for rich terminal diagnostics. The first failure aborts the
//! call; fields written before it keep their new values.
//!
//! ```rust,ignore
//! if let Err(e) = config.apply_env() {
//!     eprintln!("{:?}", miette::Report::from(e));
//! }
//! ```

// Lets the derive's `::hydrenv::` paths resolve inside this crate's own tests.
extern crate self as hydrenv;

macro_rules! debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
    };
}

macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
    };
}

mod apply;
pub mod coerce;
pub mod diagnostic_codes;
pub mod env;
mod field;
pub mod file;
mod loader;
mod template;

pub use hydrenv_macro::Hydrate;

pub use coerce::{CoerceError, IntegerError, RawValue, SignedSlot, UnsignedSlot};
pub use env::{Environment, ProcessEnv};
pub use field::{Field, FieldDescriptor, FieldKind, FieldMut, Hydrate};
pub use loader::Loader;
pub use template::env_example;

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};

/// Errors that can occur while hydrating a struct.
///
/// Value errors carry the name of the struct being populated and, for
/// files, the path, line and a labelled span of the offending value.
///
/// # Example
///
/// ```rust,ignore
/// match config.apply_files(["app.env"]) {
///     Ok(()) => {}
///     Err(Error::NotFound { path }) => {
///         eprintln!("missing {}", path.display());
///     }
///     Err(Error::File { line, source, .. }) => {
///         eprintln!("line {line:?}: {source}");
///     }
///     Err(e) => {
///         eprintln!("{:?}", miette::Report::from(e));
///     }
/// }
/// ```
///
/// # Diagnostic Codes
///
/// | Code | Meaning |
/// |------|---------|
/// | `hydrenv::invalid_utf8` | Variable contains non-UTF8 bytes |
/// | `hydrenv::file::not_found` | Required file does not exist |
/// | `hydrenv::file::read_error` | File could not be read as UTF-8 text |
/// | `hydrenv::dotenv::parse_error` | Malformed dotenv syntax |
/// | `hydrenv::env::value_error` | Environment value failed to convert |
/// | `hydrenv::file::value_error` | File value failed to convert |
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum Error {
    /// An environment variable is set but not valid Unicode.
    #[error("environment variable {var} contains invalid UTF-8")]
    #[diagnostic(
        code(hydrenv::invalid_utf8),
        help("ensure the variable contains valid UTF-8 text")
    )]
    InvalidUtf8 {
        /// The variable name.
        var: String,
    },

    /// A required file does not exist.
    #[error("configuration file not found: {}", .path.display())]
    #[diagnostic(
        code(hydrenv::file::not_found),
        help("ensure the file exists at the specified path")
    )]
    NotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// A file exists but could not be read as UTF-8 text.
    #[error("failed to read configuration file: {}", .path.display())]
    #[diagnostic(
        code(hydrenv::file::read_error),
        help("check file permissions and ensure it's readable UTF-8 text")
    )]
    Read {
        /// Path to the file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A dotenv file is syntactically invalid.
    #[cfg(feature = "dotenv")]
    #[error("invalid dotenv syntax in {}", .path.display())]
    #[diagnostic(
        code(hydrenv::dotenv::parse_error),
        help("check for unbalanced quotes or malformed lines")
    )]
    Dotenv {
        /// Path to the file.
        path: PathBuf,
        /// The parser error.
        #[source]
        source: dotenvy::Error,
    },

    /// An environment value could not be assigned.
    #[error("applying environment to `{target}`")]
    #[diagnostic(code(hydrenv::env::value_error))]
    Env {
        /// The struct being populated.
        target: &'static str,
        /// The field-level failure.
        #[diagnostic_source]
        source: CoerceError,
    },

    /// A file value could not be assigned.
    #[error("applying {} to `{target}`", .path.display())]
    #[diagnostic(code(hydrenv::file::value_error))]
    File {
        /// The struct being populated.
        target: &'static str,
        /// Path to the file.
        path: PathBuf,
        /// 1-based line of the offending pair, when known.
        line: Option<usize>,
        /// The file content for display.
        #[source_code]
        src: NamedSource<String>,
        /// The offending value, when its position is known and it may be shown.
        #[label("{label}")]
        span: Option<SourceSpan>,
        /// Label text; never contains the value.
        label: String,
        /// The field-level failure.
        #[diagnostic_source]
        source: CoerceError,
    },
}

impl Error {
    /// The field-level failure behind a value error.
    pub fn coerce_error(&self) -> Option<&CoerceError> {
        match self {
            Error::Env { source, .. } | Error::File { source, .. } => Some(source),
            _ => None,
        }
    }

    /// The file involved, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::NotFound { path } | Error::Read { path, .. } | Error::File { path, .. } => {
                Some(path)
            }
            #[cfg(feature = "dotenv")]
            Error::Dotenv { path, .. } => Some(path),
            _ => None,
        }
    }
}

// ============================================================================
// Source Attribution
// ============================================================================

/// Where a field's value came from.
///
/// # Example
///
/// ```rust,ignore
/// let (config, sources) = Loader::new().file("app.env").env().load_with_sources::<Config>()?;
///
/// for (field, source) in sources.iter() {
///     match &source.source {
///         Source::Environment => println!("{field}: from env"),
///         Source::File(path) => println!("{field}: from {}", path.display()),
///         Source::NotSet => println!("{field}: default"),
///         _ => {}
///     }
/// }
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Source {
    /// Read from an environment (the process table or a snapshot).
    Environment,

    /// Read from a plain `key=value` file.
    File(PathBuf),

    /// Read from a dotenv-syntax file.
    DotenvFile(PathBuf),

    /// No source provided a value; the field kept what it held before.
    NotSet,
}

impl Display for Source {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Source::Environment => write!(f, "Environment variable"),

            Source::File(path) => write!(f, "File ({})", path.display()),

            Source::DotenvFile(path) => write!(f, ".env file ({})", path.display()),

            Source::NotSet => write!(f, "Not set"),
        }
    }
}

/// Source information for a single field: the key it was looked up by and
/// where the value came from.
#[derive(Clone, Debug)]
pub struct ValueSource {
    /// The effective key (e.g. `"DATABASE_URL"`).
    pub var_name: String,

    /// Where the value originated from.
    pub source: Source,
}

impl ValueSource {
    pub fn new(var_name: impl Into<String>, source: Source) -> Self {
        Self {
            var_name: var_name.into(),
            source,
        }
    }
}

impl Display for ValueSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.var_name, self.source)
    }
}

/// Source attribution for every field of a struct, in declaration order.
///
/// Returned by [`Loader::apply`] and [`Loader::load_with_sources`]. Each
/// field names the last source that wrote it.
///
/// # Display Output
///
/// ```text
/// Configuration Source:
/// --------------------------------------------------
///   db_url  <- Environment variable [DATABASE_URL]
///   port    <- File (config/base.env) [PORT]
///   verbose <- Not set [verbose]
/// ```
#[derive(Clone, Debug, Default)]
pub struct ConfigSources {
    entries: Vec<(String, ValueSource)>,
}

impl ConfigSources {
    /// Creates a new empty `ConfigSources` collection.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// One [`Source::NotSet`] entry per field of `T`.
    pub fn for_target<T: Hydrate>() -> Self {
        Self {
            entries: T::descriptors()
                .into_iter()
                .map(|d| {
                    (
                        d.name.to_string(),
                        ValueSource::new(d.effective_key(), Source::NotSet),
                    )
                })
                .collect(),
        }
    }

    /// Appends an entry for a field.
    pub fn add(&mut self, field_name: impl Into<String>, source: ValueSource) {
        self.entries.push((field_name.into(), source));
    }

    /// Replaces the entry for a field, appending one if it has none.
    pub fn record(&mut self, field_name: &str, source: ValueSource) {
        match self.entries.iter_mut().find(|(name, _)| name == field_name) {
            Some((_, existing)) => *existing = source,
            None => self.add(field_name, source),
        }
    }

    /// Returns all entries as a slice.
    pub fn entries(&self) -> &[(String, ValueSource)] {
        &self.entries
    }

    /// Looks up the source for a specific field by name.
    pub fn get(&self, field_name: &str) -> Option<&ValueSource> {
        self.entries
            .iter()
            .find(|(name, _)| name == field_name)
            .map(|(_, source)| source)
    }

    /// Returns an iterator over field names and their sources.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValueSource)> {
        self.entries
            .iter()
            .map(|(name, source)| (name.as_str(), source))
    }
}

impl Display for ConfigSources {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration Source:")?;
        writeln!(f, "{}", "-".repeat(50))?;

        let max_len = self
            .entries
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        for (field_name, source) in &self.entries {
            writeln!(
                f,
                "  {:<width$}  <- {} [{}]",
                field_name,
                source.source,
                source.var_name,
                width = max_len,
            )?;
        }

        Ok(())
    }
}

// ============================================================================
// Entry Points
// ============================================================================

/// Populate `target` from the process environment.
///
/// Each field's effective key is looked up; set, non-empty variables are
/// converted and assigned. Other fields are untouched.
///
/// # Errors
///
/// [`Error::InvalidUtf8`] or [`Error::Env`]; the first failure stops the call.
pub fn apply_env<T: Hydrate>(target: &mut T) -> Result<(), Error> {
    Loader::new().env().apply(target).map(|_| ())
}

/// Populate `target` from an environment snapshot instead of the process table.
///
/// # Errors
///
/// Same as [`apply_env`].
pub fn apply_env_from<T: Hydrate, E: Environment>(target: &mut T, env: &E) -> Result<(), Error> {
    Loader::new().env_from(env).apply(target).map(|_| ())
}

/// Apply plain `key=value` files to `target`, in order.
///
/// Within a file, pairs apply top to bottom; later files override earlier
/// ones. Every file is required.
///
/// # Errors
///
/// [`Error::NotFound`], [`Error::Read`] or [`Error::File`]; the first failure
/// stops the call, leaving later lines and files unapplied.
pub fn apply_files<T, I, P>(target: &mut T, paths: I) -> Result<(), Error>
where
    T: Hydrate,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    file_loader(paths).apply(target).map(|_| ())
}

/// Build `T::default()` and populate it from the process environment.
///
/// # Errors
///
/// Same as [`apply_env`].
pub fn from_env<T: Hydrate + Default>() -> Result<T, Error> {
    Loader::new().env().load()
}

/// Build `T::default()` and apply plain `key=value` files to it.
///
/// # Errors
///
/// Same as [`apply_files`].
pub fn from_files<T, I, P>(paths: I) -> Result<T, Error>
where
    T: Hydrate + Default,
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    file_loader(paths).load()
}

fn file_loader<'a, I, P>(paths: I) -> Loader<'a>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    paths
        .into_iter()
        .fold(Loader::new(), |loader, path| loader.file(path))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Environment.to_string(), "Environment variable");
        assert_eq!(Source::NotSet.to_string(), "Not set");
        assert_eq!(
            Source::File(PathBuf::from("app.env")).to_string(),
            "File (app.env)"
        );
        assert_eq!(
            Source::DotenvFile(PathBuf::from(".env.local")).to_string(),
            ".env file (.env.local)"
        );
    }

    #[test]
    fn test_value_source_display() {
        let vs = ValueSource::new("PORT", Source::NotSet);
        assert_eq!(vs.to_string(), "PORT: Not set");
    }

    #[test]
    fn test_config_sources_record_replaces() {
        let mut sources = ConfigSources::new();
        sources.record("port", ValueSource::new("PORT", Source::NotSet));
        sources.record("port", ValueSource::new("PORT", Source::Environment));

        assert_eq!(sources.entries().len(), 1);
        assert_eq!(sources.get("port").unwrap().source, Source::Environment);
        assert!(sources.get("nonexistent").is_none());
    }

    #[test]
    fn test_config_sources_for_target() {
        #[allow(dead_code)]
        #[derive(Default, crate::Hydrate)]
        struct Config {
            #[env(key = "DATABASE_URL")]
            db_url: String,
            port: u16,
        }

        let sources = ConfigSources::for_target::<Config>();
        let entries: Vec<_> = sources
            .iter()
            .map(|(name, vs)| (name, vs.var_name.as_str(), vs.source.clone()))
            .collect();

        assert_eq!(
            entries,
            [
                ("db_url", "DATABASE_URL", Source::NotSet),
                ("port", "port", Source::NotSet),
            ]
        );
    }

    #[test]
    fn test_config_sources_display() {
        let mut sources = ConfigSources::new();
        sources.add("db_url", ValueSource::new("DATABASE_URL", Source::Environment));
        sources.add(
            "port",
            ValueSource::new("PORT", Source::File(PathBuf::from("base.env"))),
        );

        let display = sources.to_string();
        assert!(display.starts_with("Configuration Source:\n"));
        assert!(display.contains("  db_url  <- Environment variable [DATABASE_URL]"));
        assert!(display.contains("  port    <- File (base.env) [PORT]"));
    }

    #[test]
    fn test_error_codes() {
        let code = |e: &Error| e.code().map(|c| c.to_string());

        let not_found = Error::NotFound {
            path: PathBuf::from("x.env"),
        };
        assert_eq!(
            code(&not_found).as_deref(),
            Some(diagnostic_codes::FILE_NOT_FOUND)
        );
        assert_eq!(not_found.path(), Some(Path::new("x.env")));

        let utf8 = Error::InvalidUtf8 { var: "V".into() };
        assert_eq!(code(&utf8).as_deref(), Some(diagnostic_codes::INVALID_UTF8));
        assert!(utf8.path().is_none());

        let env = Error::Env {
            target: "Config",
            source: CoerceError::Unsupported {
                field: "ratio",
                type_name: "f64",
            },
        };
        assert_eq!(code(&env).as_deref(), Some(diagnostic_codes::ENV_VALUE_ERROR));
        assert_eq!(env.coerce_error().map(CoerceError::field), Some("ratio"));
        assert_eq!(env.to_string(), "applying environment to `Config`");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let env = Error::Env {
            target: "Config",
            source: CoerceError::Unsupported {
                field: "ratio",
                type_name: "f64",
            },
        };

        let cause = env.source().unwrap().to_string();
        assert_eq!(cause, "field `ratio` has unsupported type `f64`");
    }
}
