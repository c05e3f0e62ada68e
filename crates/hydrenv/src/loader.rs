//! Layered loading.

use std::path::{Path, PathBuf};

use miette::{NamedSource, SourceSpan};

use crate::apply::{apply_environment, apply_pair};
use crate::coerce::CoerceError;
use crate::env::{Environment, ProcessEnv};
use crate::field::{FieldDescriptor, Hydrate};
use crate::file::{self, Pair};
use crate::{ConfigSources, Error, Source, ValueSource};

/// One source in the layering order.
enum Layer<'a> {
    /// Environment lookup; `None` is the live process environment.
    Env(Option<&'a dyn Environment>),

    /// Plain `key=value` file.
    File { path: PathBuf, required: bool },

    /// dotenv-syntax file.
    #[cfg(feature = "dotenv")]
    Dotenv { path: PathBuf, required: bool },
}

/// Builder for applying several sources to one target, in order.
///
/// Every source mutates the target in place and never resets a field it has
/// no value for, so later sources override earlier ones per field and
/// whatever the target held beforehand acts as the defaults.
///
/// # Layering Order
///
/// Sources are applied in exactly the order they were added. The usual
/// arrangement is files first, environment last:
///
/// ```rust,ignore
/// use hydrenv::Loader;
///
/// let sources = Loader::new()
///     .file("config/base.env")
///     .file_optional("config/local.env")
///     .env()
///     .apply(&mut config)?;
///
/// println!("{sources}");
/// ```
///
/// # Failure
///
/// The first error aborts the whole call. Fields written by earlier sources
/// (and earlier lines of the failing file) keep their new values.
#[derive(Default)]
pub struct Loader<'a> {
    layers: Vec<Layer<'a>>,
    strict: bool,
}

impl<'a> Loader<'a> {
    /// Creates a loader with no sources.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the process environment as the next source.
    #[must_use]
    pub fn env(mut self) -> Self {
        self.layers.push(Layer::Env(None));

        self
    }

    /// Adds an environment snapshot as the next source.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let vars = HashMap::from([("PORT".to_string(), "8080".to_string())]);
    /// Loader::new().env_from(&vars).apply(&mut config)?;
    /// ```
    #[must_use]
    pub fn env_from<E: Environment>(mut self, env: &'a E) -> Self {
        self.layers.push(Layer::Env(Some(env)));

        self
    }

    /// Adds a required plain `key=value` file.
    ///
    /// A missing file makes [`apply()`](Self::apply) fail with
    /// [`Error::NotFound`].
    #[must_use]
    pub fn file(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::File {
            path: path.as_ref().to_path_buf(),
            required: true,
        });

        self
    }

    /// Adds a plain `key=value` file that is skipped when it does not exist.
    ///
    /// Any other read failure is still an error.
    #[must_use]
    pub fn file_optional(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::File {
            path: path.as_ref().to_path_buf(),
            required: false,
        });

        self
    }

    /// Adds a required file parsed with dotenv syntax.
    ///
    /// Unlike the plain format this understands `#` comments, single and
    /// double quotes, escapes, `export` prefixes and `${VAR}` substitution.
    #[cfg(feature = "dotenv")]
    #[must_use]
    pub fn dotenv_file(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::Dotenv {
            path: path.as_ref().to_path_buf(),
            required: true,
        });

        self
    }

    /// Like [`dotenv_file()`](Self::dotenv_file), but a missing file is skipped.
    #[cfg(feature = "dotenv")]
    #[must_use]
    pub fn dotenv_file_optional(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::Dotenv {
            path: path.as_ref().to_path_buf(),
            required: false,
        });

        self
    }

    /// Reject values arriving for fields of unsupported type instead of
    /// skipping them.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;

        self
    }

    /// Applies every source to `target`, in order.
    ///
    /// Returns which source last wrote each field.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] / [`Error::Read`] for a required file that can't be read
    /// - [`Error::Dotenv`] for malformed dotenv syntax
    /// - [`Error::InvalidUtf8`] for a non-Unicode environment variable
    /// - [`Error::Env`] / [`Error::File`] for a value that does not convert
    pub fn apply<T: Hydrate>(&self, target: &mut T) -> Result<ConfigSources, Error> {
        let mut sources = ConfigSources::for_target::<T>();

        for layer in &self.layers {
            match layer {
                Layer::Env(env) => {
                    debug!(target_type = T::TYPE_NAME, "applying environment");

                    let written = match env {
                        Some(env) => apply_environment(target, *env, self.strict)?,
                        None => apply_environment(target, &ProcessEnv, self.strict)?,
                    };

                    record(&mut sources, &written, &Source::Environment);
                }

                Layer::File { path, required } => {
                    let Some(content) = file::read_file(path, *required)? else {
                        debug!(path = %path.display(), "skipping missing optional file");
                        continue;
                    };

                    debug!(target_type = T::TYPE_NAME, path = %path.display(), "applying file");

                    for pair in file::parse_str(&content) {
                        let written = apply_pair(target, pair.key, pair.value, self.strict)
                            .map_err(|source| {
                                file_error::<T>(path, &content, Some(&pair), source)
                            })?;

                        record(&mut sources, &written, &Source::File(path.clone()));
                    }
                }

                #[cfg(feature = "dotenv")]
                Layer::Dotenv { path, required } => {
                    let Some(content) = file::read_file(path, *required)? else {
                        debug!(path = %path.display(), "skipping missing optional dotenv file");
                        continue;
                    };

                    debug!(target_type = T::TYPE_NAME, path = %path.display(), "applying dotenv file");

                    for item in dotenvy::from_read_iter(content.as_bytes()) {
                        let (key, value) = item.map_err(|source| Error::Dotenv {
                            path: path.clone(),
                            source,
                        })?;

                        let written = apply_pair(target, &key, &value, self.strict)
                            .map_err(|source| file_error::<T>(path, &content, None, source))?;

                        record(&mut sources, &written, &Source::DotenvFile(path.clone()));
                    }
                }
            }
        }

        Ok(sources)
    }

    /// Builds `T::default()` and applies every source to it.
    ///
    /// # Errors
    ///
    /// Same as [`apply()`](Self::apply).
    pub fn load<T: Hydrate + Default>(&self) -> Result<T, Error> {
        self.load_with_sources().map(|(target, _)| target)
    }

    /// Like [`load()`](Self::load), also returning source attribution.
    ///
    /// # Errors
    ///
    /// Same as [`apply()`](Self::apply).
    pub fn load_with_sources<T: Hydrate + Default>(&self) -> Result<(T, ConfigSources), Error> {
        let mut target = T::default();
        let sources = self.apply(&mut target)?;

        Ok((target, sources))
    }
}

fn record(sources: &mut ConfigSources, written: &[FieldDescriptor], source: &Source) {
    for descriptor in written {
        sources.record(
            descriptor.name,
            ValueSource::new(descriptor.effective_key(), source.clone()),
        );
    }
}

/// Wrap a coercion failure with the file it came from.
///
/// The span points at the offending value. It is absent for dotenv files,
/// whose parser does not report positions, and for secret fields. The
/// attached source has every secret value masked, since reports print the
/// lines around the span.
fn file_error<T: Hydrate>(
    path: &Path,
    content: &str,
    pair: Option<&Pair<'_>>,
    source: CoerceError,
) -> Error {
    Error::File {
        target: T::TYPE_NAME,
        path: path.to_path_buf(),
        line: pair.map(|p| p.line),
        src: NamedSource::new(path.display().to_string(), masked_source::<T>(content)),
        span: pair
            .filter(|_| !source.is_secret())
            .map(|p| SourceSpan::new(p.span.start.into(), p.span.len())),
        label: source.label(),
        source,
    }
}

/// Copy of `content` with the values of secret fields replaced by `*`.
///
/// Masks keep the byte length of the value so spans into the copy stay valid.
fn masked_source<T: Hydrate>(content: &str) -> String {
    let secret_keys: Vec<&str> = T::descriptors()
        .into_iter()
        .filter(|descriptor| descriptor.secret)
        .map(|descriptor| descriptor.effective_key())
        .collect();

    let mut masked = content.to_string();

    if secret_keys.is_empty() {
        return masked;
    }

    for pair in file::parse_str(content) {
        // dotenv files may prefix declarations with `export`
        let key = pair
            .key
            .strip_prefix("export")
            .filter(|rest| rest.starts_with([' ', '\t']))
            .map_or(pair.key, str::trim_start);

        if secret_keys.contains(&key) {
            masked.replace_range(pair.span.clone(), &"*".repeat(pair.span.len()));
        }
    }

    masked
}
