//! Field descriptors and the [`Hydrate`] trait.
//!
//! `#[derive(Hydrate)]` turns every named field of a struct into a
//! [`FieldDescriptor`] (what the field is called, which key it maps to, what
//! kind of value it holds) paired with a [`FieldMut`] slot borrowing the field
//! itself. The mapper walks these pairs; it never needs to know the concrete
//! struct type.

use std::fmt::{self, Display, Formatter};
use std::path::Path;

use crate::coerce::{SignedSlot, UnsignedSlot};
use crate::Error;

/// The closed set of value kinds a field can be declared with.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldKind {
    /// `String`, assigned verbatim.
    String,

    /// `bool`, parsed from a fixed truth vocabulary.
    Bool,

    /// A signed integer type (`i8` through `i64`, `isize`).
    Signed {
        /// Declared type name, e.g. `"i32"`.
        type_name: &'static str,
    },

    /// An unsigned integer type (`u8` through `u64`, `usize`).
    Unsigned {
        /// Declared type name, e.g. `"u16"`.
        type_name: &'static str,
    },

    /// `Vec<u8>`, assigned the raw UTF-8 bytes.
    Bytes,

    /// `Vec<T>` for any other `T`. Always rejected when a value arrives.
    Sequence {
        /// Declared element type name.
        element: &'static str,
    },

    /// Any other type. Skipped unless the loader is strict.
    Unsupported {
        /// Declared type name.
        type_name: &'static str,
    },
}

impl FieldKind {
    /// Whether values for this kind can ever be assigned.
    pub fn is_supported(&self) -> bool {
        !matches!(
            self,
            FieldKind::Sequence { .. } | FieldKind::Unsupported { .. }
        )
    }
}

impl Display for FieldKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::String => write!(f, "String"),
            FieldKind::Bool => write!(f, "bool"),
            FieldKind::Signed { type_name }
            | FieldKind::Unsigned { type_name }
            | FieldKind::Unsupported { type_name } => write!(f, "{type_name}"),
            FieldKind::Bytes => write!(f, "Vec<u8>"),
            FieldKind::Sequence { element } => write!(f, "Vec<{element}>"),
        }
    }
}

/// Static description of one struct field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FieldDescriptor {
    /// The declared field name.
    pub name: &'static str,

    /// Explicit lookup key from `#[env(key = "...")]`.
    pub key: Option<&'static str>,

    /// The declared value kind.
    pub kind: FieldKind,

    /// Whether the raw value must be hidden in diagnostics.
    pub secret: bool,
}

impl FieldDescriptor {
    /// The key used to match source pairs against this field.
    ///
    /// This is the explicit mapping key when present and non-empty,
    /// otherwise the field name.
    pub fn effective_key(&self) -> &'static str {
        match self.key {
            Some(key) if !key.is_empty() => key,
            _ => self.name,
        }
    }
}

/// A mutable borrow of one field, tagged by kind.
pub enum FieldMut<'a> {
    String(&'a mut String),
    Bool(&'a mut bool),
    Signed(&'a mut dyn SignedSlot),
    Unsigned(&'a mut dyn UnsignedSlot),
    Bytes(&'a mut Vec<u8>),
    /// `Vec<T>` with a non-byte element; nothing can be written.
    Sequence,
    /// A field of unsupported type; nothing can be written.
    Unsupported,
}

/// One entry of the table returned by [`Hydrate::fields_mut`].
pub struct Field<'a> {
    pub descriptor: FieldDescriptor,
    pub slot: FieldMut<'a>,
}

impl<'a> Field<'a> {
    pub fn new(descriptor: FieldDescriptor, slot: FieldMut<'a>) -> Self {
        Self { descriptor, slot }
    }
}

/// A struct whose fields can be populated from key/value sources.
///
/// Implemented by `#[derive(Hydrate)]`; manual implementations must return
/// descriptors and slots in the same order from both methods.
///
/// # Example
///
/// ```rust,ignore
/// use hydrenv::Hydrate;
///
/// #[derive(Default, Hydrate)]
/// struct Config {
///     #[env(key = "TEST_NAME")]
///     name: String,
///     verbose: bool,
/// }
///
/// let mut config = Config::from_files([".env"])?;
/// config.apply_env()?;
/// ```
pub trait Hydrate {
    /// Struct name used in error context.
    const TYPE_NAME: &'static str;

    /// Descriptors for every field, in declaration order.
    fn descriptors() -> Vec<FieldDescriptor>;

    /// Descriptors paired with mutable slots, in declaration order.
    fn fields_mut(&mut self) -> Vec<Field<'_>>;

    /// Populate fields from the process environment. See [`crate::apply_env`].
    fn apply_env(&mut self) -> Result<(), Error>
    where
        Self: Sized,
    {
        crate::apply_env(self)
    }

    /// Apply `key=value` files in order. See [`crate::apply_files`].
    fn apply_files<I, P>(&mut self, paths: I) -> Result<(), Error>
    where
        Self: Sized,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        crate::apply_files(self, paths)
    }

    /// Build a default value and populate it from the environment.
    fn from_env() -> Result<Self, Error>
    where
        Self: Default + Sized,
    {
        crate::from_env()
    }

    /// Build a default value and apply `key=value` files to it.
    fn from_files<I, P>(paths: I) -> Result<Self, Error>
    where
        Self: Default + Sized,
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        crate::from_files(paths)
    }

    /// Render a `.env.example` template listing every assignable key.
    fn env_example() -> String
    where
        Self: Sized,
    {
        crate::template::env_example::<Self>()
    }
}
