//! String-to-field coercion.
//!
//! A raw string from any source is converted into the native value of the
//! field it matched, according to the field's [`FieldKind`]:
//!
//! | Kind | Conversion |
//! |------|------------|
//! | `String` | verbatim |
//! | `bool` | case-insensitive `true t yes 1 on` / `"" false f no 0 off` |
//! | signed | base-10 parse into the field's width |
//! | unsigned | base-10 parse with optional sign, negatives wrap |
//! | `Vec<u8>` | raw UTF-8 bytes |
//! | `Vec<T>` | always an error |
//! | other | skipped (error in strict mode) |

use std::fmt::{self, Debug, Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

use miette::Diagnostic;
use num_traits::{PrimInt, Signed, Unsigned};

use crate::field::{FieldDescriptor, FieldKind, FieldMut};

const TRUTHY: [&str; 5] = ["true", "t", "yes", "1", "on"];
const FALSY: [&str; 6] = ["", "false", "f", "no", "0", "off"];

/// Parse a boolean from the fixed truth vocabulary, ignoring ASCII case.
///
/// Returns `None` for anything outside the vocabulary. The empty string is
/// `false`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if TRUTHY.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(true)
    } else if FALSY.iter().any(|word| raw.eq_ignore_ascii_case(word)) {
        Some(false)
    } else {
        None
    }
}

// ============================================================================
// Integer slots
// ============================================================================

/// Failure to turn a string into an integer field value.
///
/// Messages never include the raw value so that secret fields stay hidden
/// anywhere in the error chain.
#[derive(Debug, thiserror::Error)]
pub enum IntegerError {
    /// Not a base-10 integer, or outside the parser's range.
    #[error(transparent)]
    Parse(#[from] ParseIntError),

    /// A valid integer that cannot be represented in the field's type.
    #[error("value does not fit in {type_name}")]
    OutOfRange {
        /// The target integer type.
        type_name: &'static str,
    },
}

/// A signed integer field that can be assigned from a string.
pub trait SignedSlot {
    fn assign_str(&mut self, raw: &str) -> Result<(), IntegerError>;
}

impl<T> SignedSlot for T
where
    T: PrimInt + Signed + FromStr<Err = ParseIntError>,
{
    fn assign_str(&mut self, raw: &str) -> Result<(), IntegerError> {
        *self = raw.parse::<T>()?;
        Ok(())
    }
}

/// An unsigned integer field that can be assigned from a string.
///
/// A leading sign is accepted. Negative values inside the signed range of
/// the same width are reinterpreted as two's complement, so `-1` becomes the
/// type's maximum. Anything outside `-(2^(bits-1))..2^bits` is out of range.
pub trait UnsignedSlot {
    fn assign_str(&mut self, raw: &str) -> Result<(), IntegerError>;
}

impl<T> UnsignedSlot for T
where
    T: PrimInt + Unsigned,
{
    fn assign_str(&mut self, raw: &str) -> Result<(), IntegerError> {
        let out_of_range = || IntegerError::OutOfRange {
            type_name: std::any::type_name::<T>(),
        };

        let wide: i128 = raw.parse()?;

        let modulus = 1i128
            .checked_shl(T::zero().count_zeros())
            .filter(|m| *m > 0)
            .ok_or_else(out_of_range)?;

        if wide < -(modulus / 2) || wide >= modulus {
            return Err(out_of_range());
        }

        *self = num_traits::cast(wide.rem_euclid(modulus)).ok_or_else(out_of_range)?;
        Ok(())
    }
}

// ============================================================================
// Coercion errors
// ============================================================================

/// A raw source value, masked when it belongs to a secret field.
#[derive(Clone, PartialEq, Eq)]
pub struct RawValue {
    text: String,
    secret: bool,
}

impl RawValue {
    pub fn new(text: impl Into<String>, secret: bool) -> Self {
        Self {
            text: text.into(),
            secret,
        }
    }

    /// The unmasked value.
    pub fn expose(&self) -> &str {
        &self.text
    }

    pub fn is_secret(&self) -> bool {
        self.secret
    }
}

impl Display for RawValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.secret {
            write!(f, "<redacted>")
        } else {
            write!(f, "{:?}", self.text)
        }
    }
}

// Same masking as Display so `{:?}` on an error never leaks a secret.
impl Debug for RawValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A raw string that could not be converted into its field's type.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum CoerceError {
    /// The value is outside the boolean vocabulary.
    #[error("could not assign {value} to bool `{field}`")]
    #[diagnostic(
        code(hydrenv::coerce::invalid_bool),
        help("use one of true, t, yes, 1, on, false, f, no, 0, off (any case)")
    )]
    InvalidBool {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: RawValue,
    },

    /// The value is not an integer that fits the field.
    #[error("could not assign {value} to {type_name} `{field}`")]
    #[diagnostic(
        code(hydrenv::coerce::invalid_integer),
        help("expected a base-10 integer within the range of the field's type")
    )]
    InvalidInteger {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: RawValue,
        /// The declared integer type.
        type_name: &'static str,
        /// Why parsing failed.
        #[source]
        source: IntegerError,
    },

    /// A value arrived for a `Vec<T>` field whose element is not `u8`.
    #[error(
        "could not assign {value} to `Vec<{element}>` field `{field}`: only byte sequences are supported"
    )]
    #[diagnostic(
        code(hydrenv::coerce::unsupported_sequence),
        help("declare the field as Vec<u8>")
    )]
    UnsupportedSequence {
        /// The field name.
        field: &'static str,
        /// The rejected value.
        value: RawValue,
        /// The declared element type.
        element: &'static str,
    },

    /// A value arrived for a field of unsupported type while strict.
    #[error("field `{field}` has unsupported type `{type_name}`")]
    #[diagnostic(
        code(hydrenv::coerce::unsupported_type),
        help("supported types are String, bool, i8-i64, isize, u8-u64, usize and Vec<u8>")
    )]
    Unsupported {
        /// The field name.
        field: &'static str,
        /// The declared type.
        type_name: &'static str,
    },
}

impl CoerceError {
    /// The name of the field that rejected the value.
    pub fn field(&self) -> &'static str {
        match self {
            CoerceError::InvalidBool { field, .. }
            | CoerceError::InvalidInteger { field, .. }
            | CoerceError::UnsupportedSequence { field, .. }
            | CoerceError::Unsupported { field, .. } => field,
        }
    }

    /// Whether the rejected value belongs to a secret field.
    pub fn is_secret(&self) -> bool {
        match self {
            CoerceError::InvalidBool { value, .. }
            | CoerceError::InvalidInteger { value, .. }
            | CoerceError::UnsupportedSequence { value, .. } => value.is_secret(),
            CoerceError::Unsupported { .. } => false,
        }
    }

    /// Short description for source labels. Never contains the raw value.
    pub(crate) fn label(&self) -> String {
        match self {
            CoerceError::InvalidBool { field, .. } => format!("expected bool for `{field}`"),
            CoerceError::InvalidInteger {
                field, type_name, ..
            } => format!("expected {type_name} for `{field}`"),
            CoerceError::UnsupportedSequence { field, .. } => {
                format!("`{field}` only accepts byte sequences")
            }
            CoerceError::Unsupported { field, type_name } => {
                format!("`{field}` has unsupported type `{type_name}`")
            }
        }
    }
}

// ============================================================================
// Dispatch
// ============================================================================

/// Convert `raw` and write it into `slot`.
///
/// Returns `Ok(true)` when the field was written and `Ok(false)` when it was
/// skipped because its type is unsupported and `strict` is off.
///
/// # Errors
///
/// Returns a [`CoerceError`] when the value does not convert, when the field
/// is a non-byte sequence, or when the field is unsupported and `strict` is on.
pub fn coerce(
    descriptor: &FieldDescriptor,
    slot: FieldMut<'_>,
    raw: &str,
    strict: bool,
) -> Result<bool, CoerceError> {
    let field = descriptor.name;
    let value = || RawValue::new(raw, descriptor.secret);

    match slot {
        FieldMut::String(target) => raw.clone_into(target),

        FieldMut::Bool(target) => {
            *target = parse_bool(raw).ok_or_else(|| CoerceError::InvalidBool {
                field,
                value: value(),
            })?;
        }

        FieldMut::Signed(target) => {
            target
                .assign_str(raw)
                .map_err(|source| CoerceError::InvalidInteger {
                    field,
                    value: value(),
                    type_name: integer_type(&descriptor.kind),
                    source,
                })?;
        }

        FieldMut::Unsigned(target) => {
            target
                .assign_str(raw)
                .map_err(|source| CoerceError::InvalidInteger {
                    field,
                    value: value(),
                    type_name: integer_type(&descriptor.kind),
                    source,
                })?;
        }

        FieldMut::Bytes(target) => {
            target.clear();
            target.extend_from_slice(raw.as_bytes());
        }

        FieldMut::Sequence => {
            let element = match descriptor.kind {
                FieldKind::Sequence { element } => element,
                _ => "?",
            };

            return Err(CoerceError::UnsupportedSequence {
                field,
                value: value(),
                element,
            });
        }

        FieldMut::Unsupported => {
            if !strict {
                return Ok(false);
            }

            let type_name = match descriptor.kind {
                FieldKind::Unsupported { type_name } => type_name,
                _ => "?",
            };

            return Err(CoerceError::Unsupported { field, type_name });
        }
    }

    Ok(true)
}

fn integer_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Signed { type_name } | FieldKind::Unsigned { type_name } => type_name,
        _ => "integer",
    }
}
