//! Matching source values to fields.
//!
//! Two directions:
//!
//! - [`apply_pair`] pushes one `key=value` pair from a file into every field
//!   whose effective key matches
//! - [`apply_environment`] pulls each field's effective key from an
//!   [`Environment`]
//!
//! Both stop at the first failure. Fields already written stay written.

use crate::coerce::{CoerceError, coerce};
use crate::env::Environment;
use crate::field::{Field, FieldDescriptor, Hydrate};
use crate::Error;

/// Assign `value` to every field of `target` whose effective key is `key`.
///
/// Returns the descriptors of the fields that were written, in declaration
/// order. A key that matches nothing writes nothing.
///
/// # Errors
///
/// The first [`CoerceError`] aborts the pair; fields declared after the
/// failing one are not attempted.
pub(crate) fn apply_pair<T: Hydrate>(
    target: &mut T,
    key: &str,
    value: &str,
    strict: bool,
) -> Result<Vec<FieldDescriptor>, CoerceError> {
    let mut written = Vec::new();

    for Field { descriptor, slot } in target.fields_mut() {
        if descriptor.effective_key() != key {
            continue;
        }

        if coerce(&descriptor, slot, value, strict)? {
            trace!(field = descriptor.name, key, "assigned field");
            written.push(descriptor);
        } else {
            trace!(field = descriptor.name, kind = %descriptor.kind, "skipped unsupported field");
        }
    }

    Ok(written)
}

/// Look up every field's effective key in `env` and assign non-empty values.
///
/// Absent and empty variables leave their field untouched.
///
/// # Errors
///
/// - [`Error::InvalidUtf8`] from the lookup
/// - [`Error::Env`] wrapping the first coercion failure
pub(crate) fn apply_environment<T, E>(
    target: &mut T,
    env: &E,
    strict: bool,
) -> Result<Vec<FieldDescriptor>, Error>
where
    T: Hydrate,
    E: Environment + ?Sized,
{
    let mut written = Vec::new();

    for Field { descriptor, slot } in target.fields_mut() {
        let key = descriptor.effective_key();

        let raw = match env.var(key)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => continue,
        };

        let assigned = coerce(&descriptor, slot, &raw, strict).map_err(|source| Error::Env {
            target: T::TYPE_NAME,
            source,
        })?;

        if assigned {
            trace!(field = descriptor.name, key, "assigned field from environment");
            written.push(descriptor);
        }
    }

    Ok(written)
}
