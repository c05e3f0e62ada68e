//! Environment lookup.
//!
//! The environment path never enumerates variables; every field asks for its
//! own effective key. [`Environment`] abstracts that lookup so a snapshot
//! (any `HashMap`/`BTreeMap` of strings) can stand in for the live process
//! table.

use std::collections::{BTreeMap, HashMap};
use std::env::VarError;
use std::hash::BuildHasher;

use crate::Error;

/// A source of environment variables.
pub trait Environment {
    /// Look up `key`.
    ///
    /// Returns `Ok(None)` when the variable is not set.
    ///
    /// # Errors
    ///
    /// Implementations return [`Error::InvalidUtf8`] when the variable exists
    /// but cannot be represented as a `String`.
    fn var(&self, key: &str) -> Result<Option<String>, Error>;
}

/// The live process environment.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, key: &str) -> Result<Option<String>, Error> {
        match std::env::var(key) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(Error::InvalidUtf8 {
                var: key.to_string(),
            }),
        }
    }
}

impl<S: BuildHasher> Environment for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key).cloned())
    }
}

impl Environment for BTreeMap<String, String> {
    fn var(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.get(key).cloned())
    }
}

impl<E: Environment + ?Sized> Environment for &E {
    fn var(&self, key: &str) -> Result<Option<String>, Error> {
        (**self).var(key)
    }
}
