//! # hydrenv_macro
//!
//! This crate provides the `#[derive(Hydrate)]` procedural macro.
//! It is a proc-macro crate, meaning it can only export procedural macros.
//!
//! ## Module Structure
//!
//! - `parse` - Attribute parsing for `#[env(...)]`
//! - `field` - Field type classification and descriptor generation
//! - `expand` - Macro expansion orchestration

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

// Internal modules - not exposed publicly
mod expand;
mod field;
mod parse;

/// Derive macro that builds the field-descriptor table for a config struct.
///
/// The generated `hydrenv::Hydrate` impl lets `hydrenv` populate the struct
/// in place from environment variables and `key=value` files.
///
/// # Attributes
///
/// - `#[env(key = "NAME")]` - Look the field up under `NAME` instead of its own name
/// - `#[env(secret)]` - Never show the raw value in errors or templates
///
/// # Supported Field Types
///
/// `String`, `bool`, `i8`..`i64`, `isize`, `u8`..`u64`, `usize` and `Vec<u8>`.
/// Any other `Vec<T>` is rejected when a value arrives for it; every other type
/// is left untouched.
///
/// # Example
///
/// ```ignore
/// #[derive(Default, Hydrate)]
/// struct Config {
///     #[env(key = "DATABASE_URL")]
///     db_url: String,
///
///     #[env(key = "PORT")]
///     port: u16,
///
///     #[env(key = "API_KEY", secret)]
///     api_key: String,
///
///     // Looked up as `verbose`
///     verbose: bool,
/// }
///
/// fn main() -> Result<(), hydrenv::Error> {
///     let config: Config = hydrenv::from_files([".env", ".env.local"])?;
///     println!("Connected to: {}", config.db_url);
///     Ok(())
/// }
/// ```
///
/// # Errors
///
/// Only structs with named fields are accepted. Enums, unions, tuple structs
/// and unit structs are rejected at compile time.
#[proc_macro_derive(Hydrate, attributes(env))]
pub fn derive_hydrate(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    // On error, convert to a compile_error!() invocation for better error messages
    expand::Expander::expand(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
