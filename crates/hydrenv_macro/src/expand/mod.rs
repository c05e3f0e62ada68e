//! Macro expansion orchestration.
//!
//! The [`Expander`] validates the shape of the derive input, builds one
//! [`FieldSpec`] per named field and hands them to the code generators.

mod hydrate;

use proc_macro2::TokenStream as QuoteStream;
use syn::{Data, DataStruct, DeriveInput, Fields};

use crate::field::FieldSpec;

pub struct Expander;

impl Expander {
    /// Expand `#[derive(Hydrate)]` for the given input.
    ///
    /// Only structs with named fields are accepted. Errors from individual
    /// fields are combined so every bad attribute is reported in one pass.
    pub fn expand(input: DeriveInput) -> syn::Result<QuoteStream> {
        let fields = match &input.data {
            Data::Struct(DataStruct {
                fields: Fields::Named(named),
                ..
            }) => &named.named,

            Data::Struct(DataStruct {
                fields: Fields::Unnamed(_),
                ..
            }) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Hydrate requires named fields; tuple structs have no keys to map",
                ));
            }

            Data::Struct(DataStruct {
                fields: Fields::Unit,
                ..
            }) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Hydrate requires named fields; unit structs have nothing to populate",
                ));
            }

            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "Hydrate can only be derived for structs, not enums",
                ));
            }

            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "Hydrate can only be derived for structs, not unions",
                ));
            }
        };

        let mut specs = Vec::with_capacity(fields.len());
        let mut errors: Option<syn::Error> = None;

        for field in fields {
            match FieldSpec::from_field(field) {
                Ok(spec) => specs.push(spec),
                Err(err) => match errors.as_mut() {
                    Some(existing) => existing.combine(err),
                    None => errors = Some(err),
                },
            }
        }

        if let Some(err) = errors {
            return Err(err);
        }

        Ok(hydrate::generate_hydrate_impl(
            &input.ident,
            &input.generics,
            &specs,
        ))
    }
}
