//! `Hydrate` trait implementation generation.
//!
//! # Generated Code Pattern
//!
//! ```rust,ignore
//! impl ::hydrenv::Hydrate for Config {
//!     const TYPE_NAME: &'static str = "Config";
//!
//!     fn descriptors() -> Vec<::hydrenv::FieldDescriptor> {
//!         vec![::hydrenv::FieldDescriptor { name: "port", key: Some("PORT"), .. }]
//!     }
//!
//!     fn fields_mut(&mut self) -> Vec<::hydrenv::Field<'_>> {
//!         vec![::hydrenv::Field::new(
//!             ::hydrenv::FieldDescriptor { name: "port", key: Some("PORT"), .. },
//!             ::hydrenv::FieldMut::Unsigned(&mut self.port),
//!         )]
//!     }
//! }
//! ```
//!
//! The descriptor table is rebuilt on every call; nothing is cached.

use proc_macro2::TokenStream as QuoteStream;
use quote::quote;
use syn::{Generics, Ident};

use crate::field::FieldSpec;

/// Generate the `impl hydrenv::Hydrate` block for a struct.
pub fn generate_hydrate_impl(
    struct_name: &Ident,
    generics: &Generics,
    specs: &[FieldSpec],
) -> QuoteStream {
    let (impl_generics, type_generics, where_clause) = generics.split_for_impl();
    let type_name = struct_name.to_string();

    let descriptors: Vec<QuoteStream> = specs.iter().map(FieldSpec::descriptor).collect();
    let slots: Vec<QuoteStream> = specs.iter().map(FieldSpec::slot).collect();

    quote! {
        impl #impl_generics ::hydrenv::Hydrate for #struct_name #type_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn descriptors() -> ::std::vec::Vec<::hydrenv::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            fn fields_mut(&mut self) -> ::std::vec::Vec<::hydrenv::Field<'_>> {
                ::std::vec![#(::hydrenv::Field::new(#descriptors, #slots)),*]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Kind;
    use syn::parse_quote;

    fn specs(fields: syn::FieldsNamed) -> Vec<FieldSpec> {
        fields
            .named
            .iter()
            .map(|f| FieldSpec::from_field(f).unwrap())
            .collect()
    }

    #[test]
    fn test_generic_struct_keeps_bounds() {
        let generics: Generics = parse_quote!(<T: Clone>);
        let fields = specs(parse_quote!({ name: String, extra: T }));
        let ident: Ident = parse_quote!(Wrapper);

        assert_eq!(fields[1].kind(), &Kind::Unsupported("T".into()));

        let tokens = generate_hydrate_impl(&ident, &generics, &fields).to_string();
        assert!(tokens.contains("impl < T : Clone >"));
        assert!(tokens.contains("for Wrapper < T >"));
        assert!(tokens.contains("FieldMut :: Unsupported"));
    }

    #[test]
    fn test_one_slot_per_field() {
        let generics = Generics::default();
        let fields = specs(parse_quote!({ a: String, b: bool, c: i32, d: Vec<u8> }));
        let ident: Ident = parse_quote!(Config);

        let tokens = generate_hydrate_impl(&ident, &generics, &fields).to_string();
        assert_eq!(tokens.matches(":: hydrenv :: Field :: new").count(), 4);
        assert_eq!(tokens.matches(":: hydrenv :: FieldDescriptor {").count(), 8);
    }
}
