//! Field type classification and per-field code generation.
//!
//! Every named field becomes one [`FieldSpec`]. The spec knows which runtime
//! kind the field maps to and emits two token streams: the static
//! `FieldDescriptor` literal and the `FieldMut` slot borrowing the field.

use proc_macro2::TokenStream as QuoteStream;
use quote::{ToTokens, quote};
use syn::ext::IdentExt;
use syn::{GenericArgument, Ident, PathArguments, Type, TypePath};

use crate::parse::FieldAttr;

/// Runtime kind a field is classified into.
///
/// Classification is syntactic: the last path segment of the declared type
/// decides. Type aliases therefore fall through to [`Kind::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    String,
    Bool,
    Signed(String),
    Unsigned(String),
    Bytes,
    Sequence(String),
    Unsupported(String),
}

impl Kind {
    /// Classify a declared field type.
    pub fn classify(ty: &Type) -> Self {
        let ty = strip_groups(ty);

        let Type::Path(TypePath { qself: None, path }) = ty else {
            return Kind::Unsupported(type_name(ty));
        };

        let Some(last) = path.segments.last() else {
            return Kind::Unsupported(type_name(ty));
        };

        let ident = last.ident.to_string();

        match (&last.arguments, ident.as_str()) {
            (PathArguments::None, "String") => Kind::String,
            (PathArguments::None, "bool") => Kind::Bool,
            (PathArguments::None, "i8" | "i16" | "i32" | "i64" | "isize") => Kind::Signed(ident),
            (PathArguments::None, "u8" | "u16" | "u32" | "u64" | "usize") => Kind::Unsigned(ident),
            (PathArguments::AngleBracketed(args), "Vec") => {
                let mut types = args.args.iter().filter_map(|arg| match arg {
                    GenericArgument::Type(inner) => Some(inner),
                    _ => None,
                });

                match (types.next(), types.next()) {
                    (Some(element), None) => match Kind::classify(element) {
                        Kind::Unsigned(name) if name == "u8" => Kind::Bytes,
                        _ => Kind::Sequence(type_name(element)),
                    },
                    _ => Kind::Unsupported(type_name(ty)),
                }
            }
            _ => Kind::Unsupported(type_name(ty)),
        }
    }

    fn to_descriptor_kind(&self) -> QuoteStream {
        match self {
            Kind::String => quote! { ::hydrenv::FieldKind::String },
            Kind::Bool => quote! { ::hydrenv::FieldKind::Bool },
            Kind::Signed(name) => quote! { ::hydrenv::FieldKind::Signed { type_name: #name } },
            Kind::Unsigned(name) => quote! { ::hydrenv::FieldKind::Unsigned { type_name: #name } },
            Kind::Bytes => quote! { ::hydrenv::FieldKind::Bytes },
            Kind::Sequence(element) => {
                quote! { ::hydrenv::FieldKind::Sequence { element: #element } }
            }
            Kind::Unsupported(name) => {
                quote! { ::hydrenv::FieldKind::Unsupported { type_name: #name } }
            }
        }
    }
}

/// `Group` and `Paren` wrappers show up when types pass through `macro_rules!`.
fn strip_groups(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => strip_groups(&group.elem),
        Type::Paren(paren) => strip_groups(&paren.elem),
        other => other,
    }
}

/// Render a type for diagnostics without the spacing `quote` inserts.
fn type_name(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" <", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
}

/// Everything the expander needs to know about one named field.
pub struct FieldSpec {
    ident: Ident,
    attr: FieldAttr,
    kind: Kind,
}

impl FieldSpec {
    /// Build the spec for a named field, parsing its `#[env(...)]` attributes.
    pub fn from_field(field: &syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;

        Ok(Self {
            ident,
            attr: FieldAttr::parse(&field.attrs)?,
            kind: Kind::classify(&field.ty),
        })
    }

    /// The declared field name, without any `r#` prefix.
    pub fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    #[cfg(test)]
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// `hydrenv::FieldDescriptor { .. }` literal for this field.
    pub fn descriptor(&self) -> QuoteStream {
        let name = self.name();
        let kind = self.kind.to_descriptor_kind();
        let secret = self.attr.secret;
        let key = self.attr.key.as_ref().map_or_else(
            || quote! { ::core::option::Option::None },
            |key| quote! { ::core::option::Option::Some(#key) },
        );

        quote! {
            ::hydrenv::FieldDescriptor {
                name: #name,
                key: #key,
                kind: #kind,
                secret: #secret,
            }
        }
    }

    /// `hydrenv::FieldMut` expression borrowing this field from `self`.
    pub fn slot(&self) -> QuoteStream {
        let ident = &self.ident;

        match &self.kind {
            Kind::String => quote! { ::hydrenv::FieldMut::String(&mut self.#ident) },
            Kind::Bool => quote! { ::hydrenv::FieldMut::Bool(&mut self.#ident) },
            Kind::Signed(_) => quote! { ::hydrenv::FieldMut::Signed(&mut self.#ident) },
            Kind::Unsigned(_) => quote! { ::hydrenv::FieldMut::Unsigned(&mut self.#ident) },
            Kind::Bytes => quote! { ::hydrenv::FieldMut::Bytes(&mut self.#ident) },
            Kind::Sequence(_) => quote! { ::hydrenv::FieldMut::Sequence },
            Kind::Unsupported(_) => quote! { ::hydrenv::FieldMut::Unsupported },
        }
    }
}
