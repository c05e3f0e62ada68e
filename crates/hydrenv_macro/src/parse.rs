//! Attribute parsing for `#[env(...)]`.

use syn::{Attribute, LitStr};

/// Parsed contents of every `#[env(...)]` attribute on one field.
#[derive(Debug, Default)]
pub struct FieldAttr {
    /// Explicit lookup key, `None` when the field name is used.
    pub key: Option<LitStr>,

    /// Whether the raw value must be hidden in diagnostics.
    pub secret: bool,
}

impl FieldAttr {
    /// Parse all `#[env(...)]` attributes attached to a field.
    ///
    /// Multiple attributes are merged; repeating an option is an error.
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|a| a.path().is_ident("env")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    if parsed.key.is_some() {
                        return Err(meta.error("duplicate `key` option"));
                    }

                    parsed.key = Some(meta.value()?.parse()?);
                    return Ok(());
                }

                if meta.path.is_ident("secret") {
                    if parsed.secret {
                        return Err(meta.error("duplicate `secret` option"));
                    }

                    parsed.secret = true;
                    return Ok(());
                }

                Err(meta.error(format!(
                    "unknown option `{}`, expected `key = \"...\"` or `secret`",
                    meta.path
                        .get_ident()
                        .map_or_else(|| "?".to_string(), ToString::to_string)
                )))
            })?;
        }

        Ok(parsed)
    }
}
