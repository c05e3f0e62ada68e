//! `.env.example` generation.

use std::fmt::Write;

use crate::field::Hydrate;

/// Render a template listing every key `T` reads, in declaration order.
///
/// Each supported field contributes a comment naming the field and its type
/// followed by an empty `KEY=` line. Fields that can never be assigned are
/// listed as comments only.
///
/// ```text
/// # Environment for Config
///
/// # name (String)
/// TEST_NAME=
///
/// # api_key (String, secret)
/// API_KEY=
///
/// # ratio (f64) is not read
/// ```
pub fn env_example<T: Hydrate>() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# Environment for {}", T::TYPE_NAME);

    for descriptor in T::descriptors() {
        out.push('\n');

        let kind = descriptor.kind;

        if kind.is_supported() {
            let secret = if descriptor.secret { ", secret" } else { "" };
            let _ = writeln!(out, "# {} ({kind}{secret})", descriptor.name);
            let _ = writeln!(out, "{}=", descriptor.effective_key());
        } else {
            let _ = writeln!(out, "# {} ({kind}) is not read", descriptor.name);
        }
    }

    out
}
