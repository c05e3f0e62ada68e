//! Line-delimited `key=value` files.
//!
//! # Format
//!
//! - UTF-8 text, one declaration per line, `\n` terminated (the last line may
//!   omit the terminator)
//! - The first `=` splits key from value; later `=` belong to the value
//! - Spaces, tabs and `\r`/`\n` around key and value are trimmed
//! - Lines without `=` are skipped, which covers blank lines
//! - No quoting, escaping or comments: `# note=x` is the key `# note`
//!
//! For quote- and comment-aware parsing see `Loader::dotenv_file`.

use std::io::ErrorKind;
use std::ops::Range;
use std::path::Path;

use crate::Error;

const TRIM: &[char] = &[' ', '\t', '\r', '\n'];

/// One declaration from a file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pair<'a> {
    /// Trimmed key.
    pub key: &'a str,

    /// Trimmed value.
    pub value: &'a str,

    /// 1-based line number.
    pub line: usize,

    /// Byte range of `value` within the parsed content.
    pub span: Range<usize>,
}

/// Iterator over the declarations of a file's content, in file order.
pub struct Pairs<'a> {
    lines: std::str::Split<'a, char>,
    offset: usize,
    line: usize,
}

impl<'a> Iterator for Pairs<'a> {
    type Item = Pair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = self.lines.next()?;
            let start = self.offset;

            self.offset += raw.len() + 1;
            self.line += 1;

            let Some((key, value)) = raw.split_once('=') else {
                continue;
            };

            let trimmed_value = value.trim_matches(TRIM);
            let leading = value.len() - value.trim_start_matches(TRIM).len();
            let value_start = start + key.len() + 1 + leading;

            return Some(Pair {
                key: key.trim_matches(TRIM),
                value: trimmed_value,
                line: self.line,
                span: value_start..value_start + trimmed_value.len(),
            });
        }
    }
}

/// Parse file content into its declarations.
///
/// # Example
///
/// ```rust
/// let pairs: Vec<_> = hydrenv::file::parse_str("A=1\nnot a pair\n B = two \n")
///     .map(|p| (p.key, p.value))
///     .collect();
///
/// assert_eq!(pairs, [("A", "1"), ("B", "two")]);
/// ```
pub fn parse_str(content: &str) -> Pairs<'_> {
    Pairs {
        lines: content.split('\n'),
        offset: 0,
        line: 0,
    }
}

/// Read a file as UTF-8 text.
///
/// Returns `Ok(None)` if the file doesn't exist and `required` is false.
///
/// # Errors
///
/// - [`Error::NotFound`] when a required file does not exist
/// - [`Error::Read`] for any other I/O failure, including invalid UTF-8
pub fn read_file(path: &Path, required: bool) -> Result<Option<String>, Error> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),

        Err(e) if e.kind() == ErrorKind::NotFound => {
            if required {
                Err(Error::NotFound {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(None)
            }
        }

        Err(source) => Err(Error::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}
