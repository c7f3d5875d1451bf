//! Docstring dialect normalisation.
//!
//! Rewrites the parameter sections of Google and NumPy style doc text into
//! REST field lists (`:param name: text`, `:type name: type`), the one form
//! `mandate` reads parameter documentation from. Everything outside the
//! recognised sections passes through unchanged, so prose, examples and
//! notes survive.
//!
//! ```rust
//! use mandate_docstring::{normalize, DocStyle};
//!
//! let google = "Summary.\n\nArgs:\n    arg1 (int): Description of `arg1`\n";
//! assert_eq!(
//!     normalize(google, DocStyle::Google),
//!     "Summary.\n\n:param arg1: Description of `arg1`\n:type arg1: int"
//! );
//!
//! let numpy = "Summary.\n\nParameters\n----------\narg1 : int\n    Description of `arg1`\n";
//! assert_eq!(
//!     normalize(numpy, DocStyle::Numpy),
//!     "Summary.\n\n:param arg1: Description of `arg1`\n:type arg1: int"
//! );
//! ```

use std::fmt;
use std::str::FromStr;

mod fields;
mod google;
mod numpy;

/// A doc comment dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DocStyle {
    /// REST field lists; read as is.
    #[default]
    Rest,
    /// `Args:` / `Returns:` sections.
    Google,
    /// Section titles underlined with dashes.
    Numpy,
}

impl DocStyle {
    pub fn name(&self) -> &'static str {
        match self {
            DocStyle::Rest => "rest",
            DocStyle::Google => "google",
            DocStyle::Numpy => "numpy",
        }
    }
}

impl fmt::Display for DocStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an unknown dialect name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown doc style `{}` (expected rest, google or numpy)",
            self.0
        )
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for DocStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rest" | "rst" => Ok(DocStyle::Rest),
            "google" => Ok(DocStyle::Google),
            "numpy" => Ok(DocStyle::Numpy),
            _ => Err(UnknownStyle(s.to_string())),
        }
    }
}

/// Rewrites `doc` from `style` into REST field lists.
///
/// REST input is returned unchanged. Trailing whitespace is trimmed from the
/// result in every dialect.
pub fn normalize(doc: &str, style: DocStyle) -> String {
    match style {
        DocStyle::Rest => doc.trim_end().to_string(),
        DocStyle::Google => google::convert(doc),
        DocStyle::Numpy => numpy::convert(doc),
    }
}
