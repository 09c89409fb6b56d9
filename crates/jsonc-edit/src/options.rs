//! Parse options controlling the accepted JSONC extensions

use serde::{Deserialize, Serialize};

/// Which extensions beyond strict JSON the scanner and parser accept.
///
/// The permissive entry points ([`crate::parse`], [`crate::parse_to_value`])
/// enable every flag; the strict entry points disable every flag. A partial
/// configuration merges over either baseline with struct update syntax:
///
/// ```
/// use jsonc_edit::ParseOptions;
///
/// let options = ParseOptions {
///     allow_comments: true,
///     ..ParseOptions::strict()
/// };
/// assert!(!options.allow_trailing_commas);
/// ```
///
/// The serde representation uses the same camelCase field names as the
/// upstream tooling (`{"allowComments": false}`), with missing fields
/// falling back to the permissive defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Accept `//` and `/* */` comments
    pub allow_comments: bool,
    /// Accept a `,` immediately before `]` or `}`
    pub allow_trailing_commas: bool,
    /// Accept two sibling values without a separating `,`
    pub allow_missing_commas: bool,
    /// Accept `'...'` strings with the same escapes as double quoted ones
    pub allow_single_quoted_strings: bool,
    /// Accept `0x`-prefixed hexadecimal number literals
    pub allow_hexadecimal_numbers: bool,
    /// Accept a leading `+` on number literals
    pub allow_unary_plus_numbers: bool,
    /// Accept bare identifiers as object property names
    pub allow_loose_object_property_names: bool,
}

impl ParseOptions {
    /// All extension flags enabled.
    pub fn permissive() -> Self {
        Self {
            allow_comments: true,
            allow_trailing_commas: true,
            allow_missing_commas: true,
            allow_single_quoted_strings: true,
            allow_hexadecimal_numbers: true,
            allow_unary_plus_numbers: true,
            allow_loose_object_property_names: true,
        }
    }

    /// Strict JSON: every extension flag disabled.
    pub fn strict() -> Self {
        Self {
            allow_comments: false,
            allow_trailing_commas: false,
            allow_missing_commas: false,
            allow_single_quoted_strings: false,
            allow_hexadecimal_numbers: false,
            allow_unary_plus_numbers: false,
            allow_loose_object_property_names: false,
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::permissive()
    }
}
