//! Multi-valued cells and file parameter tokens.
//!
//! Any cell may hold several values joined by `||`. A single trailing
//! separator is tolerated, empty segments are dropped and values are trimmed.
//! File references may additionally carry `__`-delimited parameter tokens
//! such as `BUNDLE:TEXT` or `PRIMARY:true`.

/// Separator between values in one cell.
pub const SEPARATOR: &str = "||";

/// Separator between a name and its parameter tokens.
const PARAM_SEPARATOR: &str = "__";

/// Remove one trailing `||`, if present.
pub fn strip_trailing_separator(value: &str) -> &str {
    value.strip_suffix(SEPARATOR).unwrap_or(value)
}

/// Split a cell into its trimmed, non-empty values.
///
/// ```
/// use safpack::split_values;
///
/// assert_eq!(split_values("a.txt||b.txt||"), vec!["a.txt", "b.txt"]);
/// ```
pub fn split_values(cell: &str) -> Vec<&str> {
    strip_trailing_separator(cell)
        .split(SEPARATOR)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .collect()
}

/// Split a `__`-delimited parameter string into trimmed, non-empty tokens.
pub fn split_params(params: &str) -> Vec<String> {
    params
        .split(PARAM_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// One file named in a file-reference cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSpec {
    /// The name exactly as written, used for lookup in the source directory.
    pub name: String,
    /// Parameter tokens written next to the name in the cell.
    pub params: Vec<String>,
}

impl FileSpec {
    /// Parse `name` or `name__PARAM__PARAM`.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        let (name, params) = match value.split_once(PARAM_SEPARATOR) {
            Some((name, rest)) => (name, split_params(rest)),
            None => (value, Vec::new()),
        };

        Self {
            name: name.trim().to_string(),
            params,
        }
    }

    /// The final path segment of the name, used when placing the file.
    pub fn placed_name(&self) -> &str {
        self.name
            .rsplit(|c: char| c == '/' || c == '\\')
            .next()
            .unwrap_or(self.name.as_str())
    }

    /// Cell-local tokens followed by the column's tokens.
    pub fn manifest_params(&self, column_params: &str) -> Vec<String> {
        let mut params = self.params.clone();
        params.extend(split_params(column_params));
        params
    }
}
