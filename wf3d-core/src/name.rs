//! Validated model names
//!
//! Every path the store touches is derived from a [`ModelName`], never from a
//! raw string, so traversal and odd characters are rejected in one place.

use thiserror::Error;

/// Longest accepted model name, in bytes
pub const MAX_NAME_LEN: usize = 64;

/// Required model file extension (compared case-insensitively)
pub const MODEL_EXTENSION: &str = ".obj";

/// Reasons a model name is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("name is empty")]
    Empty,
    #[error("name is longer than {MAX_NAME_LEN} bytes")]
    TooLong,
    #[error("name does not end in {MODEL_EXTENSION}")]
    BadExtension,
    #[error("name contains a path separator or '..'")]
    PathTraversal,
    #[error("name contains disallowed character {0:?}")]
    DisallowedChar(char),
}

/// A model file name that is safe to join onto a store directory
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModelName(String);

impl ModelName {
    /// Validate a name as-is.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong);
        }
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(NameError::PathTraversal);
        }
        if let Some(c) = name.chars().find(|&c| !is_name_char(c) && c != ' ') {
            return Err(NameError::DisallowedChar(c));
        }
        if !name.to_ascii_lowercase().ends_with(MODEL_EXTENSION) {
            return Err(NameError::BadExtension);
        }
        Ok(Self(name.to_owned()))
    }

    /// Turn an arbitrary uploaded file name into a model name.
    ///
    /// Directory components are stripped, spaces become underscores, other
    /// disallowed characters are removed, the result is lowercased and the
    /// `.obj` extension is appended when missing.
    pub fn sanitize(raw: &str) -> Result<Self, NameError> {
        let base = base_name(raw);
        let mut out: String = base
            .chars()
            .filter_map(|c| match c {
                ' ' => Some('_'),
                c if is_name_char(c) => Some(c.to_ascii_lowercase()),
                _ => None,
            })
            .collect();
        if !out.ends_with(MODEL_EXTENSION) {
            out.push_str(MODEL_EXTENSION);
        }
        Self::parse(&out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ModelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ModelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Everything after the last `/` or `\`.
pub fn base_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')
}
