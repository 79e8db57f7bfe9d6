//! Validated package names.
//!
//! Package names travel into expressions rendered for the R interpreter, so
//! they are validated once, at the edge, against R's own naming rule: ASCII
//! letters, digits and dots, starting with a letter, at least two characters,
//! not ending in a dot. Anything else is refused before it can reach a
//! rendered call.

use crate::error::{LarderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A syntactically valid R package name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackageName(String);

impl PackageName {
    /// Parse and validate a package name.
    pub fn parse(name: &str) -> Result<Self> {
        if is_valid_name(name) {
            Ok(Self(name.to_string()))
        } else {
            Err(LarderError::InvalidPackageName {
                name: name.to_string(),
            })
        }
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Check a candidate against the R package naming rule.
fn is_valid_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.len() < 2 {
        return false;
    }
    if !bytes[0].is_ascii_alphabetic() {
        return false;
    }
    if bytes[bytes.len() - 1] == b'.' {
        return false;
    }
    bytes
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'.')
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for PackageName {
    type Err = LarderError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackageName {
    type Error = LarderError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<PackageName> for String {
    fn from(name: PackageName) -> Self {
        name.0
    }
}

impl PartialEq<&str> for PackageName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
