//! Teacher identity and listing attributes.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized teacher name used as the join key across sources.
///
/// The two rating sources disagree on `ё` versus `е`, so `ё`/`Ё` are folded
/// into `е`/`Е`. Whitespace is trimmed and inner runs collapse to one space.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct TeacherName(String);

impl TeacherName {
    /// Normalize raw text into a join key.
    pub fn new(raw: &str) -> Self {
        Self(
            canonicalize_yo(raw)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Fold `ё`/`Ё` into `е`/`Е`.
pub fn canonicalize_yo(text: &str) -> String {
    text.replace('ё', "е").replace('Ё', "Е")
}

impl fmt::Display for TeacherName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for TeacherName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeacherName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for TeacherName {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<TeacherName> for String {
    fn from(name: TeacherName) -> Self {
        name.0
    }
}

/// Attributes listed for a teacher on the faculty staff page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAttributes {
    /// Academic degree
    pub degree: String,

    /// Department name
    pub department: String,

    /// Academic rank
    pub rank: String,
}
