//! Level identifier validation.
//!
//! A valid identifier:
//! - Contains only ASCII letters, ASCII digits, spaces and hyphens
//! - Contains at least one hyphen
//! - Splits on the *first* hyphen into a name of at most 20 characters and an
//!   author of at most 25 characters (the author may contain further hyphens)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::IdError;

/// Longest accepted name part.
pub const MAX_NAME_LEN: usize = 20;

/// Longest accepted author part.
pub const MAX_AUTHOR_LEN: usize = 25;

/// A validated `name-author` level identifier.
///
/// The only way to build one is through [`LevelId::parse`] (or the
/// `FromStr`/`TryFrom` impls that delegate to it), so holding a `LevelId`
/// means every rule has been checked.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LevelId {
    raw: String,
    /// Byte offset of the first hyphen.
    split: usize,
}

impl LevelId {
    /// Validate `raw` and wrap it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lvl_types::{IdError, LevelId};
    ///
    /// let id = LevelId::parse("Castle-Bob").unwrap();
    /// assert_eq!(id.name(), "Castle");
    /// assert_eq!(id.author(), "Bob");
    ///
    /// assert_eq!(LevelId::parse("Castle"), Err(IdError::MissingAuthor));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, IdError> {
        if let Some(ch) = raw.chars().find(|c| !is_id_char(*c)) {
            return Err(IdError::InvalidCharacter { ch });
        }

        let split = raw.find('-').ok_or(IdError::MissingAuthor)?;

        // Every char is ASCII past this point, so byte length == char count.
        let name_len = split;
        if name_len > MAX_NAME_LEN {
            return Err(IdError::NameTooLong {
                len: name_len,
                max: MAX_NAME_LEN,
            });
        }

        let author_len = raw.len() - split - 1;
        if author_len > MAX_AUTHOR_LEN {
            return Err(IdError::AuthorTooLong {
                len: author_len,
                max: MAX_AUTHOR_LEN,
            });
        }

        Ok(Self {
            raw: raw.to_string(),
            split,
        })
    }

    /// The full identifier string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Everything before the first hyphen.
    pub fn name(&self) -> &str {
        &self.raw[..self.split]
    }

    /// Everything after the first hyphen.
    pub fn author(&self) -> &str {
        &self.raw[self.split + 1..]
    }

    pub fn into_string(self) -> String {
        self.raw
    }
}

fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == ' ' || c == '-'
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LevelId({:?})", self.raw)
    }
}

impl AsRef<str> for LevelId {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl FromStr for LevelId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for LevelId {
    type Error = IdError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for LevelId {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<LevelId> for String {
    fn from(id: LevelId) -> Self {
        id.raw
    }
}
