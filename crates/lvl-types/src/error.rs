use thiserror::Error;

/// Reasons a raw string is not an acceptable [`LevelId`](crate::LevelId).
///
/// Rules are checked in declaration order and the first failure wins.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum IdError {
    #[error("invalid character {ch:?} in level id")]
    InvalidCharacter { ch: char },

    #[error("level id has no author part")]
    MissingAuthor,

    #[error("level name is {len} characters, limit is {max}")]
    NameTooLong { len: usize, max: usize },

    #[error("author name is {len} characters, limit is {max}")]
    AuthorTooLong { len: usize, max: usize },
}
