// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("Couldn't found entity with id({0})")]
    NotFoundById(String),

    #[error("Couldn't found entity with {0}({1})")]
    NotFoundByCustom(String, String),

    #[error("Invalid id ({0})")]
    InvalidId(String),

    #[error("Searching by {0} is not supported here")]
    UnsupportedSearch(String),

    #[error("Failed to cast to some value ({0})")]
    ValueConvert(String),

    #[error("Couldn't cast value to {0}")]
    CastingValue(&'static str),

    #[error("Field '{0}' is required, cannot be empty")]
    MissingField(String),

    #[error("Invalid email address ({0})")]
    InvalidEmail(String),

    #[error("Email {0} is already registered")]
    DuplicateEmail(String),

    #[error("Couldn't hash password ({0})")]
    PasswordHash(String),

    #[error("Score {0} is out of range [{1}, {2}]")]
    ScoreOutOfRange(i32, i32, i32),

    #[error("Couldn't update rating for user({0}) on item({1})")]
    UpdateRatingFailed(String, String),

    #[error("Couldn't insert rating for user({0}) on item({1})")]
    InsertRatingFailed(String, String),
}
