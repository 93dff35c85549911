use thiserror::Error as DError;

#[derive(Debug, Clone, DError, PartialEq)]
pub enum ErrorKind {
    #[error("Tried to divide by zero")]
    DivisionByZero,

    #[error("Indeterminate form 0/0")]
    IndeterminateForm,

    #[error("Couldn't get distance, no matching ratings")]
    NoMatchingRatings,

    #[error("Couldn't convert types")]
    ConvertType,

    #[error("No judgment messages configured")]
    NoMessages,
}
