use crate::pages;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use controller::ErrorKind;
use thiserror::Error as DError;

#[derive(Debug, DError)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<tower_sessions::session::Error> for AppError {
    fn from(e: tower_sessions::session::Error) -> Self {
        AppError::Internal(e.into())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        AppError::Internal(e.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound(what) => {
                log::debug!("{} not found", what);
                (StatusCode::NOT_FOUND, pages::not_found(&what)).into_response()
            }

            AppError::Internal(e) => {
                log::error!("Request failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, pages::internal_error()).into_response()
            }
        }
    }
}

/// Message to show the user when the error comes from bad input rather than
/// a broken store
pub fn user_facing(e: &anyhow::Error) -> Option<String> {
    let kind = e.downcast_ref::<ErrorKind>()?;

    match kind {
        ErrorKind::InvalidEmail(_)
        | ErrorKind::DuplicateEmail(_)
        | ErrorKind::MissingField(_)
        | ErrorKind::ValueConvert(_)
        | ErrorKind::InvalidId(_)
        | ErrorKind::ScoreOutOfRange(..) => Some(kind.to_string()),
        _ => None,
    }
}
