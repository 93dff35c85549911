use crate::error::AppError;
use crate::pages;
use crate::server::AppState;
use crate::session::Frame;
use axum::extract::{Path, State};
use axum::response::Html;
use controller::{Controller, SearchBy};
use tower_sessions::Session;

pub async fn index<C: Controller + 'static>(
    State(_state): State<AppState<C>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let frame = Frame::load(&session).await?;
    Ok(pages::homepage(&frame))
}

pub async fn user_list<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let users = state.run(|c| c.users()).await?;

    let frame = Frame::load(&session).await?;
    Ok(pages::user_list(&frame, &users))
}

pub async fn user_info<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    Path(user_id): Path<String>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let not_found = || AppError::NotFound(format!("User {}", user_id));
    let id = SearchBy::parse_id(&user_id).map_err(|_| not_found())?;

    let found = state
        .run(move |c| match c.user_by_id(id)? {
            Some(user) => {
                let ratings = c.user_ratings(id)?;
                Ok(Some((user, ratings)))
            }
            None => Ok(None),
        })
        .await?;

    let (user, ratings) = found.ok_or_else(not_found)?;

    let frame = Frame::load(&session).await?;
    Ok(pages::user_info(&frame, &user, &ratings))
}
