use crate::error::AppError;
use tower_sessions::Session;

pub const CURRENT_USER: &str = "current_user";
const FLASHES: &str = "_flashes";

/// Per request data every page shows: who's logged in and pending flashes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub current_user: Option<i32>,
    pub flashes: Vec<String>,
}

impl Frame {
    /// Read the current user and drain the flash messages
    pub async fn load(session: &Session) -> Result<Self, AppError> {
        Ok(Self {
            current_user: current_user(session).await?,
            flashes: take_flashes(session).await?,
        })
    }
}

pub async fn current_user(session: &Session) -> Result<Option<i32>, AppError> {
    Ok(session.get::<i32>(CURRENT_USER).await?)
}

pub async fn login(session: &Session, user_id: i32) -> Result<(), AppError> {
    session.cycle_id().await?;
    session.insert(CURRENT_USER, user_id).await?;
    Ok(())
}

/// Forget the current user, being logged out already is fine
pub async fn logout(session: &Session) -> Result<Option<i32>, AppError> {
    Ok(session.remove::<i32>(CURRENT_USER).await?)
}

pub async fn flash(session: &Session, message: impl Into<String>) -> Result<(), AppError> {
    let mut flashes = session.get::<Vec<String>>(FLASHES).await?.unwrap_or_default();
    flashes.push(message.into());
    session.insert(FLASHES, flashes).await?;
    Ok(())
}

pub async fn take_flashes(session: &Session) -> Result<Vec<String>, AppError> {
    Ok(session
        .remove::<Vec<String>>(FLASHES)
        .await?
        .unwrap_or_default())
}
