use crate::error::AppError;
use crate::routes::{auth, movies, users};
use axum::routing::{get, post};
use axum::Router;
use config::{Config, SessionConfig};
use controller::Controller;
use engine::Judge;
use std::sync::Arc;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Shared by every handler, the controller does blocking io so it's only
/// used through `AppState::run`
pub struct AppState<C> {
    pub controller: Arc<C>,
    pub judge: Arc<Judge>,
    pub eye_email: Arc<str>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            judge: Arc::clone(&self.judge),
            eye_email: Arc::clone(&self.eye_email),
        }
    }
}

impl<C: Controller + 'static> AppState<C> {
    pub fn new(controller: C, judge: Judge, eye_email: &str) -> Self {
        Self {
            controller: Arc::new(controller),
            judge: Arc::new(judge),
            eye_email: Arc::from(eye_email),
        }
    }

    pub fn from_config(controller: C, config: &Config) -> Self {
        let judge = match &config.judgment.messages {
            Some(messages) if !messages.is_empty() => Judge::with_messages(messages.clone()),
            Some(_) => {
                log::warn!("No judgment messages configured, using the default ones");
                Judge::default()
            }
            None => Judge::default(),
        };

        Self::new(controller, judge, &config.judgment.eye_email)
    }

    /// Run some controller work on the blocking pool
    pub async fn run<T, F>(&self, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&C) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let controller = Arc::clone(&self.controller);
        let result = tokio::task::spawn_blocking(move || f(&controller)).await?;

        Ok(result?)
    }
}

pub fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(config.cookie_name.clone())
        .with_secure(config.secure)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(config.expiry_minutes)))
}

pub fn router<C: Controller + 'static>(state: AppState<C>, sessions: &SessionConfig) -> Router {
    Router::new()
        .route("/", get(users::index::<C>))
        .route("/users", get(users::user_list::<C>))
        .route("/users/:user_id", get(users::user_info::<C>))
        .route(
            "/register",
            get(auth::register_form::<C>).post(auth::register_process::<C>),
        )
        .route("/login", get(auth::login_form::<C>))
        .route("/login_user", get(auth::login_user::<C>))
        .route("/logout", get(auth::logout))
        .route("/movies", get(movies::movie_list::<C>))
        .route("/movies/:movie_id", get(movies::movie_detail::<C>))
        .route("/rate_movie", post(movies::rate_movie::<C>))
        .with_state(state)
        .layer(session_layer(sessions))
}

pub async fn serve<C: Controller + 'static>(controller: C, config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(controller, &config);
    let app = router(state, &config.session);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
