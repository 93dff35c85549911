use crate::error::{user_facing, AppError};
use crate::pages;
use crate::server::AppState;
use crate::session::{self, Frame};
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::Form;
use controller::{Controller, Movie, RatingChange, SearchBy};
use engine::Engine;
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

#[derive(Debug, Deserialize)]
pub struct RateForm {
    pub movie_id: Option<String>,
    pub score: Option<String>,
}

enum Rated {
    Saved(Movie, RatingChange),
    Rejected(String),
    NoSuchMovie,
}

pub async fn movie_list<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let movies = state.run(|c| c.movies()).await?;

    let frame = Frame::load(&session).await?;
    Ok(pages::movie_list(&frame, &movies))
}

pub async fn movie_detail<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    Path(movie_id): Path<String>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let not_found = || AppError::NotFound(format!("Movie {}", movie_id));
    let id = SearchBy::parse_id(&movie_id).map_err(|_| not_found())?;

    let viewer = session::current_user(&session).await?;
    let judge = Arc::clone(&state.judge);
    let eye_email = Arc::clone(&state.eye_email);

    let found = state
        .run(move |c| {
            let movie = match c.movie_by_id(id)? {
                Some(movie) => movie,
                None => return Ok(None),
            };

            let eye = c.user_by_email(&eye_email)?.map(|eye| eye.id);
            let engine = Engine::with_controller(c).with_judge((*judge).clone());
            let outlook = engine.movie_outlook(id, viewer, eye)?;

            Ok(Some((movie, outlook)))
        })
        .await?;

    let (movie, outlook) = found.ok_or_else(not_found)?;

    let frame = Frame::load(&session).await?;
    Ok(pages::movie_detail(
        &frame,
        &movie,
        &outlook,
        state.controller.score_range(),
    ))
}

pub async fn rate_movie<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
    Form(form): Form<RateForm>,
) -> Result<Redirect, AppError> {
    let user_id = match session::current_user(&session).await? {
        Some(user_id) => user_id,
        None => {
            session::flash(&session, "Log in to rate movies").await?;
            return Ok(Redirect::to("/login"));
        }
    };

    let movie_id = match form.movie_id.as_deref().map(SearchBy::parse_id) {
        Some(Ok(movie_id)) => movie_id,
        _ => {
            session::flash(&session, "Unknown movie").await?;
            return Ok(Redirect::to("/movies"));
        }
    };

    let back = format!("/movies/{}", movie_id);
    let score = match form.score.as_deref().map(|s| s.trim().parse::<i32>()) {
        Some(Ok(score)) => score,
        _ => {
            session::flash(&session, "Pick a score to rate the movie").await?;
            return Ok(Redirect::to(&back));
        }
    };

    let rated = state
        .run(move |c| {
            let movie = match c.movie_by_id(movie_id)? {
                Some(movie) => movie,
                None => return Ok(Rated::NoSuchMovie),
            };

            match c.save_rating(user_id, movie_id, score) {
                Ok((_, change)) => Ok(Rated::Saved(movie, change)),
                Err(e) => match user_facing(&e) {
                    Some(msg) => Ok(Rated::Rejected(msg)),
                    None => Err(e),
                },
            }
        })
        .await?;

    match rated {
        Rated::Saved(movie, change) => {
            let verb = match change {
                RatingChange::Inserted => "added",
                RatingChange::Updated => "updated",
            };

            log::info!(
                "User({}) rated movie({}) with {} ({})",
                user_id,
                movie_id,
                score,
                verb
            );

            let msg = format!("Your rating of {} was {}", movie.title, verb);
            session::flash(&session, msg).await?;
            Ok(Redirect::to(&back))
        }

        Rated::Rejected(msg) => {
            session::flash(&session, msg).await?;
            Ok(Redirect::to(&back))
        }

        Rated::NoSuchMovie => {
            session::flash(&session, "Unknown movie").await?;
            Ok(Redirect::to("/movies"))
        }
    }
}
