use crate::error::{user_facing, AppError};
use crate::pages;
use crate::server::AppState;
use crate::session::{self, Frame};
use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::Form;
use controller::{build_prototype, credentials, Controller, User};
use serde::Deserialize;
use std::collections::HashMap;
use tower_sessions::Session;

enum Registration {
    Created(User),
    AlreadyRegistered,
    Rejected(String),
}

enum Login {
    Unknown,
    WrongPassword,
    Success(User),
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub async fn register_form<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let fields = state.controller.fields_for_users();

    let frame = Frame::load(&session).await?;
    Ok(pages::register_form(&frame, &fields))
}

pub async fn register_process<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
    Form(inputs): Form<HashMap<String, String>>,
) -> Result<Redirect, AppError> {
    let proto = match build_prototype(state.controller.fields_for_users(), &inputs) {
        Ok(proto) => proto,
        Err(e) => {
            session::flash(&session, e.to_string()).await?;
            return Ok(Redirect::to("/register"));
        }
    };

    let email = inputs.get("email").cloned().unwrap_or_default();
    let lookup = email.trim().to_owned();

    let registration = state
        .run(move |c| {
            if c.user_by_email(&lookup)?.is_some() {
                return Ok(Registration::AlreadyRegistered);
            }

            match c.insert_user(proto) {
                Ok(user) => Ok(Registration::Created(user)),
                Err(e) => match user_facing(&e) {
                    Some(msg) => Ok(Registration::Rejected(msg)),
                    None => Err(e),
                },
            }
        })
        .await?;

    match registration {
        Registration::Created(user) => {
            log::info!("Registered user({})", user.id);
            let msg = format!("New user - {} - successfully created", pages::user_label(&user));
            session::flash(&session, msg).await?;
            Ok(Redirect::to("/"))
        }

        Registration::AlreadyRegistered => {
            session::flash(&session, format!("{} is already registered", email.trim())).await?;
            Ok(Redirect::to("/"))
        }

        Registration::Rejected(msg) => {
            log::warn!("Registration rejected: {}", msg);
            session::flash(&session, msg).await?;
            Ok(Redirect::to("/register"))
        }
    }
}

pub async fn login_form<C: Controller + 'static>(
    State(_state): State<AppState<C>>,
    session: Session,
) -> Result<Html<String>, AppError> {
    let frame = Frame::load(&session).await?;
    Ok(pages::login_form(&frame))
}

pub async fn login_user<C: Controller + 'static>(
    State(state): State<AppState<C>>,
    session: Session,
    Query(form): Query<Credentials>,
) -> Result<Redirect, AppError> {
    let email = form.email.unwrap_or_default().trim().to_owned();
    let password = form.password.unwrap_or_default();

    let lookup = email.clone();
    let login = state
        .run(move |c| {
            if lookup.is_empty() {
                return Ok(Login::Unknown);
            }

            // Hash verification is slow on purpose, keep it off the runtime
            Ok(match c.user_by_email(&lookup)? {
                Some(user) if credentials::verify_password(&user, &password) => {
                    Login::Success(user)
                }
                Some(_) => Login::WrongPassword,
                None => Login::Unknown,
            })
        })
        .await?;

    match login {
        Login::Success(user) => {
            log::info!("User({}) logged in", user.id);
            session::login(&session, user.id).await?;
            session::flash(&session, "You were successfully logged in").await?;
            Ok(Redirect::to(&format!("/users/{}", user.id)))
        }

        Login::WrongPassword => {
            log::warn!("Wrong password for {}", email);
            session::flash(&session, "Wrong credentials. Try again!").await?;
            Ok(Redirect::to("/login"))
        }

        Login::Unknown => {
            let msg = format!("Sorry, {} is not registered yet.", email);
            session::flash(&session, msg).await?;
            Ok(Redirect::to("/register"))
        }
    }
}

pub async fn logout(session: Session) -> Result<Redirect, AppError> {
    if let Some(user_id) = session::logout(&session).await? {
        log::info!("User({}) logged out", user_id);
    }

    session::flash(&session, "You were logged out. See you later!").await?;
    Ok(Redirect::to("/"))
}
