//! Plain HTML rendering for every page the server answers with.

use crate::session::Frame;
use axum::response::Html;
use controller::{Entity, Field, Movie, Rating, Type, User};
use engine::MovieOutlook;

pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());

    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }

    escaped
}

pub fn user_label(user: &User) -> String {
    match &user.email {
        Some(email) => email.clone(),
        None => format!("User {}", user.id),
    }
}

fn layout(frame: &Frame, title: &str, body: &str) -> Html<String> {
    let session_links = match frame.current_user {
        Some(id) => format!(
            r#"<a href="/users/{}">My ratings</a> | <a href="/logout">Log out</a>"#,
            id
        ),
        None => r#"<a href="/login">Log in</a> | <a href="/register">Register</a>"#.to_owned(),
    };

    let flashes: String = frame
        .flashes
        .iter()
        .map(|msg| format!("<li>{}</li>", escape(msg)))
        .collect();

    let flashes = if flashes.is_empty() {
        String::new()
    } else {
        format!(r#"<ul class="flashes">{}</ul>"#, flashes)
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title} - Movie Ratings</title></head>
<body>
<nav><a href="/">Home</a> | <a href="/users">Users</a> | <a href="/movies">Movies</a> | {session_links}</nav>
{flashes}
<h1>{title}</h1>
{body}
</body>
</html>
"#,
        title = escape(title),
        session_links = session_links,
        flashes = flashes,
        body = body,
    ))
}

fn data_table<E: Entity>(entity: &E) -> String {
    let rows: String = entity
        .get_data()
        .iter()
        .map(|(key, val)| format!("<tr><th>{}</th><td>{}</td></tr>", escape(key), escape(val)))
        .collect();

    format!("<table>{}</table>", rows)
}

pub fn homepage(frame: &Frame) -> Html<String> {
    let greeting = match frame.current_user {
        Some(id) => format!(r#"<p>You are logged in as <a href="/users/{0}">user {0}</a>.</p>"#, id),
        None => "<p>Log in to rate movies and hear what the eye thinks of your taste.</p>".into(),
    };

    layout(frame, "Movie Ratings", &greeting)
}

pub fn user_list(frame: &Frame, users: &[User]) -> Html<String> {
    let items: String = users
        .iter()
        .map(|user| {
            format!(
                r#"<li><a href="/users/{}">{}</a></li>"#,
                user.id,
                escape(&user_label(user))
            )
        })
        .collect();

    layout(frame, "Users", &format!("<ul>{}</ul>", items))
}

pub fn user_info(frame: &Frame, user: &User, ratings: &[(Rating, Movie)]) -> Html<String> {
    let mut body = data_table(user);

    if ratings.is_empty() {
        body.push_str("<p>No ratings yet.</p>");
    } else {
        let items: String = ratings
            .iter()
            .map(|(rating, movie)| {
                format!(
                    r#"<li><a href="/movies/{}">{}</a>: {}</li>"#,
                    movie.id,
                    escape(&movie.title),
                    rating.score
                )
            })
            .collect();

        body.push_str(&format!("<h2>Ratings</h2><ul>{}</ul>", items));
    }

    layout(frame, &user_label(user), &body)
}

fn input_for(field: &Field) -> String {
    let (name, ty) = (field.name(), field.ty());
    let input_type = match ty {
        Type::String if name == "email" => "email",
        Type::String => "text",
        Type::Secret => "password",
        Type::Int32 => "number",
        Type::Date => "date",
    };

    let required = if field.is_optional() { "" } else { " required" };

    format!(
        r#"<p><label>{name} <input type="{ty}" name="{name}"{required}></label></p>"#,
        name = escape(name),
        ty = input_type,
        required = required,
    )
}

pub fn register_form(frame: &Frame, fields: &[Field]) -> Html<String> {
    let inputs: String = fields.iter().map(input_for).collect();
    let body = format!(
        r#"<form action="/register" method="post">{}<button type="submit">Register</button></form>"#,
        inputs
    );

    layout(frame, "Register", &body)
}

pub fn login_form(frame: &Frame) -> Html<String> {
    let body = r#"<form action="/login_user" method="get">
<p><label>email <input type="email" name="email" required></label></p>
<p><label>password <input type="password" name="password" required></label></p>
<button type="submit">Log in</button>
</form>"#;

    layout(frame, "Log in", body)
}

pub fn movie_list(frame: &Frame, movies: &[Movie]) -> Html<String> {
    let items: String = movies
        .iter()
        .map(|movie| {
            format!(
                r#"<li><a href="/movies/{}">{}</a></li>"#,
                movie.id,
                escape(&movie.title)
            )
        })
        .collect();

    layout(frame, "Movies", &format!("<ul>{}</ul>", items))
}

fn rating_form(movie: &Movie, current: Option<i32>, score_range: (i32, i32)) -> String {
    let options: String = (score_range.0..=score_range.1)
        .map(|score| {
            let selected = if Some(score) == current { " selected" } else { "" };
            format!(r#"<option value="{0}"{1}>{0}</option>"#, score, selected)
        })
        .collect();

    format!(
        r#"<form action="/rate_movie" method="post">
<input type="hidden" name="movie_id" value="{}">
<select name="score">{}</select>
<button type="submit">Rate</button>
</form>"#,
        movie.id, options
    )
}

pub fn movie_detail(
    frame: &Frame,
    movie: &Movie,
    outlook: &MovieOutlook,
    score_range: (i32, i32),
) -> Html<String> {
    let mut body = data_table(movie);

    match outlook.average {
        Some(average) => body.push_str(&format!(
            "<p>Average rating: {:.2} ({} ratings)</p>",
            average,
            outlook.ratings.len()
        )),
        None => body.push_str("<p>No ratings yet.</p>"),
    }

    if frame.current_user.is_some() {
        if let Some(score) = outlook.viewer_rating {
            body.push_str(&format!("<p>Your rating: {}</p>", score));
        } else if let Some(prediction) = outlook.prediction {
            body.push_str(&format!("<p>We predict you will rate it {:.1}</p>", prediction));
        }

        if let Some(eye_score) = outlook.eye_score {
            body.push_str(&format!("<p>The eye's score: {:.1}</p>", eye_score));
        }

        if let Some(beratement) = &outlook.beratement {
            body.push_str(&format!(
                r#"<blockquote class="beratement">{}</blockquote>"#,
                escape(beratement)
            ));
        }

        body.push_str(&rating_form(movie, outlook.viewer_rating, score_range));
    } else {
        body.push_str(r#"<p><a href="/login">Log in</a> to rate this movie.</p>"#);
    }

    if !outlook.ratings.is_empty() {
        let items: String = outlook
            .ratings
            .iter()
            .map(|rating| {
                format!(
                    r#"<li><a href="/users/{0}">User {0}</a>: {1}</li>"#,
                    rating.user_id, rating.score
                )
            })
            .collect();

        body.push_str(&format!("<h2>Ratings</h2><ul>{}</ul>", items));
    }

    layout(frame, &movie.title, &body)
}

pub fn not_found(what: &str) -> Html<String> {
    layout(
        &Frame::default(),
        "Not found",
        &format!("<p>{} doesn't exist.</p>", escape(what)),
    )
}

pub fn internal_error() -> Html<String> {
    layout(
        &Frame::default(),
        "Something went wrong",
        "<p>Please try again later.</p>",
    )
}
