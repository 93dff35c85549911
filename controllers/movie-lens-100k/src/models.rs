use crate::schema::*;
use chrono::NaiveDate;
use controller::{Movie, NewMovie, NewUser, Rating, User};

// To query data from the database
#[derive(Debug, Clone, Queryable)]
pub struct UserRow {
    pub user_id: i32,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.user_id,
            email: row.email,
            password_hash: row.password_hash,
            age: row.age,
            zipcode: row.zipcode,
        }
    }
}

// To insert a new user into the database
#[derive(Debug, Clone, Insertable)]
#[table_name = "users"]
pub struct NewUserRow<'a> {
    pub email: Option<&'a str>,
    pub password_hash: Option<&'a str>,
    pub age: Option<i32>,
    pub zipcode: Option<&'a str>,
}

impl<'a> From<&'a NewUser> for NewUserRow<'a> {
    fn from(new_user: &'a NewUser) -> Self {
        NewUserRow {
            email: new_user.email.as_deref(),
            password_hash: new_user.password_hash.as_deref(),
            age: new_user.age,
            zipcode: new_user.zipcode.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Queryable)]
pub struct MovieRow {
    pub movie_id: i32,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

impl From<MovieRow> for Movie {
    fn from(row: MovieRow) -> Self {
        Movie {
            id: row.movie_id,
            title: row.title,
            released_at: row.released_at,
            imdb_url: row.imdb_url,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "movies"]
pub struct NewMovieRow<'a> {
    pub title: &'a str,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<&'a str>,
}

impl<'a> From<&'a NewMovie> for NewMovieRow<'a> {
    fn from(new_movie: &'a NewMovie) -> Self {
        NewMovieRow {
            title: &new_movie.title,
            released_at: new_movie.released_at,
            imdb_url: new_movie.imdb_url.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Copy, Queryable)]
pub struct RatingRow {
    pub rating_id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub score: i32,
}

impl From<RatingRow> for Rating {
    fn from(row: RatingRow) -> Self {
        Rating {
            id: row.rating_id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            score: row.score,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[table_name = "ratings"]
pub struct NewRatingRow {
    pub movie_id: i32,
    pub user_id: i32,
    pub score: i32,
}
