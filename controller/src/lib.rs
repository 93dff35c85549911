// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod credentials;
pub mod entity;
pub mod error;
pub mod memory;
pub mod models;
pub mod searchby;
pub mod values;

use anyhow::Error;
use std::collections::HashMap;

pub use entity::Entity;
pub use error::ErrorKind;
pub use memory::MemoryController;
pub use models::{Movie, NewMovie, NewUser, Rating, RatingChange, User};
pub use searchby::SearchBy;
pub use values::{build_prototype, Field, Prototype, Type, Value};

pub type Result<T> = std::result::Result<T, Error>;
pub type Ratings<I, Value = f64> = HashMap<I, Value>;
pub type MapedRatings<K, I, Value = f64> = HashMap<K, Ratings<I, Value>>;

/// Lowest and highest score a user can give to a movie
pub const SCORE_RANGE: (i32, i32) = (1, 5);

pub trait Controller: Send + Sync {
    /// Get all users, ordered by id
    fn users(&self) -> Result<Vec<User>>;

    /// Get users that matched the search criteria by id or email
    fn users_by(&self, by: &SearchBy) -> Result<Vec<User>>;

    fn user_by_id(&self, id: i32) -> Result<Option<User>> {
        let users = self.users_by(&SearchBy::Id(id.to_string()))?;
        Ok(users.into_iter().next())
    }

    fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users_by(&SearchBy::email(email))?;
        Ok(users.into_iter().next())
    }

    /// Get all movies, ordered by title
    fn movies(&self) -> Result<Vec<Movie>>;

    /// Get movies that matched the search criteria by id or title
    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>>;

    fn movie_by_id(&self, id: i32) -> Result<Option<Movie>> {
        let movies = self.movies_by(&SearchBy::Id(id.to_string()))?;
        Ok(movies.into_iter().next())
    }

    /// Get the ratings of an user along with the rated movies, ordered by title
    fn user_ratings(&self, user_id: i32) -> Result<Vec<(Rating, Movie)>>;

    /// Get the ratings a movie received, ordered by user id
    fn movie_ratings(&self, movie_id: i32) -> Result<Vec<Rating>>;

    /// Get the rating an user gave to a movie, if any
    fn rating(&self, user_id: i32, movie_id: i32) -> Result<Option<Rating>>;

    /// Get the ratings for the specified user, i.e. maps Movie::Id => score
    fn ratings_by(&self, user_id: i32) -> Result<Ratings<i32>>;

    /// Get normal MapedRatings for the specified users, i.e. maps User::Id => Movie::Id
    fn maped_ratings_by(&self, user_ids: &[i32]) -> Result<MapedRatings<i32, i32>>;

    /// Return a list of fields required to insert a new user
    fn fields_for_users(&self) -> Vec<Field<'static>> {
        vec![
            Field::Required("email", Type::String),
            Field::Required("password", Type::Secret),
            Field::Optional("age", Type::Int32),
            Field::Optional("zipcode", Type::String),
        ]
    }

    /// Return a list of fields required to insert a new movie
    fn fields_for_movies(&self) -> Vec<Field<'static>> {
        vec![
            Field::Required("title", Type::String),
            Field::Optional("released_at", Type::Date),
            Field::Optional("imdb_url", Type::String),
        ]
    }

    /// Insert a new user from a prototype, the password gets hashed
    fn insert_user(&self, proto: Prototype) -> Result<User> {
        let new_user = NewUser::from_proto(&proto)?;
        self.insert_new_user(new_user)
    }

    /// Insert an already validated user, fails if the email is taken
    fn insert_new_user(&self, new_user: NewUser) -> Result<User>;

    /// Insert a new movie from a prototype
    fn insert_movie(&self, proto: Prototype) -> Result<Movie> {
        let new_movie = NewMovie::from_proto(&proto)?;
        self.insert_new_movie(new_movie)
    }

    fn insert_new_movie(&self, new_movie: NewMovie) -> Result<Movie>;

    /// Create a rating of user for a movie
    fn insert_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating>;

    /// Update the rating of user for a movie
    fn update_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating>;

    /// Update the rating in place if there's one already, insert it otherwise
    fn save_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<(Rating, RatingChange)> {
        self.check_score(score)?;

        match self.rating(user_id, movie_id)? {
            Some(_) => {
                let rating = self.update_rating(user_id, movie_id, score)?;
                Ok((rating, RatingChange::Updated))
            }

            None => {
                let rating = self.insert_rating(user_id, movie_id, score)?;
                Ok((rating, RatingChange::Inserted))
            }
        }
    }

    /// The controller score range, (min_rating, max_rating)
    fn score_range(&self) -> (i32, i32) {
        SCORE_RANGE
    }

    fn check_score(&self, score: i32) -> std::result::Result<(), ErrorKind> {
        let (min, max) = self.score_range();
        if score < min || score > max {
            Err(ErrorKind::ScoreOutOfRange(score, min, max))
        } else {
            Ok(())
        }
    }
}
