// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::models::{Movie, NewMovie, NewUser, Rating, RatingChange, User};
use crate::searchby::SearchBy;
use crate::{Controller, MapedRatings, Ratings, Result};
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i32, User>,
    movies: BTreeMap<i32, Movie>,
    ratings: BTreeMap<i32, Rating>,
}

impl Tables {
    fn next_id<V>(table: &BTreeMap<i32, V>) -> i32 {
        table.keys().next_back().map_or(1, |id| id + 1)
    }

    fn find_rating(&self, user_id: i32, movie_id: i32) -> Option<&Rating> {
        self.ratings
            .values()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
    }

    fn find_rating_mut(&mut self, user_id: i32, movie_id: i32) -> Option<&mut Rating> {
        self.ratings
            .values_mut()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id)
    }

    fn push_rating(&mut self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating> {
        if !self.users.contains_key(&user_id) {
            return Err(ErrorKind::NotFoundById(user_id.to_string()).into());
        }

        if !self.movies.contains_key(&movie_id) {
            return Err(ErrorKind::NotFoundById(movie_id.to_string()).into());
        }

        if self.find_rating(user_id, movie_id).is_some() {
            return Err(
                ErrorKind::InsertRatingFailed(user_id.to_string(), movie_id.to_string()).into(),
            );
        }

        let rating = Rating {
            id: Self::next_id(&self.ratings),
            user_id,
            movie_id,
            score,
        };

        self.ratings.insert(rating.id, rating);
        Ok(rating)
    }

    fn set_rating(&mut self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating> {
        let rating = self.find_rating_mut(user_id, movie_id).ok_or_else(|| {
            ErrorKind::UpdateRatingFailed(user_id.to_string(), movie_id.to_string())
        })?;

        rating.score = score;
        Ok(*rating)
    }
}

/// Controller that keeps every table in process memory, nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryController {
    tables: RwLock<Tables>,
}

impl MemoryController {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Controller for MemoryController {
    fn users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().users.values().cloned().collect())
    }

    fn users_by(&self, by: &SearchBy) -> Result<Vec<User>> {
        let tables = self.tables.read();

        let users = match by {
            SearchBy::Id(id) => {
                let id = SearchBy::parse_id(id)?;
                tables.users.get(&id).cloned().into_iter().collect()
            }

            SearchBy::Email(email) => tables
                .users
                .values()
                .filter(|user| user.email.as_deref() == Some(email.as_str()))
                .cloned()
                .collect(),

            SearchBy::Title(_) => {
                return Err(ErrorKind::UnsupportedSearch("title".into()).into());
            }
        };

        Ok(users)
    }

    fn movies(&self) -> Result<Vec<Movie>> {
        let mut movies: Vec<_> = self.tables.read().movies.values().cloned().collect();
        movies.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));

        Ok(movies)
    }

    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>> {
        let tables = self.tables.read();

        let movies = match by {
            SearchBy::Id(id) => {
                let id = SearchBy::parse_id(id)?;
                tables.movies.get(&id).cloned().into_iter().collect()
            }

            SearchBy::Title(title) => tables
                .movies
                .values()
                .filter(|movie| &movie.title == title)
                .cloned()
                .collect(),

            SearchBy::Email(_) => {
                return Err(ErrorKind::UnsupportedSearch("email".into()).into());
            }
        };

        Ok(movies)
    }

    fn user_ratings(&self, user_id: i32) -> Result<Vec<(Rating, Movie)>> {
        let tables = self.tables.read();

        let mut ratings: Vec<_> = tables
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| tables.movies.get(&r.movie_id).map(|m| (*r, m.clone())))
            .collect();

        ratings.sort_by(|(_, a), (_, b)| a.title.cmp(&b.title));
        Ok(ratings)
    }

    fn movie_ratings(&self, movie_id: i32) -> Result<Vec<Rating>> {
        let mut ratings: Vec<_> = self
            .tables
            .read()
            .ratings
            .values()
            .filter(|r| r.movie_id == movie_id)
            .copied()
            .collect();

        ratings.sort_by_key(|r| r.user_id);
        Ok(ratings)
    }

    fn rating(&self, user_id: i32, movie_id: i32) -> Result<Option<Rating>> {
        Ok(self.tables.read().find_rating(user_id, movie_id).copied())
    }

    fn ratings_by(&self, user_id: i32) -> Result<Ratings<i32>> {
        Ok(self
            .tables
            .read()
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .map(|r| (r.movie_id, f64::from(r.score)))
            .collect())
    }

    fn maped_ratings_by(&self, user_ids: &[i32]) -> Result<MapedRatings<i32, i32>> {
        let tables = self.tables.read();
        let mut maped_ratings = MapedRatings::new();

        for rating in tables.ratings.values() {
            if user_ids.contains(&rating.user_id) {
                maped_ratings
                    .entry(rating.user_id)
                    .or_insert_with(Ratings::new)
                    .insert(rating.movie_id, f64::from(rating.score));
            }
        }

        Ok(maped_ratings)
    }

    fn insert_new_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.tables.write();

        if let Some(email) = &new_user.email {
            let taken = tables
                .users
                .values()
                .any(|user| user.email.as_ref() == Some(email));

            if taken {
                return Err(ErrorKind::DuplicateEmail(email.clone()).into());
            }
        }

        let user = User {
            id: Tables::next_id(&tables.users),
            email: new_user.email,
            password_hash: new_user.password_hash,
            age: new_user.age,
            zipcode: new_user.zipcode,
        };

        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    fn insert_new_movie(&self, new_movie: NewMovie) -> Result<Movie> {
        let mut tables = self.tables.write();

        let movie = Movie {
            id: Tables::next_id(&tables.movies),
            title: new_movie.title,
            released_at: new_movie.released_at,
            imdb_url: new_movie.imdb_url,
        };

        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    fn insert_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating> {
        self.check_score(score)?;
        self.tables.write().push_rating(user_id, movie_id, score)
    }

    fn update_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating> {
        self.check_score(score)?;
        self.tables.write().set_rating(user_id, movie_id, score)
    }

    // Lookup and write happen under the same lock
    fn save_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<(Rating, RatingChange)> {
        self.check_score(score)?;
        let mut tables = self.tables.write();

        if tables.find_rating(user_id, movie_id).is_some() {
            let rating = tables.set_rating(user_id, movie_id, score)?;
            Ok((rating, RatingChange::Updated))
        } else {
            let rating = tables.push_rating(user_id, movie_id, score)?;
            Ok((rating, RatingChange::Inserted))
        }
    }
}
