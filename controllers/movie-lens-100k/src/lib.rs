#[macro_use]
extern crate diesel;

pub mod dataset;
pub mod models;
pub mod schema;

use crate::models::{MovieRow, NewMovieRow, NewRatingRow, NewUserRow, RatingRow, UserRow};
use crate::schema::{movies, ratings, users};
use anyhow::Error;
use controller::{
    error::ErrorKind, Controller, MapedRatings, Movie, NewMovie, NewUser, Rating, RatingChange,
    Ratings, SearchBy, User,
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PooledConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{insert_into, update};

pub type PgPool = Pool<ConnectionManager<PgConnection>>;
type PgPooled = PooledConnection<ConnectionManager<PgConnection>>;

pub fn establish_pool(url: &str, pool_size: u32) -> Result<PgPool, Error> {
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder().max_size(pool_size).build(manager)?;

    Ok(pool)
}

#[derive(Clone)]
pub struct MovieLensController {
    pool: PgPool,
}

impl MovieLensController {
    /// Connect using `DATABASE_URL` (from the environment or a `.env` file)
    pub fn new() -> Result<Self, Error> {
        let url = dotenv::var("DATABASE_URL")?;
        Self::with_url(&url, 8)
    }

    pub fn with_url(url: &str, pool_size: u32) -> Result<Self, Error> {
        let pool = establish_pool(url, pool_size)?;
        log::info!("Connected to postgres with a pool of {} connections", pool_size);

        Ok(Self { pool })
    }

    fn conn(&self) -> Result<PgPooled, Error> {
        Ok(self.pool.get()?)
    }
}

fn rating_filter(
    user_id: i32,
    movie_id: i32,
) -> diesel::dsl::Filter<
    diesel::dsl::Filter<ratings::table, diesel::dsl::Eq<ratings::user_id, i32>>,
    diesel::dsl::Eq<ratings::movie_id, i32>,
> {
    ratings::table
        .filter(ratings::user_id.eq(user_id))
        .filter(ratings::movie_id.eq(movie_id))
}

fn find_rating(conn: &PgPooled, user_id: i32, movie_id: i32) -> Result<Option<Rating>, Error> {
    let rating = rating_filter(user_id, movie_id)
        .first::<RatingRow>(conn)
        .optional()?;

    Ok(rating.map(Into::into))
}

fn create_rating(conn: &PgPooled, user_id: i32, movie_id: i32, score: i32) -> Result<Rating, Error> {
    let new_rating = NewRatingRow {
        movie_id,
        user_id,
        score,
    };

    let inserted = insert_into(ratings::table)
        .values(&new_rating)
        .get_result::<RatingRow>(conn);

    match inserted {
        Ok(row) => Ok(row.into()),

        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _))
        | Err(DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _)) => {
            Err(ErrorKind::InsertRatingFailed(user_id.to_string(), movie_id.to_string()).into())
        }

        Err(e) => Err(e.into()),
    }
}

fn change_rating(conn: &PgPooled, user_id: i32, movie_id: i32, score: i32) -> Result<Rating, Error> {
    let updated = update(rating_filter(user_id, movie_id))
        .set(ratings::score.eq(score))
        .get_result::<RatingRow>(conn)
        .optional()?;

    updated
        .map(Into::into)
        .ok_or_else(|| ErrorKind::UpdateRatingFailed(user_id.to_string(), movie_id.to_string()).into())
}

impl Controller for MovieLensController {
    fn users(&self) -> Result<Vec<User>, Error> {
        let conn = self.conn()?;
        let users = users::table
            .order(users::user_id.asc())
            .load::<UserRow>(&conn)?;

        Ok(users.into_iter().map(Into::into).collect())
    }

    fn users_by(&self, by: &SearchBy) -> Result<Vec<User>, Error> {
        let conn = self.conn()?;

        let users = match by {
            SearchBy::Id(id) => {
                let id = SearchBy::parse_id(id)?;
                users::table
                    .filter(users::user_id.eq(id))
                    .load::<UserRow>(&conn)?
            }

            SearchBy::Email(email) => users::table
                .filter(users::email.eq(email.as_str()))
                .load::<UserRow>(&conn)?,

            SearchBy::Title(_) => {
                return Err(ErrorKind::UnsupportedSearch("title".into()).into());
            }
        };

        Ok(users.into_iter().map(Into::into).collect())
    }

    fn movies(&self) -> Result<Vec<Movie>, Error> {
        let conn = self.conn()?;
        let movies = movies::table
            .order((movies::title.asc(), movies::movie_id.asc()))
            .load::<MovieRow>(&conn)?;

        Ok(movies.into_iter().map(Into::into).collect())
    }

    fn movies_by(&self, by: &SearchBy) -> Result<Vec<Movie>, Error> {
        let conn = self.conn()?;

        let movies = match by {
            SearchBy::Id(id) => {
                let id = SearchBy::parse_id(id)?;
                movies::table
                    .filter(movies::movie_id.eq(id))
                    .load::<MovieRow>(&conn)?
            }

            SearchBy::Title(title) => movies::table
                .filter(movies::title.eq(title.as_str()))
                .load::<MovieRow>(&conn)?,

            SearchBy::Email(_) => {
                return Err(ErrorKind::UnsupportedSearch("email".into()).into());
            }
        };

        Ok(movies.into_iter().map(Into::into).collect())
    }

    fn user_ratings(&self, user_id: i32) -> Result<Vec<(Rating, Movie)>, Error> {
        let conn = self.conn()?;
        let rows = ratings::table
            .inner_join(movies::table)
            .filter(ratings::user_id.eq(user_id))
            .order(movies::title.asc())
            .load::<(RatingRow, MovieRow)>(&conn)?;

        Ok(rows
            .into_iter()
            .map(|(rating, movie)| (rating.into(), movie.into()))
            .collect())
    }

    fn movie_ratings(&self, movie_id: i32) -> Result<Vec<Rating>, Error> {
        let conn = self.conn()?;
        let ratings = ratings::table
            .filter(ratings::movie_id.eq(movie_id))
            .order(ratings::user_id.asc())
            .load::<RatingRow>(&conn)?;

        Ok(ratings.into_iter().map(Into::into).collect())
    }

    fn rating(&self, user_id: i32, movie_id: i32) -> Result<Option<Rating>, Error> {
        let conn = self.conn()?;
        find_rating(&conn, user_id, movie_id)
    }

    fn ratings_by(&self, user_id: i32) -> Result<Ratings<i32>, Error> {
        let conn = self.conn()?;
        let ratings = ratings::table
            .filter(ratings::user_id.eq(user_id))
            .load::<RatingRow>(&conn)?
            .iter()
            .map(|rating| (rating.movie_id, f64::from(rating.score)))
            .collect();

        Ok(ratings)
    }

    fn maped_ratings_by(&self, user_ids: &[i32]) -> Result<MapedRatings<i32, i32>, Error> {
        let conn = self.conn()?;
        let ratings = ratings::table
            .filter(ratings::user_id.eq_any(user_ids.to_vec()))
            .load::<RatingRow>(&conn)?;

        let mut maped_ratings = MapedRatings::new();
        for rating in ratings {
            maped_ratings
                .entry(rating.user_id)
                .or_insert_with(Ratings::new)
                .insert(rating.movie_id, f64::from(rating.score));
        }

        Ok(maped_ratings)
    }

    fn insert_new_user(&self, new_user: NewUser) -> Result<User, Error> {
        let conn = self.conn()?;
        let inserted = insert_into(users::table)
            .values(&NewUserRow::from(&new_user))
            .get_result::<UserRow>(&conn);

        match inserted {
            Ok(row) => Ok(row.into()),

            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                let email = new_user.email.unwrap_or_default();
                Err(ErrorKind::DuplicateEmail(email).into())
            }

            Err(e) => Err(e.into()),
        }
    }

    fn insert_new_movie(&self, new_movie: NewMovie) -> Result<Movie, Error> {
        let conn = self.conn()?;
        let movie = insert_into(movies::table)
            .values(&NewMovieRow::from(&new_movie))
            .get_result::<MovieRow>(&conn)?;

        Ok(movie.into())
    }

    fn insert_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating, Error> {
        self.check_score(score)?;

        let conn = self.conn()?;
        create_rating(&conn, user_id, movie_id, score)
    }

    fn update_rating(&self, user_id: i32, movie_id: i32, score: i32) -> Result<Rating, Error> {
        self.check_score(score)?;

        let conn = self.conn()?;
        change_rating(&conn, user_id, movie_id, score)
    }

    fn save_rating(
        &self,
        user_id: i32,
        movie_id: i32,
        score: i32,
    ) -> Result<(Rating, RatingChange), Error> {
        self.check_score(score)?;

        let conn = self.conn()?;
        conn.transaction::<_, Error, _>(|| match find_rating(&conn, user_id, movie_id)? {
            Some(_) => {
                let rating = change_rating(&conn, user_id, movie_id, score)?;
                Ok((rating, RatingChange::Updated))
            }

            None => {
                let rating = create_rating(&conn, user_id, movie_id, score)?;
                Ok((rating, RatingChange::Inserted))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use controller::{Prototype, Value};

    // These need a migrated database, run them with
    // `DATABASE_URL=... cargo test -- --ignored`
    fn controller() -> Result<MovieLensController, Error> {
        MovieLensController::new()
    }

    fn unique_email() -> String {
        format!("user-{}@example.com", chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default())
    }

    #[test]
    #[ignore]
    fn register_and_query_user() -> Result<(), Error> {
        let controller = controller()?;
        let email = unique_email();

        let mut proto = Prototype::new();
        proto.insert("email", Value::String(email.clone()));
        proto.insert("password", Value::String("hunter2".into()));

        let user = controller.insert_user(proto.clone())?;
        let found = controller.user_by_email(&email)?;
        assert_eq!(found.map(|u| u.id), Some(user.id));

        let err = controller.insert_user(proto).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ErrorKind>(),
            Some(&ErrorKind::DuplicateEmail(email))
        );

        Ok(())
    }

    #[test]
    #[ignore]
    fn register_long_email() -> Result<(), Error> {
        let controller = controller()?;
        let email = format!("{}.{}", "a".repeat(80), unique_email());

        let mut proto = Prototype::new();
        proto.insert("email", Value::String(email.clone()));
        proto.insert("password", Value::String("hunter2".into()));

        let user = controller.insert_user(proto)?;
        assert_eq!(user.email.as_deref(), Some(email.as_str()));
        assert!(controller.user_by_email(&email)?.is_some());

        Ok(())
    }

    #[test]
    #[ignore]
    fn rate_twice_keeps_one_rating() -> Result<(), Error> {
        let controller = controller()?;

        let user = controller.insert_new_user(NewUser::anonymous(Some(30), None))?;
        let movie = controller.insert_new_movie(NewMovie {
            title: "Brazil".into(),
            released_at: None,
            imdb_url: None,
        })?;

        let (_, change) = controller.save_rating(user.id, movie.id, 2)?;
        assert_eq!(change, RatingChange::Inserted);

        let (rating, change) = controller.save_rating(user.id, movie.id, 5)?;
        assert_eq!(change, RatingChange::Updated);
        assert_eq!(rating.score, 5);

        assert_eq!(controller.movie_ratings(movie.id)?.len(), 1);
        assert_eq!(controller.user_ratings(user.id)?[0].1.title, "Brazil");

        Ok(())
    }
}
