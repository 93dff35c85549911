//! Readers for the MovieLens 100k files (`u.user`, `u.item` and `u.data`)
//! and a loader that pushes them through any `Controller`.

use anyhow::Error;
use chrono::NaiveDate;
use config::JudgmentConfig;
use controller::{Controller, NewMovie, NewUser};
use csv::{ByteRecord, ReaderBuilder};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const USERS_FILE: &str = "u.user";
pub const MOVIES_FILE: &str = "u.item";
pub const RATINGS_FILE: &str = "u.data";

const RELEASE_DATE_FORMAT: &str = "%d-%b-%Y";

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetUser {
    pub id: i32,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetMovie {
    pub id: i32,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetRating {
    pub user_id: i32,
    pub movie_id: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: Vec<DatasetUser>,
    pub movies: Vec<DatasetMovie>,
    pub ratings: Vec<DatasetRating>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LoadSummary {
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
    pub skipped: usize,
}

impl Dataset {
    /// Read the three dataset files from a directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, Error> {
        let dir = dir.as_ref();

        Ok(Self {
            users: read_users(File::open(dir.join(USERS_FILE))?)?,
            movies: read_movies(File::open(dir.join(MOVIES_FILE))?)?,
            ratings: read_ratings(File::open(dir.join(RATINGS_FILE))?)?,
        })
    }
}

// The dataset is latin-1 encoded and never quotes fields
fn records<R: Read>(rdr: R, delimiter: u8) -> impl Iterator<Item = Result<ByteRecord, csv::Error>> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter)
        .from_reader(rdr)
        .into_byte_records()
}

fn field(record: &ByteRecord, index: usize) -> Option<String> {
    record
        .get(index)
        .map(|raw| String::from_utf8_lossy(raw).trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn required_id(record: &ByteRecord, index: usize) -> Result<i32, Error> {
    let raw = field(record, index).ok_or_else(|| anyhow::anyhow!("Missing column {}", index))?;
    Ok(raw.parse()?)
}

/// Drop the trailing " (YYYY)" the dataset appends to every title
pub fn strip_year(title: &str) -> &str {
    match title.rsplit_once(" (") {
        Some((name, year))
            if year.len() == 5
                && year.ends_with(')')
                && year.as_bytes()[..4].iter().all(u8::is_ascii_digit) =>
        {
            name
        }
        _ => title,
    }
}

/// `user id | age | gender | occupation | zip code`
pub fn read_users<R: Read>(rdr: R) -> Result<Vec<DatasetUser>, Error> {
    let mut users = Vec::new();

    for record in records(rdr, b'|') {
        let record = record?;
        users.push(DatasetUser {
            id: required_id(&record, 0)?,
            age: field(&record, 1).and_then(|age| age.parse().ok()),
            zipcode: field(&record, 4),
        });
    }

    Ok(users)
}

/// `movie id | title | release date | video release date | IMDb URL | genres...`
pub fn read_movies<R: Read>(rdr: R) -> Result<Vec<DatasetMovie>, Error> {
    let mut movies = Vec::new();

    for record in records(rdr, b'|') {
        let record = record?;
        let title = field(&record, 1).unwrap_or_default();

        movies.push(DatasetMovie {
            id: required_id(&record, 0)?,
            title: strip_year(&title).to_owned(),
            released_at: field(&record, 2)
                .and_then(|date| NaiveDate::parse_from_str(&date, RELEASE_DATE_FORMAT).ok()),
            imdb_url: field(&record, 4),
        });
    }

    Ok(movies)
}

/// `user id \t item id \t rating \t timestamp`
pub fn read_ratings<R: Read>(rdr: R) -> Result<Vec<DatasetRating>, Error> {
    let mut ratings = Vec::new();

    for record in records(rdr, b'\t') {
        let record = record?;
        ratings.push(DatasetRating {
            user_id: required_id(&record, 0)?,
            movie_id: required_id(&record, 1)?,
            score: required_id(&record, 2)?,
        });
    }

    Ok(ratings)
}

fn progress(len: usize, msg: &str, visible: bool) -> ProgressBar {
    let pb = if visible {
        ProgressBar::new(len as u64)
    } else {
        ProgressBar::hidden()
    };

    pb.set_style(ProgressStyle::default_bar().template("{msg} [{bar:40}] {pos}/{len} ({eta})"));
    pb.set_message(msg);
    pb
}

/// Insert the whole dataset through `controller`, dataset ids get remapped
/// to whatever ids the store hands out. Ratings pointing to unknown users or
/// movies, or that the store refuses, are skipped.
///
/// Unless the eye already exists, the dataset user `eye.eye_user` is stored
/// under the eye's email (still without password) so the eye judges with
/// real ratings. When that user isn't in the dataset the eye is registered
/// alone.
pub fn load_into<C: Controller>(
    controller: &C,
    dataset: &Dataset,
    eye: Option<&JudgmentConfig>,
    show_progress: bool,
) -> Result<LoadSummary, Error> {
    let mut summary = LoadSummary::default();

    let mut pending_eye = match eye {
        Some(eye) if controller.user_by_email(&eye.eye_email)?.is_none() => Some(eye),
        _ => None,
    };

    let pb = progress(dataset.users.len(), "users", show_progress);
    let mut user_ids = HashMap::new();
    for user in &dataset.users {
        let mut new_user = NewUser::anonymous(user.age, user.zipcode.clone());

        let adopted = pending_eye.filter(|eye| eye.eye_user == user.id);
        if let Some(eye) = adopted {
            new_user.email = Some(eye.eye_email.clone());
            pending_eye = None;
        }

        let inserted = controller.insert_new_user(new_user)?;
        if adopted.is_some() {
            log::info!("The eye takes over dataset user({}) as user({})", user.id, inserted.id);
        }

        user_ids.insert(user.id, inserted.id);
        summary.users += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let pb = progress(dataset.movies.len(), "movies", show_progress);
    let mut movie_ids = HashMap::new();
    for movie in &dataset.movies {
        let inserted = controller.insert_new_movie(NewMovie {
            title: movie.title.clone(),
            released_at: movie.released_at,
            imdb_url: movie.imdb_url.clone(),
        })?;
        movie_ids.insert(movie.id, inserted.id);
        summary.movies += 1;
        pb.inc(1);
    }
    pb.finish_and_clear();

    let pb = progress(dataset.ratings.len(), "ratings", show_progress);
    for rating in &dataset.ratings {
        pb.inc(1);

        let ids = (user_ids.get(&rating.user_id), movie_ids.get(&rating.movie_id));
        let (user_id, movie_id) = match ids {
            (Some(user_id), Some(movie_id)) => (*user_id, *movie_id),
            _ => {
                log::warn!(
                    "Skipping rating of unknown user({}) or movie({})",
                    rating.user_id,
                    rating.movie_id
                );
                summary.skipped += 1;
                continue;
            }
        };

        match controller.insert_rating(user_id, movie_id, rating.score) {
            Ok(_) => summary.ratings += 1,
            Err(e) => {
                log::warn!("Skipping rating: {}", e);
                summary.skipped += 1;
            }
        }
    }
    pb.finish_and_clear();

    if let Some(eye) = pending_eye {
        let new_eye = NewUser {
            email: Some(eye.eye_email.clone()),
            ..NewUser::anonymous(None, None)
        };

        let inserted = controller.insert_new_user(new_eye)?;
        log::warn!(
            "Dataset user({}) not found, the eye was registered as user({}) without ratings",
            eye.eye_user,
            inserted.id
        );
    }

    log::info!(
        "Loaded {} users, {} movies and {} ratings ({} skipped)",
        summary.users,
        summary.movies,
        summary.ratings,
        summary.skipped
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use controller::{MemoryController, SearchBy};
    use engine::{Engine, DEFAULT_MESSAGES};

    const USERS: &str = "1|24|M|technician|85711\n2|53|F|other|94043\n";

    const MOVIES: &[u8] = b"1|Toy Story (1995)|01-Jan-1995||http://us.imdb.com/M/title-exact?Toy%20Story%20(1995)|0|0|0|1|1|1|0|0|0|0|0|0|0|0|0|0|0|0|0\n\
267|unknown||||1|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0|0\n\
1300|'Til There Was You (1997)|30-May-1997||http://us.imdb.com/M/title-exact?'Til%20There%20Was%20You%20(1997)|0|0|0|0|0|0|0|0|1|0|0|0|0|0|0|1|0|0|0\n\
1536|Aiqing wansui (1994)|22-Jul-1996||http://us.imdb.com/M/title-exact?Aiqing%20Wansui%20(1994)|0|0|0|0|0|0|0|0|1|0|0|0|0|0|0|0|0|0|0\n";

    const RATINGS: &str = "1\t1\t5\t874965758\n2\t1\t3\t888550871\n2\t267\t4\t888550871\n9\t1\t1\t888550871\n";

    #[test]
    fn strips_years() {
        assert_eq!(strip_year("Toy Story (1995)"), "Toy Story");
        assert_eq!(strip_year("Toy Story"), "Toy Story");
        assert_eq!(
            strip_year("Three Colors: Red (Trois couleurs: Rouge) (1994)"),
            "Three Colors: Red (Trois couleurs: Rouge)"
        );
        assert_eq!(strip_year("Dead Man (Walking)"), "Dead Man (Walking)");
    }

    #[test]
    fn reads_users() -> Result<(), Error> {
        let users = read_users(USERS.as_bytes())?;

        assert_eq!(users.len(), 2);
        assert_eq!(
            users[0],
            DatasetUser {
                id: 1,
                age: Some(24),
                zipcode: Some("85711".into()),
            }
        );

        Ok(())
    }

    #[test]
    fn reads_movies() -> Result<(), Error> {
        let movies = read_movies(MOVIES)?;

        assert_eq!(movies.len(), 4);
        assert_eq!(movies[0].title, "Toy Story");
        assert_eq!(movies[0].released_at, NaiveDate::from_ymd_opt(1995, 1, 1));
        assert!(movies[0].imdb_url.as_deref().unwrap().starts_with("http://us.imdb.com"));

        assert_eq!(movies[1].title, "unknown");
        assert_eq!(movies[1].released_at, None);
        assert_eq!(movies[1].imdb_url, None);

        assert_eq!(movies[2].title, "'Til There Was You");

        Ok(())
    }

    #[test]
    fn reads_ratings() -> Result<(), Error> {
        let ratings = read_ratings(RATINGS.as_bytes())?;

        assert_eq!(ratings.len(), 4);
        assert_eq!(
            ratings[0],
            DatasetRating {
                user_id: 1,
                movie_id: 1,
                score: 5,
            }
        );

        Ok(())
    }

    #[test]
    fn broken_ids_fail() {
        assert!(read_ratings("x\t1\t5\t0\n".as_bytes()).is_err());
    }

    fn judgment(eye_user: i32) -> JudgmentConfig {
        JudgmentConfig {
            eye_user,
            ..JudgmentConfig::default()
        }
    }

    fn movie(id: i32, title: &str) -> DatasetMovie {
        DatasetMovie {
            id,
            title: title.into(),
            released_at: None,
            imdb_url: None,
        }
    }

    fn rating(user_id: i32, movie_id: i32, score: i32) -> DatasetRating {
        DatasetRating {
            user_id,
            movie_id,
            score,
        }
    }

    #[test]
    fn loads_into_controller() -> Result<(), Error> {
        let dataset = Dataset {
            users: read_users(USERS.as_bytes())?,
            movies: read_movies(MOVIES)?,
            ratings: read_ratings(RATINGS.as_bytes())?,
        };

        let controller = MemoryController::new();
        let summary = load_into(&controller, &dataset, Some(&judgment(2)), false)?;

        assert_eq!(
            summary,
            LoadSummary {
                users: 2,
                movies: 4,
                ratings: 3,
                skipped: 1,
            }
        );

        // Movie 267 was the second inserted one
        assert_eq!(controller.rating(2, 2)?.map(|r| r.score), Some(4));

        // The eye is dataset user 2 and keeps its ratings
        let eye = controller.user_by_email("the-eye@of-judgment.com")?.unwrap();
        assert_eq!(eye.id, 2);
        assert_eq!(eye.age, Some(53));
        assert_eq!(eye.password_hash, None);
        assert_eq!(controller.ratings_by(eye.id)?.len(), 2);

        // Loading again doesn't register a second eye
        load_into(&controller, &dataset, Some(&judgment(2)), false)?;
        assert_eq!(controller.users()?.len(), 4);
        assert_eq!(controller.users_by(&SearchBy::email("the-eye@of-judgment.com"))?.len(), 1);

        Ok(())
    }

    #[test]
    fn eye_without_dataset_user() -> Result<(), Error> {
        let dataset = Dataset {
            users: read_users(USERS.as_bytes())?,
            ..Dataset::default()
        };

        let controller = MemoryController::new();
        load_into(&controller, &dataset, Some(&judgment(99)), false)?;

        let eye = controller.user_by_email("the-eye@of-judgment.com")?.unwrap();
        assert_eq!(eye.id, 3);
        assert!(controller.ratings_by(eye.id)?.is_empty());

        let controller = MemoryController::new();
        load_into(&controller, &dataset, None, false)?;
        assert_eq!(controller.user_by_email("the-eye@of-judgment.com")?, None);

        Ok(())
    }

    #[test]
    fn seeded_eye_judges_viewers() -> Result<(), Error> {
        // Dataset users 1 and 2 share the same taste, only 2 saw "Heat"
        let dataset = Dataset {
            users: read_users(USERS.as_bytes())?,
            movies: vec![movie(1, "Alien"), movie(2, "Brazil"), movie(3, "Heat")],
            ratings: vec![
                rating(1, 1, 1),
                rating(1, 2, 5),
                rating(2, 1, 1),
                rating(2, 2, 5),
                rating(2, 3, 2),
            ],
        };

        let controller = MemoryController::new();
        load_into(&controller, &dataset, Some(&judgment(1)), false)?;

        let viewer = controller.insert_new_user(NewUser::anonymous(None, None))?;
        controller.save_rating(viewer.id, 1, 5)?;
        controller.save_rating(viewer.id, 3, 4)?;

        let eye = controller.user_by_email("the-eye@of-judgment.com")?.map(|u| u.id);
        let engine = Engine::with_controller(&controller);

        // The eye rated "Alien" itself
        let outlook = engine.movie_outlook(1, Some(viewer.id), eye)?;
        assert_eq!(outlook.eye_score, Some(1.0));
        assert_eq!(outlook.beratement.as_deref(), Some(DEFAULT_MESSAGES[4]));

        // and guesses "Heat" from dataset user 2
        let outlook = engine.movie_outlook(3, Some(viewer.id), eye)?;
        assert_approx_eq!(outlook.eye_score.unwrap(), 2.0);
        assert_eq!(outlook.beratement.as_deref(), Some(DEFAULT_MESSAGES[2]));

        Ok(())
    }
}
