// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::credentials::hash_password;
use crate::error::ErrorKind;
use crate::values::{optional_date, optional_i32, optional_string, required_string, Prototype};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct User {
    pub id: i32,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating {
    pub id: i32,
    pub user_id: i32,
    pub movie_id: i32,
    pub score: i32,
}

/// What `save_rating` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingChange {
    Inserted,
    Updated,
}

// A user ready to be stored, the password is already hashed
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub age: Option<i32>,
    pub zipcode: Option<String>,
}

impl NewUser {
    /// Validate a registration prototype and hash its password.
    ///
    /// `email` and `password` are required, `age` and `zipcode` are optional.
    pub fn from_proto(proto: &Prototype) -> Result<Self, ErrorKind> {
        let email = required_string(proto, "email")?;
        if !is_valid_email(&email) {
            return Err(ErrorKind::InvalidEmail(email));
        }

        let password = proto
            .get("password")
            .ok_or_else(|| ErrorKind::MissingField("password".into()))?
            .as_string()?;
        if password.is_empty() {
            return Err(ErrorKind::MissingField("password".into()));
        }

        Ok(Self {
            email: Some(email),
            password_hash: Some(hash_password(password)?),
            age: optional_i32(proto, "age")?,
            zipcode: optional_string(proto, "zipcode")?,
        })
    }

    /// A user without credentials, like the ones coming from a dataset
    pub fn anonymous(age: Option<i32>, zipcode: Option<String>) -> Self {
        Self {
            email: None,
            password_hash: None,
            age,
            zipcode,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub released_at: Option<NaiveDate>,
    pub imdb_url: Option<String>,
}

impl NewMovie {
    pub fn from_proto(proto: &Prototype) -> Result<Self, ErrorKind> {
        let title = required_string(proto, "title")?;
        if title.is_empty() {
            return Err(ErrorKind::MissingField("title".into()));
        }

        Ok(Self {
            title,
            released_at: optional_date(proto, "released_at")?,
            imdb_url: optional_string(proto, "imdb_url")?,
        })
    }
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::verify_password;
    use crate::values::Value;
    use anyhow::Error;
    use common_macros::hash_map;

    #[test]
    fn new_user_hashes_password() -> Result<(), Error> {
        let proto = hash_map! {
            "email" => Value::String(" quebin31@gmail.com ".into()),
            "password" => Value::String("hunter2".into()),
            "age" => Value::Int32(22),
        };

        let new_user = NewUser::from_proto(&proto)?;
        assert_eq!(new_user.email.as_deref(), Some("quebin31@gmail.com"));
        assert_eq!(new_user.age, Some(22));
        assert_eq!(new_user.zipcode, None);

        let hash = new_user.password_hash.clone().unwrap();
        assert_ne!(hash, "hunter2");

        let user = User {
            id: 1,
            email: new_user.email,
            password_hash: new_user.password_hash,
            ..Default::default()
        };
        assert!(verify_password(&user, "hunter2"));

        Ok(())
    }

    #[test]
    fn new_user_rejects_bad_input() {
        let proto = hash_map! {
            "email" => Value::String("not-an-email".into()),
            "password" => Value::String("hunter2".into()),
        };
        assert_eq!(
            NewUser::from_proto(&proto),
            Err(ErrorKind::InvalidEmail("not-an-email".into()))
        );

        let proto = hash_map! {
            "email" => Value::String("a@b.c".into()),
            "password" => Value::String("".into()),
        };
        assert_eq!(
            NewUser::from_proto(&proto),
            Err(ErrorKind::MissingField("password".into()))
        );
    }

    #[test]
    fn new_movie_from_proto() -> Result<(), Error> {
        let proto = hash_map! {
            "title" => Value::String("Toy Story".into()),
            "released_at" => Value::from_str("01-Jan-1995", crate::Type::Date)?,
        };

        let movie = NewMovie::from_proto(&proto)?;
        assert_eq!(movie.title, "Toy Story");
        assert_eq!(movie.released_at, NaiveDate::from_ymd_opt(1995, 1, 1));
        assert_eq!(movie.imdb_url, None);

        Ok(())
    }
}
