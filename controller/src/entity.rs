// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::models::{Movie, Rating, User};
use std::collections::BTreeMap;

pub trait Entity {
    type Id;

    fn get_id(&self) -> Self::Id;
    fn get_data(&self) -> BTreeMap<String, String> {
        Default::default()
    }
}

impl Entity for User {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    // The password hash never leaves the store
    fn get_data(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();

        if let Some(email) = &self.email {
            data.insert("email".into(), email.clone());
        }

        if let Some(age) = self.age {
            data.insert("age".into(), age.to_string());
        }

        if let Some(zipcode) = &self.zipcode {
            data.insert("zipcode".into(), zipcode.clone());
        }

        data
    }
}

impl Entity for Movie {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }

    fn get_data(&self) -> BTreeMap<String, String> {
        let mut data = BTreeMap::new();
        data.insert("title".into(), self.title.clone());

        if let Some(released_at) = self.released_at {
            data.insert("released".into(), released_at.format("%d %b %Y").to_string());
        }

        if let Some(imdb_url) = &self.imdb_url {
            data.insert("imdb".into(), imdb_url.clone());
        }

        data
    }
}

impl Entity for Rating {
    type Id = i32;

    fn get_id(&self) -> Self::Id {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn user_data_hides_password() {
        let user = User {
            id: 3,
            email: Some("a@b.c".into()),
            password_hash: Some("$argon2id$...".into()),
            age: Some(30),
            zipcode: None,
        };

        let data = user.get_data();
        assert_eq!(user.get_id(), 3);
        assert_eq!(data.get("email").map(String::as_str), Some("a@b.c"));
        assert_eq!(data.get("age").map(String::as_str), Some("30"));
        assert!(data.values().all(|v| !v.contains("argon2")));
    }

    #[test]
    fn movie_data() {
        let movie = Movie {
            id: 1,
            title: "Toy Story".into(),
            released_at: NaiveDate::from_ymd_opt(1995, 1, 1),
            imdb_url: None,
        };

        let data = movie.get_data();
        assert_eq!(data["released"], "01 Jan 1995");
        assert!(!data.contains_key("imdb"));
    }
}
