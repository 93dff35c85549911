// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use std::fmt::{self, Display};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SearchBy {
    Id(String),
    Email(String),
    Title(String),
}

impl SearchBy {
    pub fn id(id: &str) -> Self {
        Self::Id(id.into())
    }

    pub fn email(email: &str) -> Self {
        Self::Email(email.into())
    }

    pub fn title(title: &str) -> Self {
        Self::Title(title.into())
    }

    /// Parse the id carried by `SearchBy::Id`
    pub fn parse_id(id: &str) -> Result<i32, ErrorKind> {
        id.trim()
            .parse()
            .map_err(|_| ErrorKind::InvalidId(id.into()))
    }
}

impl Display for SearchBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchBy::Id(id) => write!(f, "id({})", id),
            SearchBy::Email(email) => write!(f, "email({})", email),
            SearchBy::Title(title) => write!(f, "title({})", title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_search() {
        assert_eq!(SearchBy::id("3").to_string(), "id(3)");
        assert_eq!(SearchBy::email("a@b.c").to_string(), "email(a@b.c)");
    }

    #[test]
    fn parse_ids() {
        assert_eq!(SearchBy::parse_id(" 42 "), Ok(42));
        assert_eq!(SearchBy::parse_id("x"), Err(ErrorKind::InvalidId("x".into())));
    }
}
