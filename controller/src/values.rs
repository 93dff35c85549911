// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

/// Date formats accepted for date fields, the first one is the dataset one
pub const DATE_FORMATS: [&str; 2] = ["%d-%b-%Y", "%Y-%m-%d"];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Type {
    String,
    Secret,
    Int32,
    Date,
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::String => write!(f, "string"),
            Type::Secret => write!(f, "secret"),
            Type::Int32 => write!(f, "integer"),
            Type::Date => write!(f, "date"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Field<'a> {
    Required(&'a str, Type),
    Optional(&'a str, Type),
}

impl<'a> Field<'a> {
    pub fn is_optional(&self) -> bool {
        matches!(self, Field::Optional(..))
    }

    pub fn name(&self) -> &'a str {
        match self {
            Field::Required(name, _) | Field::Optional(name, _) => name,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Field::Required(_, ty) | Field::Optional(_, ty) => *ty,
        }
    }

    pub fn into_tuple(self) -> (&'a str, Type) {
        match self {
            Field::Required(name, ty) | Field::Optional(name, ty) => (name, ty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int32(i32),
    Date(NaiveDate),
}

impl Value {
    pub fn from_str(value: &str, tp: Type) -> Result<Self, ErrorKind> {
        let value = match tp {
            Type::String | Type::Secret => Self::String(value.to_owned()),

            Type::Int32 => {
                let value: i32 = value
                    .trim()
                    .parse()
                    .map_err(|e: <i32 as FromStr>::Err| ErrorKind::ValueConvert(e.to_string()))?;
                Self::Int32(value)
            }

            Type::Date => {
                let value = DATE_FORMATS
                    .iter()
                    .find_map(|fmt| NaiveDate::parse_from_str(value.trim(), fmt).ok())
                    .ok_or_else(|| ErrorKind::ValueConvert(format!("Invalid date {}", value)))?;
                Self::Date(value)
            }
        };

        Ok(value)
    }

    pub fn as_string(&self) -> Result<&str, ErrorKind> {
        match self {
            Self::String(s) => Ok(s),
            _ => Err(ErrorKind::CastingValue("String")),
        }
    }

    pub fn as_i32(&self) -> Result<i32, ErrorKind> {
        match self {
            Self::Int32(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("i32")),
        }
    }

    pub fn as_date(&self) -> Result<NaiveDate, ErrorKind> {
        match self {
            Self::Date(v) => Ok(*v),
            _ => Err(ErrorKind::CastingValue("NaiveDate")),
        }
    }
}

pub type Prototype<'a> = HashMap<&'a str, Value>;

/// Build a prototype out of raw string inputs (e.g. a submitted form), empty
/// inputs count as missing.
pub fn build_prototype<'a>(
    fields: Vec<Field<'a>>,
    inputs: &HashMap<String, String>,
) -> Result<Prototype<'a>, ErrorKind> {
    let mut prototype = HashMap::new();

    for field in fields {
        let is_optional = field.is_optional();
        let (name, ty) = field.into_tuple();

        match inputs.get(name).filter(|input| !input.trim().is_empty()) {
            Some(input) => {
                prototype.insert(name, Value::from_str(input, ty)?);
            }

            None if is_optional => {}

            None => return Err(ErrorKind::MissingField(name.into())),
        }
    }

    Ok(prototype)
}

pub(crate) fn required_string(proto: &Prototype, name: &str) -> Result<String, ErrorKind> {
    proto
        .get(name)
        .ok_or_else(|| ErrorKind::MissingField(name.into()))?
        .as_string()
        .map(|s| s.trim().to_owned())
}

pub(crate) fn optional_string(proto: &Prototype, name: &str) -> Result<Option<String>, ErrorKind> {
    proto
        .get(name)
        .map(|v| v.as_string().map(|s| s.trim().to_owned()))
        .transpose()
}

pub(crate) fn optional_i32(proto: &Prototype, name: &str) -> Result<Option<i32>, ErrorKind> {
    proto.get(name).map(Value::as_i32).transpose()
}

pub(crate) fn optional_date(proto: &Prototype, name: &str) -> Result<Option<NaiveDate>, ErrorKind> {
    proto.get(name).map(Value::as_date).transpose()
}
