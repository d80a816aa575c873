//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce basic invariants (trimmed, non-empty text and
//! well-formed calendar dates) so that once a value reaches the domain layer it
//! can be treated as trusted. Identifiers are opaque strings assigned by the
//! remote data service; the tracker never inspects their structure.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format used for calendar dates on the wire and in HTML date inputs.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided identifier was blank.
    #[error("identifier cannot be empty")]
    EmptyId,
    /// Provided date was not a valid `YYYY-MM-DD` calendar date.
    #[error("invalid date: {0}")]
    InvalidDate(String),
}

/// Wrapper for non-empty, trimmed strings.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Trims whitespace and rejects empty inputs.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper returning the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Macro to generate opaque, server-assigned string identifiers.
macro_rules! string_id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Wraps a raw identifier, rejecting blank values.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(TypeConstraintError::EmptyId);
                }
                Ok(Self(value))
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = TypeConstraintError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_id_newtype!(EventId, "Identifier of an event row, assigned by the remote service.");
string_id_newtype!(DishId, "Identifier of a dish row, assigned by the remote service.");

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                let inner = NonEmptyString::new(value)?;
                Ok(Self(inner.into_inner()))
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

non_empty_string_newtype!(EventName, "Event title enforcing trimmed, non-empty values.");

non_empty_string_newtype!(DishName, "Dish label enforcing trimmed, non-empty values.");

non_empty_string_newtype!(
    ClaimantName,
    "Name of the person who claimed a dish, enforcing trimmed, non-empty values."
);

impl ClaimantName {
    /// Normalizes free-text claim input: blank input means "unclaimed".
    pub fn from_input(value: &str) -> Option<Self> {
        Self::new(value).ok()
    }
}

/// Parses a `YYYY-MM-DD` calendar date as typed into a date input.
pub fn parse_event_date(value: &str) -> Result<NaiveDate, TypeConstraintError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TypeConstraintError::EmptyString);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| TypeConstraintError::InvalidDate(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_reject_blank_values() {
        assert_eq!(EventId::new("  "), Err(TypeConstraintError::EmptyId));
        assert_eq!(DishId::new("").unwrap_err(), TypeConstraintError::EmptyId);
        let id: DishId = "1f0c".parse().unwrap();
        assert_eq!(id.as_str(), "1f0c");
    }

    #[test]
    fn names_are_trimmed() {
        let name = EventName::new("  Thanksgiving ").unwrap();
        assert_eq!(name.as_str(), "Thanksgiving");
        assert_eq!(DishName::new("\t\n"), Err(TypeConstraintError::EmptyString));
    }

    #[test]
    fn blank_claimant_input_is_unclaimed() {
        assert_eq!(ClaimantName::from_input(""), None);
        assert_eq!(ClaimantName::from_input("   "), None);
        assert_eq!(
            ClaimantName::from_input(" Sam ").map(String::from),
            Some("Sam".to_string())
        );
    }

    #[test]
    fn event_date_parsing() {
        assert_eq!(
            parse_event_date("2024-11-28").unwrap(),
            NaiveDate::from_ymd_opt(2024, 11, 28).unwrap()
        );
        assert_eq!(parse_event_date(""), Err(TypeConstraintError::EmptyString));
        assert!(matches!(
            parse_event_date("28/11/2024"),
            Err(TypeConstraintError::InvalidDate(_))
        ));
    }
}
