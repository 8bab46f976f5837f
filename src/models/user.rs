//! User model
//!
//! The mutable record kind of the directory. Identity is owned by the store;
//! every other field can be overwritten by an update.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::entity::Entity;
use super::ids::UserId;

/// Maximum length of a forename or surname accepted by [`User::validate`]
pub const MAX_NAME_LEN: usize = 50;

/// A user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identity assigned by the store (`UNASSIGNED` until stored)
    #[serde(default)]
    pub id: UserId,

    pub forename: String,

    pub surname: String,

    /// Opaque contact address, duplicates are allowed
    pub email: String,

    pub is_active: bool,

    pub date_of_birth: NaiveDate,
}

impl User {
    /// Create a new, not yet stored, user
    pub fn new(
        forename: impl Into<String>,
        surname: impl Into<String>,
        email: impl Into<String>,
        is_active: bool,
        date_of_birth: NaiveDate,
    ) -> Self {
        Self {
            id: UserId::UNASSIGNED,
            forename: forename.into(),
            surname: surname.into(),
            email: email.into(),
            is_active,
            date_of_birth,
        }
    }

    /// Same record with an explicit identity (fixtures and seed data)
    pub fn with_id(mut self, id: UserId) -> Self {
        self.id = id;
        self
    }

    /// "Forename Surname"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }

    /// Copy every mutable field from `other`, keeping this record's identity
    pub fn overwrite_from(&mut self, other: &User) {
        self.forename = other.forename.clone();
        self.surname = other.surname.clone();
        self.email = other.email.clone();
        self.is_active = other.is_active;
        self.date_of_birth = other.date_of_birth;
    }

    /// Check the field formats the input forms require
    ///
    /// The directory itself never calls this; callers validate before
    /// handing a user to the core.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        check_name("Forename", &self.forename)?;
        check_name("Surname", &self.surname)?;

        let email = self.email.trim();
        if email.is_empty() {
            return Err(UserValidationError::Empty("Email"));
        }
        if !email.contains('@') {
            return Err(UserValidationError::InvalidEmail(self.email.clone()));
        }

        Ok(())
    }
}

fn check_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    let len = value.trim().chars().count();
    if len == 0 {
        return Err(UserValidationError::Empty(field));
    }
    if len > MAX_NAME_LEN {
        return Err(UserValidationError::TooLong(field, len));
    }
    Ok(())
}

impl Entity for User {
    type Id = UserId;

    const KIND: &'static str = "User";

    fn id(&self) -> UserId {
        self.id
    }

    fn set_id(&mut self, id: UserId) {
        self.id = id;
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.full_name(), self.email)
    }
}

/// Validation errors for users
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    Empty(&'static str),
    TooLong(&'static str, usize),
    InvalidEmail(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty(field) => write!(f, "{} is required", field),
            Self::TooLong(field, len) => write!(
                f,
                "{} cannot be longer than {} characters (got {})",
                field, MAX_NAME_LEN, len
            ),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for UserValidationError {}
