//! User aggregate.
//!
//! # Invariants
//! - `email` is not blank and contains `@`.
//! - `login` is not blank and contains no whitespace.
//! - `name` falls back to `login` when blank, on create and on update.
//! - `birthday`, when set, is not in the future.

use crate::model::entity::{Entity, EntityId, EntityKind};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type UserId = EntityId;

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// `None` until the store assigns identity.
    pub id: Option<UserId>,
    pub email: String,
    pub login: String,
    /// Display name. Blank means "use the login".
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birthday: Option<NaiveDate>,
}

/// Field rule violations for `User`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    BlankEmail,
    EmailWithoutAt,
    BlankLogin,
    LoginContainsWhitespace,
    BirthdayInFuture(NaiveDate),
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankEmail => write!(f, "user email must not be blank"),
            Self::EmailWithoutAt => write!(f, "user email must contain `@`"),
            Self::BlankLogin => write!(f, "user login must not be blank"),
            Self::LoginContainsWhitespace => write!(f, "user login must not contain whitespace"),
            Self::BirthdayInFuture(date) => write!(f, "user birthday {date} is in the future"),
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates an unsaved user with no display name and no birthday.
    pub fn new(email: impl Into<String>, login: impl Into<String>) -> Self {
        Self {
            id: None,
            email: email.into(),
            login: login.into(),
            name: String::new(),
            birthday: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    /// Replaces a blank display name with the login.
    pub fn apply_default_name(&mut self) {
        if self.name.trim().is_empty() {
            self.name = self.login.clone();
        }
    }

    /// Checks field rules against the local calendar date.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        self.validate_on(Local::now().date_naive())
    }

    /// Checks field rules with an explicit "today".
    pub fn validate_on(&self, today: NaiveDate) -> Result<(), UserValidationError> {
        if self.email.trim().is_empty() {
            return Err(UserValidationError::BlankEmail);
        }
        if !self.email.contains('@') {
            return Err(UserValidationError::EmailWithoutAt);
        }

        if self.login.trim().is_empty() {
            return Err(UserValidationError::BlankLogin);
        }
        if self.login.chars().any(char::is_whitespace) {
            return Err(UserValidationError::LoginContainsWhitespace);
        }

        match self.birthday {
            Some(birthday) if birthday > today => {
                Err(UserValidationError::BirthdayInFuture(birthday))
            }
            _ => Ok(()),
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
