//! Film aggregate.
//!
//! # Invariants
//! - `name` is not blank.
//! - `description` holds at most 200 characters.
//! - `release_date` is not earlier than 1895-12-28.
//! - `duration` is a positive number of minutes.
//! - `rating` is required; `genres` has set semantics.

use crate::model::catalog::{GenreId, RatingId};
use crate::model::entity::{Entity, EntityId, EntityKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FilmId = EntityId;

pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// First public film screening; nothing can be released earlier.
pub const EARLIEST_RELEASE_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1895, 12, 28) {
    Some(date) => date,
    None => panic!("1895-12-28 is a calendar date"),
};

/// Catalog film record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    /// `None` until the store assigns identity.
    pub id: Option<FilmId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub release_date: NaiveDate,
    /// Running time in minutes.
    pub duration: u32,
    /// Serialized as `mpa` to match the external payload naming.
    #[serde(rename = "mpa")]
    pub rating: RatingId,
    #[serde(default)]
    pub genres: BTreeSet<GenreId>,
}

/// Field rule violations for `Film`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilmValidationError {
    BlankName,
    DescriptionTooLong { chars: usize },
    ReleaseDateTooEarly(NaiveDate),
    NonPositiveDuration,
}

impl Display for FilmValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "film name must not be blank"),
            Self::DescriptionTooLong { chars } => write!(
                f,
                "film description has {chars} characters, at most {MAX_DESCRIPTION_CHARS} allowed"
            ),
            Self::ReleaseDateTooEarly(date) => write!(
                f,
                "film release date {date} is earlier than {}",
                EARLIEST_RELEASE_DATE
            ),
            Self::NonPositiveDuration => write!(f, "film duration must be positive"),
        }
    }
}

impl Error for FilmValidationError {}

impl Film {
    /// Creates an unsaved film with empty description and no genres.
    pub fn new(
        name: impl Into<String>,
        release_date: NaiveDate,
        duration: u32,
        rating: RatingId,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            release_date,
            duration,
            rating,
            genres: BTreeSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_genres(mut self, genres: impl IntoIterator<Item = GenreId>) -> Self {
        self.genres = genres.into_iter().collect();
        self
    }

    /// Checks field rules. Catalog references are checked by the service.
    pub fn validate(&self) -> Result<(), FilmValidationError> {
        if self.name.trim().is_empty() {
            return Err(FilmValidationError::BlankName);
        }

        let chars = self.description.chars().count();
        if chars > MAX_DESCRIPTION_CHARS {
            return Err(FilmValidationError::DescriptionTooLong { chars });
        }

        if self.release_date < EARLIEST_RELEASE_DATE {
            return Err(FilmValidationError::ReleaseDateTooEarly(self.release_date));
        }

        if self.duration == 0 {
            return Err(FilmValidationError::NonPositiveDuration);
        }

        Ok(())
    }
}

impl Entity for Film {
    const KIND: EntityKind = EntityKind::Film;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn assign_id(&mut self, id: EntityId) {
        self.id = Some(id);
    }
}
