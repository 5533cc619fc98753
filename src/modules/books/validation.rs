//! Write-path validation shared by create and update.
//!
//! Every mutating catalog operation passes its payload through
//! [`BookDraft::validate`] or [`BookPatch::validate`] before the store is
//! touched. Both apply the same per-field rules; create additionally
//! requires `title`, `author`, `publishedYear` and `genre`.

use serde::Serialize;
use thiserror::Error;

use super::models::{BookChanges, BookDraft, BookPatch, Genre, NewBook};

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 5.0;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: &'static str,
    pub error: String,
}

/// A payload was rejected; carries every offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid book data: {}", summary(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn summary(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| format!("{} {}", v.field, v.error))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn single(field: &'static str, error: impl Into<String>) -> Self {
        Self {
            violations: vec![FieldViolation {
                field,
                error: error.into(),
            }],
        }
    }

    /// Violations as JSON values for error response details
    pub fn details(&self) -> Vec<serde_json::Value> {
        self.violations
            .iter()
            .filter_map(|violation| serde_json::to_value(violation).ok())
            .collect()
    }
}

#[derive(Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: &'static str, error: impl Into<String>) {
        self.0.push(FieldViolation {
            field,
            error: error.into(),
        });
    }

    fn required<T>(&mut self, field: &'static str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(field, "required");
        }
        value
    }

    fn text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        match value {
            Some(text) if text.trim().is_empty() => {
                self.push(field, "must not be empty");
                None
            }
            other => other,
        }
    }

    fn rating(&mut self, value: Option<f64>) -> Option<f64> {
        match value {
            Some(rating) if !(MIN_RATING..=MAX_RATING).contains(&rating) => {
                self.push(
                    "rating",
                    format!("must be between {} and {}", MIN_RATING, MAX_RATING),
                );
                None
            }
            other => other,
        }
    }

    fn genres(&mut self, value: Option<Vec<String>>) -> Option<Vec<Genre>> {
        let tags = value?;
        if tags.is_empty() {
            self.push("genre", "must contain at least one tag");
            return None;
        }

        let mut genres = Vec::with_capacity(tags.len());
        for tag in tags {
            match tag.parse::<Genre>() {
                Ok(genre) => genres.push(genre),
                Err(_) => self.push("genre", format!("unknown tag '{}'", tag)),
            }
        }
        Some(genres)
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

impl BookDraft {
    /// Check required fields and value rules, producing an insertable book
    pub fn validate(self) -> Result<NewBook, ValidationError> {
        let mut violations = Violations::default();

        let title = violations.required("title", self.title);
        let title = violations.text("title", title);
        let author = violations.required("author", self.author);
        let author = violations.text("author", author);
        let published_year = violations.required("publishedYear", self.published_year);
        let genre = violations.required("genre", self.genre);
        let genre = violations.genres(genre);
        let rating = violations.rating(self.rating);

        violations.finish(|| NewBook {
            title: title.unwrap_or_default(),
            author: author.unwrap_or_default(),
            published_year: published_year.unwrap_or_default(),
            genre: genre.unwrap_or_default(),
            language: self.language,
            country: self.country,
            rating: rating.unwrap_or(MIN_RATING),
            summary: self.summary,
            cover_image_url: self.cover_image_url,
        })
    }
}

impl BookPatch {
    /// Apply the create-time value rules to whichever fields are present
    pub fn validate(self) -> Result<BookChanges, ValidationError> {
        let mut violations = Violations::default();

        let title = violations.text("title", self.title);
        let author = violations.text("author", self.author);
        let genre = violations.genres(self.genre);
        let rating = violations.rating(self.rating);

        violations.finish(|| BookChanges {
            title,
            author,
            published_year: self.published_year,
            genre,
            language: self.language,
            country: self.country,
            rating,
            summary: self.summary,
            cover_image_url: self.cover_image_url,
        })
    }
}

/// Parse a genre tag taken from a request path
pub fn parse_genre(tag: &str) -> Result<Genre, ValidationError> {
    tag.parse::<Genre>().map_err(|_| {
        ValidationError::single(
            "genre",
            format!(
                "unknown tag '{}'; expected one of {}",
                tag,
                Genre::ALL.map(Genre::as_str).join(", ")
            ),
        )
    })
}

/// Parse a release year taken from a request path
pub fn parse_release_year(raw: &str) -> Result<i32, ValidationError> {
    raw.parse::<i32>()
        .map_err(|_| ValidationError::single("publishedYear", format!("'{}' is not an integer", raw)))
}
