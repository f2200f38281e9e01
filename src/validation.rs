//! Field validation for creation and update requests.
//!
//! Request bodies are read loosely (every field as raw JSON) so that a
//! wrongly-typed field becomes a field error in the response rather than
//! a blanket parse failure.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::timestamp;
use crate::video::{NewVideo, Resolution, VideoUpdate};

pub const MAX_TITLE_LENGTH: usize = 40;
pub const MAX_AUTHOR_LENGTH: usize = 20;
pub const MIN_AGE_RESTRICTION: u64 = 1;
pub const MAX_AGE_RESTRICTION: u64 = 18;

const TEXT_MESSAGE: &str = "The value is missing or the maximum allowed size has been exceeded";
const RESOLUTIONS_MESSAGE: &str = "At least one valid resolution must be added";
const AGE_MESSAGE: &str = "minAgeRestriction must be between 1 and 18";
const DOWNLOAD_MESSAGE: &str = "canBeDownloaded must be a boolean";
const DATE_FORMAT_MESSAGE: &str = "Invalid publication date format";
const DATE_ORDER_MESSAGE: &str = "publicationDate must be later than createdAt";

/// The body of `POST /videos`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[serde(default)]
    pub title: Value,

    #[serde(default)]
    pub author: Value,

    /// `None` only when the field is absent; an explicit `null` is
    /// `Some(Value::Null)` and fails validation.
    #[serde(default, deserialize_with = "present")]
    pub available_resolutions: Option<Value>,
}

/// The body of `PUT /videos/{id}`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVideoRequest {
    #[serde(default)]
    pub title: Value,

    #[serde(default)]
    pub author: Value,

    #[serde(default)]
    pub can_be_downloaded: Value,

    #[serde(default)]
    pub min_age_restriction: Value,

    #[serde(default)]
    pub publication_date: Value,

    #[serde(default)]
    pub available_resolutions: Value,
}

/// The field a validation error refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Title,
    Author,
    AvailableResolutions,
    MinAgeRestriction,
    CanBeDownloaded,
    PublicationDate,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub message: &'static str,
    pub field: Field,
}

/// Every violation found in a request, in the order the fields are
/// checked.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ValidationErrors {
    #[serde(rename = "errorsMessages")]
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: Field, message: &'static str) {
        self.errors.push(FieldError { message, field });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn fields(&self) -> Vec<Field> {
        self.errors.iter().map(|e| e.field).collect()
    }

    /// Records an error for `field` if `checked` is `None`.
    fn check<T>(&mut self, field: Field, message: &'static str, checked: Option<T>) -> Option<T> {
        if checked.is_none() {
            self.push(field, message);
        }

        checked
    }
}

/// Validates a creation request. Title, author and resolutions are all
/// checked before giving up.
pub fn validate_creation(request: CreateVideoRequest) -> Result<NewVideo, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = errors.check(
        Field::Title,
        TEXT_MESSAGE,
        bounded_text(request.title, MAX_TITLE_LENGTH),
    );
    let author = errors.check(
        Field::Author,
        TEXT_MESSAGE,
        bounded_text(request.author, MAX_AUTHOR_LENGTH),
    );
    let available_resolutions = errors.check(
        Field::AvailableResolutions,
        RESOLUTIONS_MESSAGE,
        match request.available_resolutions {
            None => Some(None),
            Some(raw) => all_resolutions(&raw).map(Some),
        },
    );

    match (title, author, available_resolutions) {
        (Some(title), Some(author), Some(available_resolutions)) => Ok(NewVideo {
            title,
            author,
            available_resolutions,
        }),
        _ => Err(errors),
    }
}

/// Validates an update request against the stored creation time.
///
/// A malformed publication date stops validation on the spot; every
/// other problem is accumulated.
pub fn validate_update(
    request: UpdateVideoRequest,
    created_at: OffsetDateTime,
) -> Result<VideoUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let title = errors.check(
        Field::Title,
        TEXT_MESSAGE,
        bounded_text(request.title, MAX_TITLE_LENGTH),
    );
    let author = errors.check(
        Field::Author,
        TEXT_MESSAGE,
        bounded_text(request.author, MAX_AUTHOR_LENGTH),
    );
    let available_resolutions = errors.check(
        Field::AvailableResolutions,
        RESOLUTIONS_MESSAGE,
        recognized_resolutions(&request.available_resolutions),
    );
    let min_age_restriction = errors.check(
        Field::MinAgeRestriction,
        AGE_MESSAGE,
        age_restriction(&request.min_age_restriction),
    );
    let can_be_downloaded = errors.check(
        Field::CanBeDownloaded,
        DOWNLOAD_MESSAGE,
        match request.can_be_downloaded {
            Value::Null => Some(None),
            Value::Bool(b) => Some(Some(b)),
            _ => None,
        },
    );

    let publication_date = if is_truthy(&request.publication_date) {
        let parsed = request
            .publication_date
            .as_str()
            .and_then(|raw| timestamp::parse(raw).ok());

        match parsed {
            None => {
                errors.push(Field::PublicationDate, DATE_FORMAT_MESSAGE);
                return Err(errors);
            }
            Some(date) => errors.check(
                Field::PublicationDate,
                DATE_ORDER_MESSAGE,
                Some(date).filter(|d| *d > created_at).map(Some),
            ),
        }
    } else {
        Some(None)
    };

    match (
        title,
        author,
        available_resolutions,
        min_age_restriction,
        can_be_downloaded,
        publication_date,
    ) {
        (
            Some(title),
            Some(author),
            Some(available_resolutions),
            Some(min_age_restriction),
            Some(can_be_downloaded),
            Some(publication_date),
        ) => Ok(VideoUpdate {
            title,
            author,
            can_be_downloaded,
            min_age_restriction,
            publication_date,
            available_resolutions,
        }),
        _ => Err(errors),
    }
}

/// A string whose trimmed length is between 1 and `max` characters.
/// The untrimmed string is kept.
fn bounded_text(raw: Value, max: usize) -> Option<String> {
    match raw {
        Value::String(text) => {
            let length = text.trim().chars().count();

            if length >= 1 && length <= max {
                Some(text)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// A non-empty list in which every entry is a known tag.
fn all_resolutions(raw: &Value) -> Option<Vec<Resolution>> {
    let items = raw.as_array().filter(|items| !items.is_empty())?;

    items
        .iter()
        .map(|item| item.as_str().and_then(|tag| tag.parse().ok()))
        .collect()
}

/// Arrays are filtered down to known tags and must keep at least one;
/// anything that is not an array means "no resolutions".
fn recognized_resolutions(raw: &Value) -> Option<Option<Vec<Resolution>>> {
    match raw.as_array() {
        None => Some(None),
        Some(items) => {
            let recognized = items
                .iter()
                .filter_map(|item| item.as_str().and_then(|tag| tag.parse().ok()))
                .collect::<Vec<Resolution>>();

            if recognized.is_empty() {
                None
            } else {
                Some(Some(recognized))
            }
        }
    }
}

/// `null` means "not given"; anything else must be a whole number of
/// years within range.
fn age_restriction(raw: &Value) -> Option<Option<u8>> {
    match raw {
        Value::Null => Some(None),
        _ => raw
            .as_u64()
            .filter(|age| (MIN_AGE_RESTRICTION..=MAX_AGE_RESTRICTION).contains(age))
            .map(|age| Some(age as u8)),
    }
}

/// JSON values that count as "given": everything except `null`,
/// `false`, zero and the empty string.
fn is_truthy(raw: &Value) -> bool {
    match raw {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where D: Deserializer<'de> {
    Value::deserialize(deserializer).map(Some)
}
