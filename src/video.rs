use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::timestamp;

/// The identifier of a video.
pub type VideoId = u64;

/// How long after creation a video is published unless told otherwise.
pub const DEFAULT_PUBLICATION_DELAY: Duration = Duration::DAY;

/// A single video in the store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    /// The ID of the video.
    pub(crate) id: VideoId,

    /// The title, as submitted.
    pub(crate) title: String,

    /// The author, as submitted.
    pub(crate) author: String,

    pub(crate) can_be_downloaded: bool,

    /// The minimum viewer age, if restricted.
    pub(crate) min_age_restriction: Option<u8>,

    /// When the video was created. Never changes.
    #[serde(with = "timestamp")]
    pub(crate) created_at: OffsetDateTime,

    /// When the video is published. Always later than `created_at`.
    #[serde(with = "timestamp")]
    pub(crate) publication_date: OffsetDateTime,

    pub(crate) available_resolutions: Option<Vec<Resolution>>,
}

impl Video {
    /// Synthesizes a freshly created video: downloads disabled, no age
    /// restriction, published one day after `created_at`.
    pub fn create(id: VideoId, created_at: OffsetDateTime, new: NewVideo) -> Self {
        let NewVideo {
            title,
            author,
            available_resolutions,
        } = new;

        Video {
            id,
            title,
            author,
            can_be_downloaded: false,
            min_age_restriction: None,
            created_at,
            publication_date: created_at + DEFAULT_PUBLICATION_DELAY,
            available_resolutions,
        }
    }

    pub fn id(&self) -> VideoId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn can_be_downloaded(&self) -> bool {
        self.can_be_downloaded
    }

    pub fn min_age_restriction(&self) -> Option<u8> {
        self.min_age_restriction
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn publication_date(&self) -> OffsetDateTime {
        self.publication_date
    }

    pub fn available_resolutions(&self) -> Option<&[Resolution]> {
        self.available_resolutions.as_deref()
    }

    /// Applies a validated update in place. Title, author and resolutions
    /// are always replaced; the other fields only when a value was given.
    pub fn apply(&mut self, update: VideoUpdate) {
        let VideoUpdate {
            title,
            author,
            can_be_downloaded,
            min_age_restriction,
            publication_date,
            available_resolutions,
        } = update;

        self.title = title;
        self.author = author;
        self.available_resolutions = available_resolutions;

        if let Some(can_be_downloaded) = can_be_downloaded {
            self.can_be_downloaded = can_be_downloaded;
        }

        if let Some(min_age_restriction) = min_age_restriction {
            self.min_age_restriction = Some(min_age_restriction);
        }

        if let Some(publication_date) = publication_date {
            self.publication_date = publication_date;
        }
    }
}

/// The validated contents of a creation request.
#[derive(Clone, Debug, PartialEq)]
pub struct NewVideo {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) available_resolutions: Option<Vec<Resolution>>,
}

/// The validated contents of an update request. `None` in an optional
/// field means "keep what is stored".
#[derive(Clone, Debug, PartialEq)]
pub struct VideoUpdate {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) can_be_downloaded: Option<bool>,
    pub(crate) min_age_restriction: Option<u8>,
    pub(crate) publication_date: Option<OffsetDateTime>,
    pub(crate) available_resolutions: Option<Vec<Resolution>>,
}

/// A supported video resolution.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum Resolution {
    P144,
    P240,
    P360,
    P480,
    P720,
    P1080,
    P1440,
    P2160,
}

impl Resolution {
    pub const ALL: [Resolution; 8] = [
        Resolution::P144,
        Resolution::P240,
        Resolution::P360,
        Resolution::P480,
        Resolution::P720,
        Resolution::P1080,
        Resolution::P1440,
        Resolution::P2160,
    ];

    pub fn tag(self) -> &'static str {
        use Resolution::*;

        match self {
            P144 => "P144",
            P240 => "P240",
            P360 => "P360",
            P480 => "P480",
            P720 => "P720",
            P1080 => "P1080",
            P1440 => "P1440",
            P2160 => "P2160",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown resolution {0:?}")]
pub struct UnknownResolution(pub String);

impl FromStr for Resolution {
    type Err = UnknownResolution;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resolution::ALL
            .iter()
            .copied()
            .find(|r| r.tag() == s)
            .ok_or_else(|| UnknownResolution(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    fn sample() -> Video {
        Video::create(
            7,
            datetime!(2024-05-01 10:00:00 UTC),
            NewVideo {
                title: "Capital".to_owned(),
                author: "Karl Marx".to_owned(),
                available_resolutions: None,
            },
        )
    }

    fn update() -> VideoUpdate {
        VideoUpdate {
            title: "Capital, vol. 2".to_owned(),
            author: "Friedrich Engels".to_owned(),
            can_be_downloaded: None,
            min_age_restriction: None,
            publication_date: None,
            available_resolutions: None,
        }
    }

    #[test]
    fn creation_defaults() {
        let video = sample();

        assert!(!video.can_be_downloaded());
        assert_eq!(video.min_age_restriction(), None);
        assert_eq!(video.available_resolutions(), None);
        assert_eq!(
            video.publication_date() - video.created_at(),
            Duration::milliseconds(86_400_000)
        );
    }

    #[test]
    fn serializes_in_camel_case() {
        let json = serde_json::to_value(&sample()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "Capital",
                "author": "Karl Marx",
                "canBeDownloaded": false,
                "minAgeRestriction": null,
                "createdAt": "2024-05-01T10:00:00.000Z",
                "publicationDate": "2024-05-02T10:00:00.000Z",
                "availableResolutions": null,
            })
        );
    }

    #[test]
    fn apply_keeps_unset_fields() {
        let mut video = sample();
        video.can_be_downloaded = true;
        video.min_age_restriction = Some(12);
        video.available_resolutions = Some(vec![Resolution::P720]);
        let publication_date = video.publication_date;

        video.apply(update());

        assert_eq!(video.title(), "Capital, vol. 2");
        assert_eq!(video.author(), "Friedrich Engels");
        assert!(video.can_be_downloaded());
        assert_eq!(video.min_age_restriction(), Some(12));
        assert_eq!(video.publication_date(), publication_date);
        // resolutions are always replaced
        assert_eq!(video.available_resolutions(), None);
    }

    #[test]
    fn apply_overwrites_given_fields() {
        let mut video = sample();
        video.can_be_downloaded = true;
        let publication_date = datetime!(2024-06-01 00:00:00 UTC);

        video.apply(VideoUpdate {
            can_be_downloaded: Some(false),
            min_age_restriction: Some(16),
            publication_date: Some(publication_date),
            available_resolutions: Some(vec![Resolution::P1080, Resolution::P2160]),
            ..update()
        });

        assert!(!video.can_be_downloaded());
        assert_eq!(video.min_age_restriction(), Some(16));
        assert_eq!(video.publication_date(), publication_date);
        assert_eq!(
            video.available_resolutions(),
            Some(&[Resolution::P1080, Resolution::P2160][..])
        );
        assert_eq!(video.id(), 7);
    }

    #[test]
    fn resolution_tags_round_trip() {
        for resolution in Resolution::ALL.iter() {
            assert_eq!(resolution.tag().parse::<Resolution>(), Ok(*resolution));
            assert_eq!(
                serde_json::to_value(resolution).unwrap(),
                serde_json::json!(resolution.tag())
            );
        }
    }

    #[test]
    fn resolution_tags_are_case_sensitive() {
        assert_eq!(
            "p144".parse::<Resolution>(),
            Err(UnknownResolution("p144".to_owned()))
        );
        assert!("P140".parse::<Resolution>().is_err());
        assert!("".parse::<Resolution>().is_err());
    }
}
