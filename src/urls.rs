use url::Url;

use crate::video::VideoId;

/// The path under which all video actions live.
pub const VIDEOS_PATH: &str = "videos";

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,
}

impl Urls {
    /// Create a new instance. A missing trailing slash on `base` is added.
    pub fn new(base: impl AsRef<str>) -> Result<Self, url::ParseError> {
        let raw = base.as_ref();
        let base = if raw.ends_with('/') {
            Url::parse(raw)?
        } else {
            Url::parse(&format!("{}/", raw))?
        };

        Ok(Urls { base })
    }

    pub fn videos(&self) -> Url {
        self.base
            .join(&format!("{}/", VIDEOS_PATH))
            .expect("join videos path to base URL")
    }

    pub fn video(&self, id: VideoId) -> Url {
        self.videos()
            .join(&id.to_string())
            .unwrap_or_else(|_| panic!("get URL for video {}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::Urls;

    #[test]
    fn builds_video_urls() {
        for base in &["https://www.example.com/api", "https://www.example.com/api/"] {
            let urls = Urls::new(base).unwrap();

            assert_eq!(
                urls.video(1_714_557_600_000).as_str(),
                "https://www.example.com/api/videos/1714557600000"
            );
        }
    }

    #[test]
    fn rejects_relative_bases() {
        assert!(Urls::new("not a url").is_err());
    }
}
