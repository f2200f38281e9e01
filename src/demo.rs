//! Sample videos for a freshly started demo instance.

use time::OffsetDateTime;

use crate::ids::IdGenerator;
use crate::video::{NewVideo, Resolution, Video};

pub fn demo_videos(ids: &IdGenerator, now: OffsetDateTime) -> Vec<Video> {
    use Resolution::*;

    let mut introduction = Video::create(
        ids.next_id(now),
        now,
        NewVideo {
            title: "Introduction to Node.js".to_owned(),
            author: "John Doe".to_owned(),
            available_resolutions: Some(vec![P240, P360, P480, P720]),
        },
    );
    introduction.can_be_downloaded = true;
    introduction.min_age_restriction = Some(12);

    let advanced = Video::create(
        ids.next_id(now),
        now,
        NewVideo {
            title: "Advanced JavaScript".to_owned(),
            author: "Jane Smith".to_owned(),
            available_resolutions: Some(vec![P360, P480, P720, P1080]),
        },
    );

    vec![introduction, advanced]
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::demo_videos;
    use crate::ids::IdGenerator;

    #[test]
    fn demo_videos_are_distinct_and_valid() {
        let now = datetime!(2024-05-01 10:00:00 UTC);
        let videos = demo_videos(&IdGenerator::new(), now);

        assert_eq!(videos.len(), 2);
        assert_ne!(videos[0].id(), videos[1].id());

        for video in &videos {
            assert!(video.publication_date() > video.created_at());
        }

        assert!(videos[0].can_be_downloaded());
        assert_eq!(videos[0].min_age_restriction(), Some(12));
    }
}
