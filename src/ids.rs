use std::cmp;
use std::sync::atomic::{AtomicU64, Ordering};

use time::OffsetDateTime;

use crate::timestamp::unix_millis;
use crate::video::VideoId;

/// Hands out video IDs. Each ID is the creation time in Unix
/// milliseconds, bumped past the previous ID when two creations land
/// in the same millisecond (or the clock goes backwards).
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns an ID strictly greater than any returned before.
    pub fn next_id(&self, now: OffsetDateTime) -> VideoId {
        let candidate = millis(now);

        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(cmp::max(candidate, last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);

        cmp::max(candidate, previous.saturating_add(1))
    }
}

fn millis(now: OffsetDateTime) -> u64 {
    let millis = unix_millis(now);

    if millis < 0 {
        0
    } else {
        millis.min(i128::from(u64::MAX)) as u64
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use proptest::prelude::*;
    use time::macros::datetime;
    use time::Duration;

    use super::IdGenerator;

    #[test]
    fn ids_follow_the_clock() {
        let generator = IdGenerator::new();
        let now = datetime!(2024-01-01 00:00:00.250 UTC);

        assert_eq!(generator.next_id(now), 1_704_067_200_250);
        assert_eq!(
            generator.next_id(now + Duration::seconds(1)),
            1_704_067_201_250
        );
    }

    #[test]
    fn ids_in_the_same_millisecond_do_not_collide() {
        let generator = IdGenerator::new();
        let now = datetime!(2024-01-01 00:00:00 UTC);

        let first = generator.next_id(now);
        let second = generator.next_id(now);
        let third = generator.next_id(now);

        assert_eq!(second, first + 1);
        assert_eq!(third, first + 2);
    }

    #[test]
    fn ids_are_unique_across_threads() {
        let generator = Arc::new(IdGenerator::new());
        let now = datetime!(2024-01-01 00:00:00 UTC);

        let handles = (0..8)
            .map(|_| {
                let generator = generator.clone();
                thread::spawn(move || (0..500).map(|_| generator.next_id(now)).collect::<Vec<_>>())
            })
            .collect::<Vec<_>>();

        let ids = handles
            .into_iter()
            .flat_map(|h| h.join().expect("join generator thread"))
            .collect::<HashSet<_>>();

        assert_eq!(ids.len(), 8 * 500);
    }

    proptest! {
        #[test]
        fn ids_strictly_increase(offsets in prop::collection::vec(-5_000i64..5_000, 1..100)) {
            let generator = IdGenerator::new();
            let base = datetime!(2024-01-01 00:00:00 UTC);

            let mut previous = None;

            for offset in offsets {
                let id = generator.next_id(base + Duration::milliseconds(offset));

                if let Some(previous) = previous {
                    prop_assert!(id > previous, "{} must follow {}", id, previous);
                }

                previous = Some(id);
            }
        }
    }
}
