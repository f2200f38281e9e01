use futures::future::BoxFuture;

use crate::errors::BackendError;
use crate::video::{Video, VideoId, VideoUpdate};

mod memory;

pub use memory::MemoryStore;

/// An ordered collection of videos.
pub trait Store: Send + Sync {
    /// Returns every video, in insertion order.
    fn all(&self) -> BoxFuture<'_, Result<Vec<Video>, BackendError>>;

    /// Returns the first video with the given ID, if any.
    fn find(&self, id: VideoId) -> BoxFuture<'_, Result<Option<Video>, BackendError>>;

    /// Returns the position of the first video with the given ID, if any.
    fn position(&self, id: VideoId) -> BoxFuture<'_, Result<Option<usize>, BackendError>>;

    /// Adds a video at the end.
    fn append(&self, video: Video) -> BoxFuture<'_, Result<(), BackendError>>;

    /// Applies an update to the video with the given ID. Returns whether
    /// it was found.
    fn update(&self, id: VideoId, update: VideoUpdate) -> BoxFuture<'_, Result<bool, BackendError>>;

    /// Removes the video at the given position. Returns whether the
    /// position was in range.
    fn remove_at(&self, index: usize) -> BoxFuture<'_, Result<bool, BackendError>>;

    /// Removes every video.
    fn clear(&self) -> BoxFuture<'_, Result<(), BackendError>>;
}
