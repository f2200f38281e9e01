use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use futures::future::{ready, BoxFuture, FutureExt};

use crate::errors::BackendError;
use crate::store::Store;
use crate::video::{Video, VideoId, VideoUpdate};

/// A store that keeps its videos in process memory for the lifetime of
/// the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    videos: RwLock<Vec<Video>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds the given videos.
    pub fn with_videos(videos: Vec<Video>) -> Self {
        MemoryStore {
            videos: RwLock::new(videos),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<Vec<Video>>, BackendError> {
        self.videos.read().map_err(|_| BackendError::StoreUnavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<Vec<Video>>, BackendError> {
        self.videos.write().map_err(|_| BackendError::StoreUnavailable)
    }

    fn all_now(&self) -> Result<Vec<Video>, BackendError> {
        Ok(self.read()?.clone())
    }

    fn find_now(&self, id: VideoId) -> Result<Option<Video>, BackendError> {
        Ok(self.read()?.iter().find(|v| v.id == id).cloned())
    }

    fn position_now(&self, id: VideoId) -> Result<Option<usize>, BackendError> {
        Ok(self.read()?.iter().position(|v| v.id == id))
    }

    fn append_now(&self, video: Video) -> Result<(), BackendError> {
        self.write()?.push(video);

        Ok(())
    }

    fn update_now(&self, id: VideoId, update: VideoUpdate) -> Result<bool, BackendError> {
        let mut videos = self.write()?;

        match videos.iter_mut().find(|v| v.id == id) {
            Some(video) => {
                video.apply(update);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_at_now(&self, index: usize) -> Result<bool, BackendError> {
        let mut videos = self.write()?;

        if index < videos.len() {
            videos.remove(index);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn clear_now(&self) -> Result<(), BackendError> {
        self.write()?.clear();

        Ok(())
    }
}

// nothing here ever waits, so every future is already resolved
impl Store for MemoryStore {
    fn all(&self) -> BoxFuture<'_, Result<Vec<Video>, BackendError>> {
        ready(self.all_now()).boxed()
    }

    fn find(&self, id: VideoId) -> BoxFuture<'_, Result<Option<Video>, BackendError>> {
        ready(self.find_now(id)).boxed()
    }

    fn position(&self, id: VideoId) -> BoxFuture<'_, Result<Option<usize>, BackendError>> {
        ready(self.position_now(id)).boxed()
    }

    fn append(&self, video: Video) -> BoxFuture<'_, Result<(), BackendError>> {
        ready(self.append_now(video)).boxed()
    }

    fn update(&self, id: VideoId, update: VideoUpdate) -> BoxFuture<'_, Result<bool, BackendError>> {
        ready(self.update_now(id, update)).boxed()
    }

    fn remove_at(&self, index: usize) -> BoxFuture<'_, Result<bool, BackendError>> {
        ready(self.remove_at_now(index)).boxed()
    }

    fn clear(&self) -> BoxFuture<'_, Result<(), BackendError>> {
        ready(self.clear_now()).boxed()
    }
}
