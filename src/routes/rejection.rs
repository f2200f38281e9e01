use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;
use crate::video::VideoId;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        FlattenedRejection {
            message: format!("{}", self.error),
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    pub(crate) message: String,
}

/// The operation that failed, for the logs.
#[derive(Clone, Debug)]
pub enum Context {
    Create { id: Option<VideoId> },
    Delete { id: String },
    List,
    Reset,
    Retrieve { id: String },
    Update { id: String },
}

impl Context {
    pub fn create(id: Option<VideoId>) -> Context {
        Context::Create { id }
    }

    pub fn delete(id: String) -> Context {
        Context::Delete { id }
    }

    pub fn list() -> Context {
        Context::List
    }

    pub fn reset() -> Context {
        Context::Reset
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }

    pub fn update(id: String) -> Context {
        Context::Update { id }
    }
}
