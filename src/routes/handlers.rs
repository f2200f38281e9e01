use std::time::{Duration, Instant};

use bytes::Bytes;
use log::{debug, info, o};
use serde::de::{self, DeserializeOwned};
use serde_json::Value;
use warp::{
    http::StatusCode,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::environment::Environment;
use crate::errors::BackendError;
use crate::routes::{
    rejection::{Context, Rejection},
    response::SuccessResponse,
    MAX_CONTENT_LENGTH,
};
use crate::timestamp;
use crate::validation::{validate_creation, validate_update, CreateVideoRequest, UpdateVideoRequest};
use crate::video::{Video, VideoId};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        // TODO when `try` blocks are stabilized, we can wrap the body
        // and return the headers even on errors
        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn version(_environment: Environment) -> RouteResult {
    timed! {
        json(&SuccessResponse::Version {
            version: info::VERSION,
        })
    }
}

pub async fn list(environment: Environment) -> RouteResult {
    timed! {
        let videos = environment
            .store
            .all()
            .await
            .map_err(|e: BackendError| Rejection::new(Context::list(), e))?;

        json(&videos)
    }
}

pub async fn create(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::create(None), e);

        debug!(environment.logger, "Parsing submission...");
        let request: CreateVideoRequest = parse_body(&body).map_err(error_handler)?;

        debug!(environment.logger, "Validating submission...");
        let new_video = validate_creation(request)
            .map_err(BackendError::from)
            .map_err(error_handler)?;

        let now = timestamp::now();
        let id = environment.ids.next_id(now);
        let logger = environment.logger.new(o!("id" => id));
        let video = Video::create(id, now, new_video);

        let error_handler = |e: BackendError| Rejection::new(Context::create(Some(id)), e);

        debug!(logger, "Saving video to store...");
        environment
            .store
            .append(video.clone())
            .await
            .map_err(error_handler)?;

        debug!(logger, "Sending response...");
        with_header(
            with_status(json(&video), StatusCode::CREATED),
            "location",
            environment.urls.video(id).as_str(),
        )
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let video_id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Retrieving video..."; "id" => video_id);

        let video = environment
            .store
            .find(video_id)
            .await
            .map_err(error_handler)?
            .ok_or(BackendError::NotFound)
            .map_err(error_handler)?;

        with_status(json(&video), StatusCode::OK)
    }
}

pub async fn update(environment: Environment, id: String, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::update(id.clone()), e);

        let video_id = parse_id(&id).map_err(error_handler)?;
        let logger = environment.logger.new(o!("id" => video_id));

        // an unknown ID wins over any problem with the body
        debug!(logger, "Looking up video...");
        let existing = environment
            .store
            .find(video_id)
            .await
            .map_err(error_handler)?
            .ok_or(BackendError::NotFound)
            .map_err(error_handler)?;

        debug!(logger, "Validating changes...");
        let request: UpdateVideoRequest = parse_body(&body).map_err(error_handler)?;
        let update = validate_update(request, existing.created_at())
            .map_err(BackendError::from)
            .map_err(error_handler)?;

        debug!(logger, "Updating video...");
        let found = environment
            .store
            .update(video_id, update)
            .await
            .map_err(error_handler)?;

        if !found {
            return Err(error_handler(BackendError::NotFound).into());
        };

        StatusCode::NO_CONTENT
    }
}

pub async fn delete(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::delete(id.clone()), e);

        let video_id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Deleting video..."; "id" => video_id);

        let index = environment
            .store
            .position(video_id)
            .await
            .map_err(error_handler)?
            .ok_or(BackendError::NotFound)
            .map_err(error_handler)?;

        let removed = environment
            .store
            .remove_at(index)
            .await
            .map_err(error_handler)?;

        if !removed {
            return Err(error_handler(BackendError::NotFound).into());
        };

        StatusCode::NO_CONTENT
    }
}

pub async fn reset(environment: Environment) -> RouteResult {
    timed! {
        info!(environment.logger, "Removing all videos...");

        environment
            .store
            .clear()
            .await
            .map_err(|e| Rejection::new(Context::reset(), e))?;

        StatusCode::NO_CONTENT
    }
}

/// IDs that are not unsigned integers can't match anything.
fn parse_id(raw: &str) -> Result<VideoId, BackendError> {
    raw.parse().map_err(|_| BackendError::NotFound)
}

/// Decodes a JSON body. An empty body counts as an empty object.
fn parse_body<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, BackendError> {
    if body.len() > MAX_CONTENT_LENGTH {
        return Err(BackendError::BodyTooLarge {
            limit: MAX_CONTENT_LENGTH,
        });
    }

    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }

    let malformed = |source| BackendError::MalformedBody { source };

    // derived deserializers also accept arrays, which must not count
    let value: Value = serde_json::from_slice(body).map_err(malformed)?;
    if !value.is_object() {
        return Err(malformed(<serde_json::Error as de::Error>::custom(
            "expected a JSON object",
        )));
    }

    serde_json::from_value(value).map_err(malformed)
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
