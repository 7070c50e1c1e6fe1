//! Content-addressed blob serving.
//!
//! [`BlobServer`] resolves a digest to a driver path and either redirects the
//! client to a URL the driver can serve directly, or falls back to streaming
//! the content itself when the driver has no direct access.

use crate::error::{Error, Result};
use crate::paths::blob_data_path;
use axum::body::Body;
use axum::http::header::{
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, ETAG, IF_NONE_MATCH, LOCATION,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::Response;
use berth_core::{BlobStatter, Digest};
use berth_driver::{DriverError, DriverResult, StorageDriver, UrlOptions};
use std::sync::Arc;

static DOCKER_CONTENT_DIGEST: HeaderName = HeaderName::from_static("docker-content-digest");

/// Blobs are immutable, so clients may cache them for a year.
const BLOB_CACHE_CONTROL: &str = "max-age=31536000";

/// Maps a digest to the driver path holding its content.
pub type PathFn = dyn Fn(&Digest) -> DriverResult<String> + Send + Sync;

/// Serves blobs from a driver instance, using a path function to locate
/// content and a statter to fill in metadata.
pub struct BlobServer {
    driver: Arc<dyn StorageDriver>,
    statter: Arc<dyn BlobStatter>,
    path_fn: Box<PathFn>,
}

impl BlobServer {
    /// Create a blob server over the default content-addressed layout.
    pub fn new(driver: Arc<dyn StorageDriver>, statter: Arc<dyn BlobStatter>) -> Self {
        Self::with_path_fn(driver, statter, Box::new(blob_data_path))
    }

    /// Create a blob server with a custom digest-to-path mapping.
    pub fn with_path_fn(
        driver: Arc<dyn StorageDriver>,
        statter: Arc<dyn BlobStatter>,
        path_fn: Box<PathFn>,
    ) -> Self {
        Self {
            driver,
            statter,
            path_fn,
        }
    }

    /// Serve the blob identified by `digest`.
    ///
    /// `response_headers` carries headers an outer handler has already
    /// decided on; `Content-Type`, `Content-Length` and
    /// `Docker-Content-Digest` are only filled in when absent.
    pub async fn serve_blob(
        &self,
        method: &Method,
        request_headers: &HeaderMap,
        mut response_headers: HeaderMap,
        digest: &Digest,
    ) -> Result<Response> {
        let desc = self.statter.stat(digest).await?;
        let path = (self.path_fn)(&desc.digest)?;

        let options = UrlOptions {
            method: method.to_string(),
        };
        match self.driver.url_for(&path, &options).await {
            Ok(url) => {
                response_headers.insert(LOCATION, header_value(&url)?);
                Ok(response(
                    StatusCode::TEMPORARY_REDIRECT,
                    response_headers,
                    Body::empty(),
                ))
            }
            Err(DriverError::UnsupportedMethod) => {
                self.stream_blob(request_headers, response_headers, &desc)
                    .await
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Fallback arm: serve the content directly from the driver.
    async fn stream_blob(
        &self,
        request_headers: &HeaderMap,
        mut headers: HeaderMap,
        desc: &berth_core::Descriptor,
    ) -> Result<Response> {
        let digest_value = header_value(desc.digest.as_str())?;

        headers.insert(ETAG, digest_value.clone());
        headers.insert(CACHE_CONTROL, HeaderValue::from_static(BLOB_CACHE_CONTROL));

        if !headers.contains_key(&DOCKER_CONTENT_DIGEST) {
            headers.insert(DOCKER_CONTENT_DIGEST.clone(), digest_value);
        }
        if !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, header_value(&desc.media_type)?);
        }
        if !headers.contains_key(CONTENT_LENGTH) {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(desc.length));
        }

        if if_none_match_hits(request_headers, &desc.digest) {
            return Ok(response(
                StatusCode::NOT_MODIFIED,
                headers,
                Body::empty(),
            ));
        }

        let path = (self.path_fn)(&desc.digest)?;
        let stream = self.driver.read_stream(&path, 0).await?;
        Ok(response(StatusCode::OK, headers, Body::from_stream(stream)))
    }
}

fn response(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn header_value(s: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(s).map_err(|_| Error::Header(s.to_string()))
}

/// The blob ETag is its digest; a matching If-None-Match short-circuits to
/// 304. Both bare and quoted forms are accepted.
fn if_none_match_hits(request_headers: &HeaderMap, digest: &Digest) -> bool {
    request_headers
        .get(IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.trim();
            value == digest.as_str() || value.trim_matches('"') == digest.as_str()
        })
        .unwrap_or(false)
}
