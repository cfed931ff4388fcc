//! Byte sources feeding the downloader.
//!
//! A [`ByteSource`] turns a URL into a [`RemoteBody`]: the response status,
//! its headers, and, when the transport can provide one, a stream of body
//! chunks. [`HttpSource`] is the production implementation; tests plug in
//! scripted sources to simulate broken or stalled streams.

use crate::error::{Error, Result};

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{BoxStream, StreamExt};
use reqwest::{header::HeaderMap, StatusCode, Url};
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use tracing::debug;

/// Stream of body chunks.
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// A response whose body has not been read yet.
pub struct RemoteBody {
    /// HTTP status of the response.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Incremental reader over the body, if the transport supports one.
    pub body: Option<BodyStream>,
}

impl fmt::Debug for RemoteBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteBody")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("body", &self.body.is_some())
            .finish()
    }
}

/// Opens remote resources for streaming.
pub trait ByteSource: Send + Sync {
    /// Issue a GET against `url` and return the unread response.
    fn open<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RemoteBody>>;
}

/// [`ByteSource`] backed by an HTTP client with middleware.
///
/// No credentials are attached: media URLs are fetched anonymously.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: ClientWithMiddleware,
}

impl HttpSource {
    pub fn new(client: ClientWithMiddleware) -> Self {
        Self { client }
    }
}

impl ByteSource for HttpSource {
    fn open<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RemoteBody>> {
        Box::pin(async move {
            debug!("Fetching {}", url);
            let res = self.client.get(url.clone()).send().await?;
            let status = res.status();
            let headers = res.headers().clone();
            let body = res
                .bytes_stream()
                .map(|chunk| chunk.map_err(Error::from))
                .boxed();

            Ok(RemoteBody {
                status,
                headers,
                body: Some(body),
            })
        })
    }
}
