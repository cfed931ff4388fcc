#![allow(dead_code)]

use bytes::Bytes;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, USER_AGENT};
use reqwest::{StatusCode, Url};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use streamdl::download::{DownloadProgress, DownloadRequest, MediaKind, Payload};
use streamdl::error::{Error, Result};
use streamdl::http::{BodyStream, ByteSource, RemoteBody};
use streamdl::sink::FileSink;
use streamdl::{DownloaderBuilder, HttpClientConfig};
use tempfile::TempDir;

// Common test constants
pub const TEST_MEDIA_URL: &str = "https://cdn.example.com/uploads/promo_4f2a.jpg";
pub const TEST_USER_AGENT: &str = "streamdl-test-agent";

/// Creates a temporary directory for testing purposes
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temporary directory")
}

/// Creates test file content of specified size
pub fn create_test_content(size: usize) -> Vec<u8> {
    (0..size).map(|i| (i % 256) as u8).collect()
}

/// Splits `content` into chunks of `size` bytes.
pub fn split_content(content: &[u8], size: usize) -> Vec<Bytes> {
    content
        .chunks(size)
        .map(Bytes::copy_from_slice)
        .collect()
}

/// Asserts that a file exists and holds exactly `expected`
pub fn assert_file_content(path: &Path, expected: &[u8]) {
    let content = std::fs::read(path).expect("Failed to read saved file");
    assert_eq!(content.len(), expected.len(), "File size mismatch at path: {:?}", path);
    assert_eq!(content, expected, "File content mismatch at path: {:?}", path);
}

/// Creates a request for an art item titled `title`
pub fn create_test_request(title: &str) -> DownloadRequest {
    let url = Url::parse(TEST_MEDIA_URL).expect("Failed to parse test url");
    DownloadRequest::for_media(&url, title, MediaKind::Art)
}

// === Scripted source ===

/// One step of a scripted body.
#[derive(Debug, Clone)]
pub enum Step {
    Chunk(Bytes),
    Fail,
}

/// How a scripted source answers `open`.
#[derive(Debug, Clone)]
pub enum Script {
    /// Respond with `status`, optional Content-Length, then play the steps.
    Respond {
        status: StatusCode,
        total: Option<u64>,
        steps: Vec<Step>,
    },
    /// Respond without a readable body.
    NoBody,
    /// `open` itself fails.
    Reject,
    /// `open` never resolves.
    Hang,
    /// The body yields nothing and never ends.
    Stall { total: Option<u64> },
}

/// A [`ByteSource`] that plays back a [`Script`] and records the URLs it was asked for.
#[derive(Clone)]
pub struct ScriptedSource {
    script: Script,
    pub opened: Arc<Mutex<Vec<Url>>>,
}

impl ScriptedSource {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            opened: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Serves `chunks` successfully with an optional declared total.
    pub fn chunks(total: Option<u64>, chunks: Vec<Bytes>) -> Self {
        Self::new(Script::Respond {
            status: StatusCode::OK,
            total,
            steps: chunks.into_iter().map(Step::Chunk).collect(),
        })
    }

    /// Serves `chunks`, then breaks the connection.
    pub fn failing_after(total: Option<u64>, chunks: Vec<Bytes>) -> Self {
        let mut steps: Vec<Step> = chunks.into_iter().map(Step::Chunk).collect();
        steps.push(Step::Fail);
        Self::new(Script::Respond {
            status: StatusCode::OK,
            total,
            steps,
        })
    }

    pub fn opened_count(&self) -> usize {
        self.opened.lock().unwrap().len()
    }
}

fn headers_for(total: Option<u64>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Some(total) = total {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(total));
    }
    headers
}

impl ByteSource for ScriptedSource {
    fn open<'a>(&'a self, url: &'a Url) -> BoxFuture<'a, Result<RemoteBody>> {
        self.opened.lock().unwrap().push(url.clone());
        let script = self.script.clone();
        Box::pin(async move {
            match script {
                Script::Respond {
                    status,
                    total,
                    steps,
                } => {
                    let items = steps.into_iter().map(|step| match step {
                        Step::Chunk(bytes) => Ok(bytes),
                        Step::Fail => Err(Error::Internal("connection reset by peer".into())),
                    });
                    let body: BodyStream = stream::iter(items).boxed();
                    Ok(RemoteBody {
                        status,
                        headers: headers_for(total),
                        body: Some(body),
                    })
                }
                Script::NoBody => Ok(RemoteBody {
                    status: StatusCode::OK,
                    headers: HeaderMap::new(),
                    body: None,
                }),
                Script::Reject => Err(Error::Internal("network is unreachable".into())),
                Script::Hang => futures::future::pending().await,
                Script::Stall { total } => {
                    let body: BodyStream = stream::pending().boxed();
                    Ok(RemoteBody {
                        status: StatusCode::OK,
                        headers: headers_for(total),
                        body: Some(body),
                    })
                }
            }
        })
    }
}

// === Memory sink ===

/// A [`FileSink`] keeping payloads in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    pub saved: Arc<Mutex<Vec<(String, Payload)>>>,
    fail: bool,
}

impl MemorySink {
    /// A sink whose every save fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn saved_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

impl FileSink for MemorySink {
    fn save<'a>(&'a self, payload: Payload, file_name: &'a str) -> BoxFuture<'a, Result<PathBuf>> {
        Box::pin(async move {
            if self.fail {
                return Err(Error::from(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only storage",
                )));
            }
            self.saved
                .lock()
                .unwrap()
                .push((file_name.to_string(), payload));
            Ok(PathBuf::from(file_name))
        })
    }
}

// === Recording fallback ===

/// Records every fallback navigation.
#[derive(Clone, Default)]
pub struct RecordingFallback {
    pub calls: Arc<Mutex<Vec<(Url, String)>>>,
}

impl RecordingFallback {
    pub fn calls(&self) -> Vec<(Url, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl streamdl::Fallback for RecordingFallback {
    fn navigate(&self, url: &Url, file_name_hint: &str) {
        self.calls
            .lock()
            .unwrap()
            .push((url.clone(), file_name_hint.to_string()));
    }
}

/// Collects progress reports for later assertions.
#[derive(Default)]
pub struct ProgressLog(pub Vec<DownloadProgress>);

impl ProgressLog {
    pub fn record(&mut self) -> impl FnMut(&DownloadProgress) + Send + '_ {
        move |progress| self.0.push(*progress)
    }

    pub fn percents(&self) -> Vec<Option<u8>> {
        self.0.iter().map(|p| p.percent.value()).collect()
    }
}

// === Builder helpers ===

/// Creates a hidden downloader wired to the given test doubles.
pub fn create_test_downloader_builder(
    source: ScriptedSource,
    sink: MemorySink,
    fallback: RecordingFallback,
) -> DownloaderBuilder {
    DownloaderBuilder::hidden()
        .source(source)
        .sink(sink)
        .fallback(fallback)
}

/// Creates test headers with the test user agent
pub fn create_test_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(TEST_USER_AGENT));
    headers
}

/// Creates an HTTP client config without retries, so that error statuses surface at once
pub fn create_test_http_config() -> HttpClientConfig {
    HttpClientConfig {
        retries: 0,
        proxy: None,
        headers: Some(create_test_headers()),
        connect_timeout: None,
    }
}
