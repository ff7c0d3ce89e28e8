#![warn(missing_docs)]
//! # nutrition-track-upload
//!
//! ## Purpose
//! Sends the pending image to the analysis endpoint and interprets the reply.
//!
//! ## Responsibilities
//! - Validate the configured endpoint.
//! - Package a [`PendingFile`] as a single-field multipart request.
//! - Delegate the network round trip to an injectable [`AnalysisTransport`].
//! - Map status codes and bodies onto [`AnalysisResult`] or [`AnalysisError`].
//!
//! ## Data flow
//! [`AnalysisClient::build_request`] -> [`AnalysisTransport::send`] ->
//! [`interpret_response`] -> caller renders or notifies.
//!
//! ## Ownership and lifetimes
//! Requests share the pending file buffer through [`Bytes`]; building one does
//! not copy the image.
//!
//! ## Error model
//! No response at all is [`AnalysisError::Network`]. A non-2xx response is
//! [`AnalysisError::Server`] carrying the body's `error` text. A 2xx response
//! whose body does not decode is [`AnalysisError::MalformedResponse`].
//!
//! ## Concurrency
//! Exactly one request is outstanding at a time; callers disable the analyze
//! action until [`AnalysisClient::submit`] resolves. There is no retry,
//! timeout, or cancellation.

use bytes::Bytes;
use nutrition_track_analysis_contract::{
    AnalysisResult, parse_analysis_result, parse_error_message,
};
use nutrition_track_core::PendingFile;
use thiserror::Error;
use url::Url;

/// Default analysis endpoint, relative to the page origin.
pub const DEFAULT_ANALYZE_ENDPOINT: &str = "/analyze";

/// Multipart field carrying the image.
pub const MULTIPART_FILE_FIELD: &str = "file";

/// Generic user message for transport and decode failures.
pub const RETRY_MESSAGE: &str = "Failed to analyze image. Please try again.";

/// One multipart upload of the pending image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    /// Target endpoint (absolute URL or origin-relative path).
    pub endpoint: String,
    /// Multipart field name.
    pub field_name: &'static str,
    /// Filename reported in the multipart part.
    pub file_name: String,
    /// Content type of the part.
    pub media_type: String,
    /// Image bytes.
    pub bytes: Bytes,
}

/// Raw HTTP reply handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl TransportResponse {
    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failure before any response arrived.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport failure: {0}")]
pub struct TransportError(pub String);

/// Network seam used by [`AnalysisClient`].
// Browser fetch futures are not `Send`, so no `Send` bound is implied.
#[allow(async_fn_in_trait)]
pub trait AnalysisTransport {
    /// Performs one POST of `request` and returns whatever the server sent.
    ///
    /// # Errors
    /// Returns [`TransportError`] only when no HTTP response was received.
    async fn send(&self, request: &AnalysisRequest) -> Result<TransportResponse, TransportError>;
}

/// Client bound to a validated endpoint and a transport.
#[derive(Debug, Clone)]
pub struct AnalysisClient<T> {
    endpoint: String,
    transport: T,
}

impl<T: AnalysisTransport> AnalysisClient<T> {
    /// Creates a client for `endpoint`.
    ///
    /// # Errors
    /// Returns [`AnalysisError::InvalidEndpoint`] when the endpoint is neither
    /// an absolute `http`/`https` URL nor an absolute path.
    pub fn new(endpoint: impl Into<String>, transport: T) -> Result<Self, AnalysisError> {
        let endpoint = endpoint.into();
        validate_endpoint(&endpoint)?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    /// Configured endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Packages `file` for upload.
    pub fn build_request(&self, file: &PendingFile) -> AnalysisRequest {
        AnalysisRequest {
            endpoint: self.endpoint.clone(),
            field_name: MULTIPART_FILE_FIELD,
            file_name: file.name.clone(),
            media_type: file.media_type.clone(),
            bytes: file.bytes.clone(),
        }
    }

    /// Sends `request` and interprets the reply.
    ///
    /// # Errors
    /// See [`interpret_response`]; transport failures map to
    /// [`AnalysisError::Network`].
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        tracing::info!(
            stage = "upload",
            action = "send",
            endpoint = %request.endpoint,
            size = request.bytes.len(),
            "submitting image for analysis"
        );

        let response = self.transport.send(request).await.map_err(|error| {
            tracing::error!(stage = "upload", action = "send", error = %error, "no response");
            AnalysisError::Network(error.0)
        })?;

        tracing::info!(
            stage = "upload",
            action = "response",
            status = response.status,
            "analysis response received"
        );
        interpret_response(&response)
    }
}

/// Maps a raw reply onto the analysis outcome.
///
/// # Errors
/// Returns [`AnalysisError::Server`] for non-2xx statuses and
/// [`AnalysisError::MalformedResponse`] for undecodable 2xx bodies.
pub fn interpret_response(response: &TransportResponse) -> Result<AnalysisResult, AnalysisError> {
    if !response.is_success() {
        return Err(AnalysisError::Server(parse_error_message(&response.body)));
    }

    parse_analysis_result(&response.body)
        .map_err(|error| AnalysisError::MalformedResponse(error.to_string()))
}

/// Validates an analysis endpoint.
///
/// # Errors
/// Returns [`AnalysisError::InvalidEndpoint`] for unsupported schemes,
/// relative paths, and unparsable input.
pub fn validate_endpoint(endpoint: &str) -> Result<(), AnalysisError> {
    let trimmed = endpoint.trim();
    if trimmed.starts_with('/') && !trimmed.starts_with("//") {
        let base = Url::parse("http://localhost/").map_err(|error| {
            AnalysisError::InvalidEndpoint(format!("invalid base url: {error}"))
        })?;
        return base
            .join(trimmed)
            .map(|_| ())
            .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid path: {error}")));
    }

    let parsed = Url::parse(trimmed)
        .map_err(|error| AnalysisError::InvalidEndpoint(format!("invalid url: {error}")))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(AnalysisError::InvalidEndpoint(format!(
            "unsupported scheme {other:?}"
        ))),
    }
}

/// Analysis failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Analyze was requested with no pending file.
    #[error("no file selected")]
    NoFile,
    /// Endpoint answered with a failure status.
    #[error("server error: {0}")]
    Server(String),
    /// No response was received.
    #[error("network error: {0}")]
    Network(String),
    /// Success status with an undecodable body.
    #[error("malformed analysis response: {0}")]
    MalformedResponse(String),
    /// Endpoint configuration is unusable.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl AnalysisError {
    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            AnalysisError::NoFile => "Please select an image first".to_string(),
            AnalysisError::Server(message) => message.clone(),
            AnalysisError::Network(_) | AnalysisError::MalformedResponse(_) => {
                RETRY_MESSAGE.to_string()
            }
            AnalysisError::InvalidEndpoint(_) => "Analysis service is misconfigured".to_string(),
        }
    }
}
