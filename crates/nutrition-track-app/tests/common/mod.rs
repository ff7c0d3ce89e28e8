//! Shared fixtures for app integration tests.

use std::sync::{Arc, Mutex};

use nutrition_track_app::{AppConfig, AppController};
use nutrition_track_auth::MemoryStorage;
use nutrition_track_core::{FileSource, PendingFile};
use nutrition_track_upload::{AnalysisRequest, AnalysisTransport, TransportError, TransportResponse};

/// Transport that replays one scripted outcome and records every request.
#[derive(Debug, Clone)]
pub struct ScriptedTransport {
    outcome: Result<TransportResponse, TransportError>,
    sent: Arc<Mutex<Vec<AnalysisRequest>>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    /// Replies with `status` and `body`.
    pub fn reply(status: u16, body: &str) -> Self {
        Self {
            outcome: Ok(TransportResponse {
                status,
                body: body.to_string(),
            }),
            sent: Arc::default(),
        }
    }

    /// Fails before any response.
    pub fn unreachable() -> Self {
        Self {
            outcome: Err(TransportError("Failed to fetch".to_string())),
            sent: Arc::default(),
        }
    }

    /// Requests sent so far.
    pub fn sent(&self) -> Vec<AnalysisRequest> {
        self.sent.lock().expect("request log lock should work").clone()
    }
}

impl AnalysisTransport for ScriptedTransport {
    async fn send(&self, request: &AnalysisRequest) -> Result<TransportResponse, TransportError> {
        self.sent
            .lock()
            .expect("request log lock should work")
            .push(request.clone());
        self.outcome.clone()
    }
}

/// Controller over fresh in-memory storage.
#[allow(dead_code)]
pub fn controller(transport: ScriptedTransport) -> AppController<MemoryStorage, ScriptedTransport> {
    controller_with_storage(MemoryStorage::new(), transport)
}

/// Controller over caller-provided storage.
#[allow(dead_code)]
pub fn controller_with_storage(
    storage: MemoryStorage,
    transport: ScriptedTransport,
) -> AppController<MemoryStorage, ScriptedTransport> {
    AppController::new(AppConfig::default(), storage, transport)
        .expect("default config should build a controller")
}

/// Small JPEG-typed fixture.
#[allow(dead_code)]
pub fn jpeg(name: &str, source: FileSource) -> PendingFile {
    PendingFile::new(name, "image/jpeg", vec![0xFF, 0xD8, 0xFF, 0xE0], source)
}
