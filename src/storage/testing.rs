//! In-process fake of the remote service for unit tests

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{PantryError, PantryResult};

use super::transport::{Method, Transport, TransportRequest, TransportResponse};

/// Stores POSTed bodies by path and serves them back on GET
#[derive(Default)]
pub struct FakeRemote {
    records: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<TransportRequest>>,
    offline: bool,
    fail_status: Option<u16>,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every request fails before reaching the service
    pub fn unreachable() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Every request is answered with this status
    pub fn failing_with(status: u16) -> Self {
        Self {
            fail_status: Some(status),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn put_raw(&self, path: &str, body: &str) {
        self.records
            .lock()
            .unwrap()
            .insert(path.to_string(), body.to_string());
    }
}

#[async_trait]
impl Transport for FakeRemote {
    async fn send(&self, request: TransportRequest) -> PantryResult<TransportResponse> {
        self.requests.lock().unwrap().push(request.clone());

        if self.offline {
            return Err(PantryError::transport("network unreachable"));
        }
        if let Some(status) = self.fail_status {
            return Ok(TransportResponse::new(status, "failure"));
        }

        let mut records = self.records.lock().unwrap();
        match request.method {
            Method::Post => {
                let body = request.body.map(|b| b.to_string()).unwrap_or_default();
                records.insert(request.path, body);
                Ok(TransportResponse::new(200, "{}"))
            }
            Method::Get => match records.get(&request.path) {
                Some(body) => Ok(TransportResponse::new(200, body.clone())),
                None => Ok(TransportResponse::new(404, "")),
            },
        }
    }
}
