//! Scripted fakes for the remote API and the asset fetcher.

use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::images::{AssetFetcher, Downloader};
use crate::remote::{ApiTransport, RemoteClient, RemoteError};
use crate::storage::StorageWriter;

/// `ApiTransport` answering from a fixed endpoint table and recording every call.
#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    routes: Arc<Mutex<HashMap<String, Result<Value, RemoteError>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, endpoint: &str, body: Value) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Ok(body));
        self
    }

    pub(crate) fn fail(self, endpoint: &str, err: RemoteError) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(endpoint.to_string(), Err(err));
        self
    }

    pub(crate) fn client(&self) -> RemoteClient {
        RemoteClient::new(Arc::new(self.clone()))
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ApiTransport for FakeApi {
    fn get_json(&self, endpoint: &str) -> Result<Value, RemoteError> {
        self.calls.lock().unwrap().push(endpoint.to_string());
        self.routes
            .lock()
            .unwrap()
            .get(endpoint)
            .cloned()
            .unwrap_or_else(|| Err(RemoteError::status(endpoint, 404, "Not found")))
    }
}

/// `AssetFetcher` serving fixed bodies per URL; unknown URLs fail.
#[derive(Clone, Default)]
pub(crate) struct FakeFetcher {
    bodies: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fetched: Arc<Mutex<Vec<String>>>,
}

impl FakeFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn serve(self, url: &str, body: &[u8]) -> Self {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_vec());
        self
    }

    pub(crate) fn downloader(&self) -> Downloader {
        Downloader::new(Arc::new(self.clone()))
    }

    /// URLs a fetch was attempted for, sorted (attempts run concurrently).
    pub(crate) fn fetched(&self) -> Vec<String> {
        let mut urls = self.fetched.lock().unwrap().clone();
        urls.sort();
        urls
    }
}

impl AssetFetcher for FakeFetcher {
    fn fetch_into(&self, url: &str, storage: &StorageWriter) -> Result<u64> {
        self.fetched.lock().unwrap().push(url.to_string());
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GET {} returned HTTP 404", url))?;
        storage.write_at(0, &body)?;
        Ok(body.len() as u64)
    }
}
