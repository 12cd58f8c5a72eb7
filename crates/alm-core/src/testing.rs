//! In-memory connector for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use url::Url;

use crate::error::{Error, InvalidInputError, TransportError};
use crate::http::{RestRequest, RestResponse};
use crate::traits::Connector;
use crate::types::{EntityKind, ServerUrl};
use crate::Result;

const SERVER: &str = "https://alm.example.com";
const PROJECT_ROOT: &str = "https://alm.example.com/qcbin/rest/domains/QA/projects/Web";

/// Replays queued results and records every request it sees.
#[derive(Clone)]
pub(crate) struct RecordingConnector {
    server: ServerUrl,
    requests: Arc<Mutex<Vec<RestRequest>>>,
    results: Arc<Mutex<VecDeque<Result<RestResponse>>>>,
    cleared: Arc<Mutex<usize>>,
    clear_fails: Arc<Mutex<bool>>,
}

impl RecordingConnector {
    pub(crate) fn new() -> Self {
        Self {
            server: ServerUrl::new(SERVER).unwrap(),
            requests: Arc::default(),
            results: Arc::default(),
            cleared: Arc::default(),
            clear_fails: Arc::default(),
        }
    }

    pub(crate) fn push_ok(&self, response: RestResponse) {
        self.results.lock().unwrap().push_back(Ok(response));
    }

    pub(crate) fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_ok(RestResponse {
            status,
            headers: vec![("Content-Type".into(), "application/json".into())],
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub(crate) fn push_err(&self, err: Error) {
        self.results.lock().unwrap().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<RestRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Make every following `clear_session` fail.
    pub(crate) fn fail_clear(&self) {
        *self.clear_fails.lock().unwrap() = true;
    }

    pub(crate) fn clear_count(&self) -> usize {
        *self.cleared.lock().unwrap()
    }

    pub(crate) fn project_url(path: &str) -> String {
        format!("{}/{}", PROJECT_ROOT, path)
    }
}

#[async_trait]
impl Connector for RecordingConnector {
    fn entity_path_url(&self, kind: EntityKind, segments: &[&str]) -> String {
        let mut url = Url::parse(PROJECT_ROOT).unwrap();
        url.path_segments_mut()
            .unwrap()
            .push(kind.collection())
            .extend(segments);
        url.to_string()
    }

    fn resolve(&self, url: &str) -> Result<Url> {
        match Url::parse(url) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => self.server.join(url),
            Err(e) => Err(InvalidInputError::Other {
                message: e.to_string(),
            }
            .into()),
        }
    }

    async fn execute(&self, request: RestRequest) -> Result<RestResponse> {
        self.requests.lock().unwrap().push(request);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .expect("no queued response")
    }

    async fn clear_session(&self) -> Result<()> {
        if *self.clear_fails.lock().unwrap() {
            return Err(TransportError::Http {
                message: "client rebuild failed".into(),
            }
            .into());
        }
        *self.cleared.lock().unwrap() += 1;
        Ok(())
    }
}
