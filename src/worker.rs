//! Background search worker
//!
//! Searches run off the caller's task: requests go in over a channel, each is
//! computed on the blocking pool, and the result comes back tagged with the
//! query that produced it. There is no cancellation. Callers drop results for
//! superseded queries with [`SearchClient`].

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::panel::{Panel, Tool};
use crate::search::{search_tools, SearchFieldWeights, SearchResults};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, error};

/// Payload of a `searchToolsByKeys` request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub tools: Vec<Tool>,
    /// Field weights; the configured weights when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keys: Option<SearchFieldWeights>,
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub panel_view: Option<String>,
    /// Panel to reconstruct against; derived from `tools` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_panel: Option<Panel>,
}

impl SearchRequest {
    pub fn new(tools: Vec<Tool>, query: impl Into<String>) -> Self {
        Self {
            tools,
            keys: None,
            query: query.into(),
            panel_view: None,
            current_panel: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum WorkerRequest {
    #[serde(rename = "searchToolsByKeys")]
    SearchToolsByKeys(SearchRequest),
}

impl WorkerRequest {
    pub fn query(&self) -> &str {
        match self {
            WorkerRequest::SearchToolsByKeys(request) => &request.query,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerResponse {
    #[serde(rename = "searchToolsByKeysResult")]
    SearchToolsByKeysResult {
        payload: SearchResults,
        /// The query of the request this answers
        query: String,
    },
}

impl WorkerResponse {
    pub fn query(&self) -> &str {
        match self {
            WorkerResponse::SearchToolsByKeysResult { query, .. } => query,
        }
    }

    pub fn payload(&self) -> &SearchResults {
        match self {
            WorkerResponse::SearchToolsByKeysResult { payload, .. } => payload,
        }
    }
}

/// Compute one request synchronously
pub fn handle_request(request: WorkerRequest, config: &SearchConfig) -> WorkerResponse {
    match request {
        WorkerRequest::SearchToolsByKeys(request) => {
            let weights = request.keys.as_ref().unwrap_or(&config.weights);
            let panel_view = request
                .panel_view
                .as_deref()
                .unwrap_or(&config.default_panel_view);
            let derived;
            let current_panel = match &request.current_panel {
                Some(panel) => panel,
                None => {
                    derived = Panel::from_tools(&request.tools);
                    &derived
                }
            };

            let payload = search_tools(
                &request.tools,
                weights,
                &request.query,
                panel_view,
                current_panel,
                config,
            );
            WorkerResponse::SearchToolsByKeysResult {
                payload,
                query: request.query,
            }
        }
    }
}

/// Every request gets an answer; a failed search answers with no results
fn settle(query: String, result: Result<WorkerResponse, JoinError>) -> WorkerResponse {
    match result {
        Ok(response) => {
            debug!(query = %query, "Search finished");
            response
        }
        Err(e) => {
            error!(query = %query, error = %e, "Search task failed");
            WorkerResponse::SearchToolsByKeysResult {
                payload: SearchResults::default(),
                query,
            }
        }
    }
}

/// Handle to a running worker task
pub struct SearchWorker {
    requests: mpsc::UnboundedSender<WorkerRequest>,
    handle: JoinHandle<()>,
}

impl SearchWorker {
    /// Start the worker; responses arrive on the returned receiver in
    /// request order
    pub fn spawn(config: SearchConfig) -> (Self, mpsc::UnboundedReceiver<WorkerResponse>) {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<WorkerRequest>();
        let (response_tx, response_rx) = mpsc::unbounded_channel::<WorkerResponse>();
        let config = Arc::new(config);

        let handle = tokio::spawn(async move {
            while let Some(request) = request_rx.recv().await {
                let query = request.query().to_string();
                let config = Arc::clone(&config);
                let result = tokio::task::spawn_blocking(move || handle_request(request, &config)).await;

                if response_tx.send(settle(query, result)).is_err() {
                    debug!("Response receiver dropped, stopping worker");
                    break;
                }
            }
            debug!("Search worker stopped");
        });

        (
            Self {
                requests: request_tx,
                handle,
            },
            response_rx,
        )
    }

    /// Queue a request
    pub fn post(&self, request: WorkerRequest) -> Result<(), AppError> {
        self.requests
            .send(request)
            .map_err(|_| AppError::WorkerUnavailable("request channel closed".to_string()))
    }

    /// Stop accepting requests and wait until queued ones have been answered
    pub async fn shutdown(self) -> Result<(), AppError> {
        drop(self.requests);
        self.handle
            .await
            .map_err(|e| AppError::WorkerUnavailable(e.to_string()))
    }
}

/// Caller side of the worker that only surfaces results for the latest query
pub struct SearchClient {
    worker: SearchWorker,
    responses: mpsc::UnboundedReceiver<WorkerResponse>,
    latest: Option<String>,
}

impl SearchClient {
    pub fn spawn(config: SearchConfig) -> Self {
        let (worker, responses) = SearchWorker::spawn(config);
        Self {
            worker,
            responses,
            latest: None,
        }
    }

    /// Post a search; it supersedes every earlier one
    pub fn search(&mut self, request: SearchRequest) -> Result<(), AppError> {
        self.latest = Some(request.query.clone());
        self.worker.post(WorkerRequest::SearchToolsByKeys(request))
    }

    pub fn latest_query(&self) -> Option<&str> {
        self.latest.as_deref()
    }

    /// Whether `response` answers the most recently posted query
    pub fn is_current(&self, response: &WorkerResponse) -> bool {
        self.latest.as_deref() == Some(response.query())
    }

    /// Next response for the latest query, skipping stale ones.
    /// `None` once the worker has stopped.
    pub async fn next_current(&mut self) -> Option<WorkerResponse> {
        while let Some(response) = self.responses.recv().await {
            if self.is_current(&response) {
                return Some(response);
            }
            debug!(query = %response.query(), "Discarding stale search result");
        }
        None
    }

    pub async fn shutdown(self) -> Result<(), AppError> {
        self.worker.shutdown().await
    }
}
