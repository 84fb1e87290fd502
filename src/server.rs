//! Line-delimited JSON worker server
//!
//! Each stdin line is one [`WorkerRequest`]; each stdout line is one
//! [`WorkerResponse`] or an error message. Responses are written by a
//! dedicated task as the worker produces them, so a slow search does not
//! block reading the next request.

use crate::config::SearchConfig;
use crate::error::AppError;
use crate::worker::{SearchWorker, WorkerRequest, WorkerResponse};
use anyhow::Result;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader as AsyncBufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Reply to a line that could not be handled
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "error")]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
}

impl ErrorMessage {
    pub fn from_error(err: &AppError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.message(),
        }
    }
}

/// Parse one request line
pub fn parse_request(line: &str) -> Result<WorkerRequest, AppError> {
    Ok(serde_json::from_str(line)?)
}

pub fn serialize_response(response: &WorkerResponse) -> Result<String> {
    Ok(serde_json::to_string(response)?)
}

/// Serve on stdin/stdout until stdin closes
pub async fn serve_stdio(config: SearchConfig) -> Result<()> {
    info!("Starting toolpanel search worker on stdio");
    let stdin = AsyncBufReader::new(tokio::io::stdin());
    serve(stdin, tokio::io::stdout(), config).await?;
    info!("Search worker server stopped");
    Ok(())
}

/// Serve requests from `reader`, writing replies to `writer`.
///
/// Returns the writer once every queued request has been answered.
pub async fn serve<R, W>(reader: R, writer: W, config: SearchConfig) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();

    let writer_task = tokio::spawn(async move {
        let mut writer = writer;
        while let Some(line) = line_rx.recv().await {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }
        Ok::<W, std::io::Error>(writer)
    });

    let (worker, mut responses) = SearchWorker::spawn(config);

    let forward_tx = line_tx.clone();
    let forward_task = tokio::spawn(async move {
        while let Some(response) = responses.recv().await {
            match serialize_response(&response) {
                Ok(json) => {
                    debug!(query = %response.query(), "Sending response");
                    if forward_tx.send(json).is_err() {
                        break;
                    }
                }
                Err(e) => error!("Failed to serialize response: {}", e),
            }
        }
    });

    // A failed read still drains what was already posted
    let read_result = read_requests(reader, &worker, &line_tx).await;
    if let Err(e) = &read_result {
        error!("Reading requests failed: {}", e);
    }

    debug!("Input closed, draining outstanding searches");
    worker.shutdown().await?;
    forward_task.await?;
    drop(line_tx);
    let writer = writer_task.await??;
    read_result?;
    Ok(writer)
}

/// Post each request line to the worker; reply with an error line to any
/// line that is not a valid request
async fn read_requests<R>(
    mut reader: R,
    worker: &SearchWorker,
    replies: &mpsc::UnboundedSender<String>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }

        let posted = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => parse_request(line.trim()).and_then(|request| {
                debug!(query = %request.query(), "Received request");
                worker.post(request)
            }),
            Err(e) => Err(AppError::ParseFailed(format!(
                "request line is not valid UTF-8: {}",
                e
            ))),
        };

        if let Err(e) = posted {
            warn!("Rejected request line: {}", e);
            let json = serde_json::to_string(&ErrorMessage::from_error(&e))?;
            if replies.send(json).is_err() {
                return Ok(());
            }
        }
    }
}
