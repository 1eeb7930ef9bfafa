//! Fire-and-forget hand-off of response events.
//!
//! Quiz sessions push into a [`ResponseSink`] and move on; a
//! [`ResponseLogWorker`] drains the channel and delivers each event to a
//! [`ResponseLogTarget`]. Delivery failures are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::domain::NewResponse;
use super::repository::ResponseRepository;
use super::service::{ResponseService, ResponseServiceError};

/// Destination for drained response events.
#[async_trait]
pub trait ResponseLogTarget: Send + Sync {
    async fn deliver(&self, response: &NewResponse) -> Result<(), ResponseLogError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ResponseLogError {
    #[error("response log transport failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("response log endpoint returned HTTP {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Rejected(#[from] ResponseServiceError),
}

/// Posts events to a Mission Secure service's `/responses` endpoint.
#[derive(Debug, Clone)]
pub struct HttpResponseLogger {
    client: reqwest::Client,
    base_url: String,
}

impl HttpResponseLogger {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ResponseLogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ResponseLogTarget for HttpResponseLogger {
    async fn deliver(&self, response: &NewResponse) -> Result<(), ResponseLogError> {
        let reply = self
            .client
            .post(format!("{}/responses", self.base_url))
            .json(response)
            .send()
            .await?;

        let status = reply.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(ResponseLogError::Status {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl<R> ResponseLogTarget for ResponseService<R>
where
    R: ResponseRepository + 'static,
{
    async fn deliver(&self, response: &NewResponse) -> Result<(), ResponseLogError> {
        self.record(response.clone())?;
        Ok(())
    }
}

/// Sending half handed to quiz sessions. Never blocks.
#[derive(Debug, Clone)]
pub struct ResponseSink {
    tx: mpsc::UnboundedSender<NewResponse>,
}

impl ResponseSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<NewResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Enqueue an event; a closed channel is logged and ignored.
    pub fn submit(&self, response: NewResponse) {
        if let Err(err) = self.tx.send(response) {
            tracing::warn!(
                question_id = %err.0.question_id,
                "response log channel closed; dropping event"
            );
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogWorkerSummary {
    pub delivered: usize,
    pub dropped: usize,
}

/// Consumer side of the response log channel.
pub struct ResponseLogWorker<T> {
    rx: mpsc::UnboundedReceiver<NewResponse>,
    target: Arc<T>,
}

impl<T> ResponseLogWorker<T>
where
    T: ResponseLogTarget + 'static,
{
    pub fn new(rx: mpsc::UnboundedReceiver<NewResponse>, target: Arc<T>) -> Self {
        Self { rx, target }
    }

    /// Drain until every sink is dropped.
    pub async fn run(mut self) -> LogWorkerSummary {
        let mut summary = LogWorkerSummary::default();
        while let Some(response) = self.rx.recv().await {
            match self.target.deliver(&response).await {
                Ok(()) => {
                    summary.delivered += 1;
                    tracing::debug!(question_id = %response.question_id, "response logged");
                }
                Err(err) => {
                    summary.dropped += 1;
                    tracing::warn!(
                        error = %err,
                        question_id = %response.question_id,
                        "failed to log response"
                    );
                }
            }
        }
        summary
    }

    pub fn spawn(self) -> JoinHandle<LogWorkerSummary> {
        tokio::spawn(self.run())
    }
}
