use std::time::Duration;

use futures_util::StreamExt;
use progress_logging::{progress_debug, progress_trace};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{Flow, SseDecoder, StreamEnd, StreamSignal, TransportError};

#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Results view, resolved against the stream endpoint.
    pub results_path: String,
    /// Optional bound on establishing the connection. Inter-event gaps are never timed.
    pub connect_timeout: Option<Duration>,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            results_path: "/results".to_string(),
            connect_timeout: None,
        }
    }
}

/// Receives transport signals in delivery order.
pub trait FrameSink: Send + Sync {
    fn emit(&self, signal: StreamSignal) -> Flow;
}

#[async_trait::async_trait]
pub trait EventSource: Send + Sync {
    /// Reads `url` as an event stream until the sink stops it, the token is
    /// cancelled, or the connection ends.
    async fn open(
        &self,
        url: &Url,
        sink: &dyn FrameSink,
        cancel: &CancellationToken,
    ) -> Result<StreamEnd, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestEventSource {
    settings: StreamSettings,
}

impl ReqwestEventSource {
    pub fn new(settings: StreamSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| TransportError::Network(err.to_string()))
    }
}

#[async_trait::async_trait]
impl EventSource for ReqwestEventSource {
    async fn open(
        &self,
        url: &Url,
        sink: &dyn FrameSink,
        cancel: &CancellationToken,
    ) -> Result<StreamEnd, TransportError> {
        let client = self.build_client()?;
        let request = client
            .get(url.clone())
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
            response = request => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::HttpStatus(status.as_u16()));
        }
        progress_debug!("Event stream {} opened with status {}", url, status);

        if sink.emit(StreamSignal::Opened) == Flow::Stop {
            return Ok(StreamEnd::Closed);
        }

        let mut decoder = SseDecoder::new();
        let mut stream = response.bytes_stream();
        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(StreamEnd::Cancelled),
                next = stream.next() => next,
            };
            let chunk = match next {
                Some(chunk) => chunk.map_err(map_reqwest_error)?,
                None => return Ok(StreamEnd::Eof),
            };
            progress_trace!("Event stream chunk of {} bytes", chunk.len());
            for frame in decoder.push(&chunk) {
                if sink.emit(StreamSignal::Frame(frame)) == Flow::Stop {
                    return Ok(StreamEnd::Closed);
                }
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout(err.to_string());
    }
    TransportError::Network(err.to_string())
}
