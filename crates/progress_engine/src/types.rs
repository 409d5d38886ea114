use thiserror::Error;

use crate::SseFrame;

/// What a transport reports to its [`crate::FrameSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamSignal {
    Opened,
    Frame(SseFrame),
}

/// Whether the transport should keep reading after a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// How a stream ended without a transport error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// The sink asked to stop reading.
    Closed,
    /// The owner cancelled the stream.
    Cancelled,
    /// The server closed the connection.
    Eof,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("connection timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("stream ended before completion")]
    UnexpectedEof,
}

#[derive(Debug, Error)]
pub enum StartError {
    #[error("invalid stream endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("unsupported stream endpoint scheme: {0}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Monitor(#[from] progress_core::MonitorError),
    #[error("failed to start monitor worker: {0}")]
    Worker(#[from] std::io::Error),
}
