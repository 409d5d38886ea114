//! Progress engine: event-stream transport and monitor runtime.
mod engine;
mod source;
mod sse;
mod types;

pub use engine::{start, start_with, MonitorHandle};
pub use source::{EventSource, FrameSink, ReqwestEventSource, StreamSettings};
pub use sse::{SseDecoder, SseFrame};
pub use types::{Flow, StartError, StreamEnd, StreamSignal, TransportError};
