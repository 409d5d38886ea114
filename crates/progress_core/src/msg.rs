#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The transport reported the connection as open.
    StreamOpened,
    /// Keepalive comment frame from the server.
    Heartbeat,
    /// One raw data payload from the stream.
    Payload(String),
    /// The transport failed or ended before a terminal event.
    TransportFailed(String),
    /// The owner stopped the monitor.
    Stopped,
}
