use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use progress_core::{Effect, Monitor, Msg, ProgressView, UiBindings};
use progress_logging::{progress_error, progress_info};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{
    EventSource, Flow, FrameSink, ReqwestEventSource, SseFrame, StartError, StreamEnd,
    StreamSettings, StreamSignal, TransportError,
};

/// Owner-side handle to a running progress monitor.
///
/// Dropping the handle stops the monitor.
pub struct MonitorHandle {
    monitor: Arc<Mutex<Monitor>>,
    cancel: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

impl MonitorHandle {
    /// Closes the stream. Idempotent, and a no-op once the stream has closed itself.
    ///
    /// Must not be called from inside a binding callback.
    pub fn stop(&self) {
        let effects = lock(&self.monitor).stop();
        if !effects.is_empty() {
            progress_info!("Progress monitor stop requested");
        }
        self.cancel.cancel();
    }

    pub fn view(&self) -> ProgressView {
        lock(&self.monitor).view()
    }

    /// True once the stream is closed and any scheduled navigation has run.
    pub fn is_finished(&self) -> bool {
        self.worker
            .as_ref()
            .map_or(true, |worker| worker.is_finished())
    }

    /// Blocks until the worker has finished.
    pub fn wait(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                progress_error!("Progress monitor worker panicked");
            }
        }
    }
}

impl Drop for MonitorHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Opens `endpoint` as a progress stream and renders into `bindings`.
pub fn start(endpoint: &str, bindings: UiBindings) -> Result<MonitorHandle, StartError> {
    let settings = StreamSettings::default();
    let source = Arc::new(ReqwestEventSource::new(settings.clone()));
    start_with(endpoint, bindings, settings, source)
}

/// Like [`start`], with explicit settings and transport.
pub fn start_with(
    endpoint: &str,
    bindings: UiBindings,
    settings: StreamSettings,
    source: Arc<dyn EventSource>,
) -> Result<MonitorHandle, StartError> {
    let endpoint = Url::parse(endpoint)?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(StartError::UnsupportedScheme(endpoint.scheme().to_string()));
    }
    let results = endpoint.join(&settings.results_path)?;

    // Renders "connecting" before any IO happens.
    let monitor = Arc::new(Mutex::new(Monitor::new(bindings)?));
    let cancel = CancellationToken::new();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let worker = {
        let monitor = monitor.clone();
        let cancel = cancel.clone();
        thread::Builder::new()
            .name("progress-monitor".to_string())
            .spawn(move || {
                runtime.block_on(run_stream(source, endpoint, results, monitor, cancel));
            })?
    };

    Ok(MonitorHandle {
        monitor,
        cancel,
        worker: Some(worker),
    })
}

async fn run_stream(
    source: Arc<dyn EventSource>,
    endpoint: Url,
    results: Url,
    monitor: Arc<Mutex<Monitor>>,
    cancel: CancellationToken,
) {
    progress_info!("Opening progress stream {}", endpoint);
    let sink = MonitorSink {
        monitor: monitor.clone(),
        cancel: cancel.clone(),
        navigation: Mutex::new(None),
    };

    match source.open(&endpoint, &sink, &cancel).await {
        Ok(StreamEnd::Closed) => progress_info!("Progress stream closed"),
        Ok(StreamEnd::Cancelled) => progress_info!("Progress stream cancelled"),
        Ok(StreamEnd::Eof) => {
            sink.dispatch(Msg::TransportFailed(
                TransportError::UnexpectedEof.to_string(),
            ));
        }
        Err(err) => {
            sink.dispatch(Msg::TransportFailed(err.to_string()));
        }
    }

    if let Some(delay) = sink.take_navigation() {
        tokio::time::sleep(delay).await;
        lock(&monitor).navigate(results.as_str());
    }
}

/// Feeds transport signals into the shared monitor and executes its effects.
struct MonitorSink {
    monitor: Arc<Mutex<Monitor>>,
    cancel: CancellationToken,
    navigation: Mutex<Option<Duration>>,
}

impl MonitorSink {
    fn dispatch(&self, msg: Msg) -> Flow {
        let (effects, closed) = {
            let mut monitor = lock(&self.monitor);
            let effects = monitor.dispatch(msg);
            (effects, monitor.is_closed())
        };

        for effect in effects {
            match effect {
                Effect::CloseStream => self.cancel.cancel(),
                Effect::ScheduleNavigation { delay } => {
                    let mut navigation = lock(&self.navigation);
                    if navigation.is_none() {
                        *navigation = Some(delay);
                    }
                }
            }
        }

        if closed {
            Flow::Stop
        } else {
            Flow::Continue
        }
    }

    fn take_navigation(&self) -> Option<Duration> {
        lock(&self.navigation).take()
    }
}

impl FrameSink for MonitorSink {
    fn emit(&self, signal: StreamSignal) -> Flow {
        let msg = match signal {
            StreamSignal::Opened => Msg::StreamOpened,
            StreamSignal::Frame(SseFrame::Comment(_)) => Msg::Heartbeat,
            StreamSignal::Frame(SseFrame::Data(data)) => Msg::Payload(data),
        };
        self.dispatch(msg)
    }
}

/// Locks ignoring poison; a panicking binding must not wedge teardown.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
