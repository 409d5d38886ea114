use crate::view_model::{status_text, ProgressView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Connecting,
    Scanning,
    MediaPhase,
    Complete,
    Error,
    Disconnected,
}

impl Phase {
    /// Terminal phases end processing for the current stream.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Error | Phase::Disconnected)
    }
}

/// Which progress sub-panel is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Scan,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// The server sent an `error` event.
    Server,
    /// A payload could not be decoded locally.
    Decoding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub origin: ErrorOrigin,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressState {
    phase: Phase,
    panel: Panel,
    scanned_count: Option<u64>,
    media_total: Option<u64>,
    media_processed: Option<u64>,
    last_error: Option<ErrorReport>,
    stopped: bool,
    dirty: bool,
}

impl ProgressState {
    /// Fresh state in `Connecting`, dirty so the first render happens immediately.
    pub fn new() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn scanned_count(&self) -> Option<u64> {
        self.scanned_count
    }

    pub fn media_total(&self) -> Option<u64> {
        self.media_total
    }

    pub fn media_processed(&self) -> Option<u64> {
        self.media_processed
    }

    pub fn last_error(&self) -> Option<&ErrorReport> {
        self.last_error.as_ref()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// No further input is processed once stopped or in a terminal phase.
    pub fn is_closed(&self) -> bool {
        self.stopped || self.phase.is_terminal()
    }

    pub fn view(&self) -> ProgressView {
        ProgressView {
            phase: self.phase,
            status_text: status_text(self),
            scanned_count: self.scanned_count,
            media_total: self.media_total,
            media_processed: self.media_processed,
            scan_panel_visible: self.panel == Panel::Scan,
            media_panel_visible: self.panel == Panel::Media,
            last_error: self.last_error.as_ref().map(|report| report.message.clone()),
        }
    }

    /// Returns whether the state changed since the last call, clearing the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_opened(&mut self) {
        if self.phase == Phase::Connecting {
            self.phase = Phase::Scanning;
            self.dirty = true;
        }
    }

    pub(crate) fn apply_scanned(&mut self, scanned: u64) {
        self.scanned_count = Some(scanned);
        if matches!(self.phase, Phase::Connecting | Phase::Scanning) {
            self.phase = Phase::Scanning;
            self.panel = Panel::Scan;
        }
        self.dirty = true;
    }

    pub(crate) fn enter_media_phase(&mut self, total_media: Option<u64>) {
        self.phase = Phase::MediaPhase;
        self.panel = Panel::Media;
        // Set once; later totals from the server are ignored.
        if self.media_total.is_none() {
            self.media_total = total_media;
        }
        if self.media_processed.is_none() {
            self.media_processed = Some(0);
        }
        self.dirty = true;
    }

    pub(crate) fn apply_media_processed(&mut self, processed: u64, total_media: Option<u64>) {
        if self.phase != Phase::MediaPhase {
            self.enter_media_phase(total_media);
        }
        self.media_processed = Some(processed);
        self.dirty = true;
    }

    pub(crate) fn complete(&mut self, scanned: u64) {
        self.scanned_count = Some(scanned);
        self.phase = Phase::Complete;
        self.dirty = true;
    }

    pub(crate) fn fail(&mut self, origin: ErrorOrigin, message: String) {
        self.phase = Phase::Error;
        self.last_error = Some(ErrorReport { origin, message });
        self.dirty = true;
    }

    pub(crate) fn disconnect(&mut self) {
        self.phase = Phase::Disconnected;
        self.dirty = true;
    }

    pub(crate) fn stop(&mut self) {
        self.stopped = true;
    }
}
