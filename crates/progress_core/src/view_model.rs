use crate::{ErrorOrigin, Phase, ProgressState};

/// Render-ready snapshot of [`ProgressState`].
///
/// Counters that have no value yet are `None` and are not rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressView {
    pub phase: Phase,
    pub status_text: String,
    pub scanned_count: Option<u64>,
    pub media_total: Option<u64>,
    pub media_processed: Option<u64>,
    pub scan_panel_visible: bool,
    pub media_panel_visible: bool,
    pub last_error: Option<String>,
}

pub fn status_text(state: &ProgressState) -> String {
    match state.phase() {
        Phase::Connecting => "Connecting to server...".to_string(),
        Phase::Scanning => "Scanning messages...".to_string(),
        Phase::MediaPhase => match state.media_total() {
            Some(total) => format!("{total} media items found. Downloading..."),
            None => "Downloading media...".to_string(),
        },
        Phase::Complete => {
            "Scan finished! Found messages with reactions. Redirecting...".to_string()
        }
        Phase::Error => match state.last_error().map(|report| report.origin) {
            Some(ErrorOrigin::Decoding) => "Error processing update.".to_string(),
            Some(ErrorOrigin::Server) | None => "An error occurred.".to_string(),
        },
        Phase::Disconnected => "Connection error. Unable to get progress.".to_string(),
    }
}
