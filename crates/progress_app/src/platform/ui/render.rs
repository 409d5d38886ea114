use std::fmt::Display;
use std::io::Write;
use std::sync::{Arc, Mutex};

use chrono::Local;
use progress_core::UiBindings;

/// Last value printed per role; a repeated render of the same value prints nothing.
#[derive(Debug, Default)]
struct Lines {
    status: Option<String>,
    scanned: Option<u64>,
    panel: Option<&'static str>,
    media_total: Option<u64>,
    media_processed: Option<u64>,
    error_detail: Option<String>,
    results: Option<String>,
}

/// Line-oriented terminal surface for the monitor bindings.
#[derive(Debug, Clone, Default)]
pub struct TerminalScreen {
    lines: Arc<Mutex<Lines>>,
}

impl TerminalScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bindings(&self) -> UiBindings {
        let status = self.clone();
        let scanned = self.clone();
        let scan_panel = self.clone();
        let media_panel = self.clone();
        let media_total = self.clone();
        let media_processed = self.clone();
        let error_detail = self.clone();
        let navigate = self.clone();

        UiBindings::new()
            .with_status_text(move |text| {
                status.with_lines(|lines| {
                    print_if_changed(&mut lines.status, "status", text.to_string());
                });
            })
            .with_scanned_count(move |count| {
                scanned.with_lines(|lines| {
                    print_if_changed(&mut lines.scanned, "messages scanned", count);
                });
            })
            .with_scan_panel_visible(move |visible| {
                if visible {
                    scan_panel.with_lines(|lines| {
                        print_if_changed(&mut lines.panel, "panel", "scan");
                    });
                }
            })
            .with_media_panel_visible(move |visible| {
                if visible {
                    media_panel.with_lines(|lines| {
                        print_if_changed(&mut lines.panel, "panel", "media");
                    });
                }
            })
            .with_media_total(move |total| {
                media_total.with_lines(|lines| {
                    print_if_changed(&mut lines.media_total, "media found", total);
                });
            })
            .with_media_processed(move |processed| {
                media_processed.with_lines(|lines| {
                    let changed =
                        print_if_changed(&mut lines.media_processed, "media processed", processed);
                    match lines.media_total {
                        Some(total) if changed && total > 0 => print_bar(processed, total),
                        _ => {}
                    }
                });
            })
            .with_error_detail(move |message| {
                error_detail.with_lines(|lines| {
                    print_if_changed(&mut lines.error_detail, "error", message.to_string());
                });
            })
            .with_navigate(move |location| {
                navigate.with_lines(|lines| {
                    print_if_changed(&mut lines.results, "results", location.to_string());
                });
            })
    }

    /// Results location handed over by the monitor, once navigation has fired.
    pub fn results(&self) -> Option<String> {
        self.with_lines(|lines| lines.results.clone())
    }

    fn with_lines<R>(&self, f: impl FnOnce(&mut Lines) -> R) -> R {
        let mut lines = self
            .lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut lines)
    }
}

fn print_if_changed<T: PartialEq + Display>(slot: &mut Option<T>, label: &str, value: T) -> bool {
    if slot.as_ref() == Some(&value) {
        return false;
    }
    println!("[{}] {label}: {value}", Local::now().format("%H:%M:%S"));
    *slot = Some(value);
    true
}

const BAR_WIDTH: u64 = 30;

fn print_bar(processed: u64, total: u64) {
    let filled = filled_cells(processed, total);
    let bar: String = (0..BAR_WIDTH)
        .map(|i| if i < filled { '#' } else { '-' })
        .collect();
    let percent = (processed.min(total) as f64 / total as f64) * 100.0;
    println!("           [{bar}] {percent:.0}%");
    let _ = std::io::stdout().flush();
}

/// Number of filled bar cells; `total` must be non-zero.
fn filled_cells(processed: u64, total: u64) -> u64 {
    let cells = u128::from(processed.min(total)) * u128::from(BAR_WIDTH) / u128::from(total);
    cells as u64
}
