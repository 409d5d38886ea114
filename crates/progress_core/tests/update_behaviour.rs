use std::sync::Once;

use pretty_assertions::assert_eq;
use progress_core::{
    update, Effect, ErrorOrigin, Msg, Panel, Phase, ProgressState, NAVIGATION_DELAY,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(progress_logging::initialize_for_tests);
}

fn feed(state: ProgressState, payloads: &[&str]) -> (ProgressState, Vec<Effect>) {
    payloads.iter().fold((state, Vec::new()), |(state, mut all), raw| {
        let (state, effects) = update(state, Msg::Payload((*raw).to_string()));
        all.extend(effects);
        (state, all)
    })
}

#[test]
fn starts_connecting_and_opens_into_scanning() {
    init_logging();
    let state = ProgressState::new();
    assert_eq!(state.phase(), Phase::Connecting);
    assert_eq!(state.view().status_text, "Connecting to server...");
    assert_eq!(state.media_total(), None);
    assert_eq!(state.media_processed(), None);

    let (state, effects) = update(state, Msg::StreamOpened);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Scanning);
    assert_eq!(state.view().status_text, "Scanning messages...");
}

#[test]
fn progress_tracks_latest_scanned_value() {
    init_logging();
    let (state, effects) = feed(
        ProgressState::new(),
        &[
            r#"{"type":"progress","scanned":1}"#,
            r#"{"type":"progress","scanned":1}"#,
            r#"{"type":"progress","scanned":40}"#,
            r#"{"type":"progress","scanned":250}"#,
        ],
    );

    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Scanning);
    assert_eq!(state.scanned_count(), Some(250));
    assert_eq!(state.view().scanned_count, Some(250));
    assert!(state.view().scan_panel_visible);
    assert!(!state.view().media_panel_visible);
}

#[test]
fn media_phase_switches_panel_and_late_progress_does_not_revert() {
    init_logging();
    let (state, _) = feed(
        ProgressState::new(),
        &[
            r#"{"type":"progress","scanned":5}"#,
            r#"{"type":"media_phase","total_media":3}"#,
        ],
    );
    assert_eq!(state.phase(), Phase::MediaPhase);
    assert_eq!(state.panel(), Panel::Media);
    assert_eq!(state.media_total(), Some(3));
    assert_eq!(state.media_processed(), Some(0));
    assert_eq!(
        state.view().status_text,
        "3 media items found. Downloading..."
    );

    let (state, effects) = feed(state, &[r#"{"type":"progress","scanned":7}"#]);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::MediaPhase);
    assert_eq!(state.panel(), Panel::Media);
    assert_eq!(state.scanned_count(), Some(7));
    let view = state.view();
    assert!(!view.scan_panel_visible);
    assert!(view.media_panel_visible);
}

#[test]
fn media_total_is_set_once() {
    init_logging();
    let (state, _) = feed(
        ProgressState::new(),
        &[r#"{"type":"media_phase","total_media":3}"#],
    );
    assert_eq!(state.media_total(), Some(3));

    let (state, _) = feed(
        state,
        &[r#"{"type":"media_progress","processed_count":1,"total_media":9}"#],
    );
    assert_eq!(state.media_total(), Some(3));
    assert_eq!(state.media_processed(), Some(1));

    let (state, effects) = feed(state, &[r#"{"type":"media_phase","total_media":7}"#]);
    assert!(effects.is_empty());
    assert_eq!(state.media_total(), Some(3));
    assert_eq!(state.media_processed(), Some(1));
    assert_eq!(
        state.view().status_text,
        "3 media items found. Downloading..."
    );
}

#[test]
fn media_progress_total_used_when_entering_media_phase() {
    init_logging();
    let (state, _) = feed(
        ProgressState::new(),
        &[
            r#"{"type":"media_progress","processed_count":1,"total_media":4}"#,
            r#"{"type":"media_phase","total_media":6}"#,
        ],
    );

    assert_eq!(state.phase(), Phase::MediaPhase);
    assert_eq!(state.media_total(), Some(4));
}

#[test]
fn media_progress_before_media_phase_enters_media_phase() {
    init_logging();
    let (state, _) = feed(
        ProgressState::new(),
        &[r#"{"type":"media_progress","processed_count":2}"#],
    );

    assert_eq!(state.phase(), Phase::MediaPhase);
    assert_eq!(state.media_processed(), Some(2));
    assert_eq!(state.media_total(), None);
    assert_eq!(state.view().status_text, "Downloading media...");
}

#[test]
fn complete_closes_and_schedules_one_navigation() {
    init_logging();
    let (state, effects) = feed(
        ProgressState::new(),
        &[
            r#"{"type":"progress","scanned":5}"#,
            r#"{"type":"media_phase","total_media":3}"#,
            r#"{"type":"media_progress","processed_count":1}"#,
            r#"{"type":"complete","scanned":5}"#,
        ],
    );

    assert_eq!(
        effects,
        vec![
            Effect::CloseStream,
            Effect::ScheduleNavigation {
                delay: NAVIGATION_DELAY
            },
        ]
    );
    let view = state.view();
    assert_eq!(view.phase, Phase::Complete);
    assert_eq!(view.scanned_count, Some(5));
    assert_eq!(view.media_total, Some(3));
    assert_eq!(view.media_processed, Some(1));
    assert_eq!(
        view.status_text,
        "Scan finished! Found messages with reactions. Redirecting..."
    );
}

#[test]
fn events_after_complete_are_ignored() {
    init_logging();
    let (mut state, _) = feed(
        ProgressState::new(),
        &[r#"{"type":"complete","scanned":9}"#],
    );
    state.consume_dirty();
    let before = state.clone();

    let (state, effects) = feed(
        state,
        &[
            r#"{"type":"media_progress","processed_count":4}"#,
            r#"{"type":"complete","scanned":10}"#,
            "not-json",
        ],
    );
    let (mut state, more) = update(state, Msg::TransportFailed("reset".to_string()));

    assert!(effects.is_empty());
    assert!(more.is_empty());
    assert!(!state.consume_dirty());
    assert_eq!(state, before);
}

#[test]
fn server_error_is_terminal() {
    init_logging();
    let (state, effects) = feed(
        ProgressState::new(),
        &[
            r#"{"type":"progress","scanned":2}"#,
            r#"{"type":"error","message":"chat not found"}"#,
        ],
    );

    assert_eq!(effects, vec![Effect::CloseStream]);
    assert_eq!(state.phase(), Phase::Error);
    let report = state.last_error().expect("error report");
    assert_eq!(report.origin, ErrorOrigin::Server);
    assert_eq!(report.message, "chat not found");
    assert_eq!(state.view().status_text, "An error occurred.");

    let (state, effects) = feed(state, &[r#"{"type":"progress","scanned":3}"#]);
    assert!(effects.is_empty());
    assert_eq!(state.scanned_count(), Some(2));
}

#[test]
fn malformed_payload_becomes_local_error() {
    init_logging();
    let (state, effects) = feed(ProgressState::new(), &["not-json"]);

    assert_eq!(effects, vec![Effect::CloseStream]);
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(
        state.last_error().map(|report| report.origin),
        Some(ErrorOrigin::Decoding)
    );
    assert_eq!(state.view().status_text, "Error processing update.");
}

#[test]
fn missing_companion_field_is_a_decoding_error() {
    init_logging();
    let (state, effects) = feed(ProgressState::new(), &[r#"{"type":"media_phase"}"#]);

    assert_eq!(effects, vec![Effect::CloseStream]);
    assert_eq!(state.phase(), Phase::Error);
    assert_eq!(state.media_total(), None);
}

#[test]
fn transport_failure_disconnects() {
    init_logging();
    let (state, _) = update(ProgressState::new(), Msg::StreamOpened);
    let (state, effects) = update(state, Msg::TransportFailed("connection reset".to_string()));

    assert_eq!(effects, vec![Effect::CloseStream]);
    assert_eq!(state.phase(), Phase::Disconnected);
    assert!(state.last_error().is_none());
    assert_eq!(
        state.view().status_text,
        "Connection error. Unable to get progress."
    );
}

#[test]
fn stopped_state_ignores_everything() {
    init_logging();
    let (state, _) = feed(
        ProgressState::new(),
        &[r#"{"type":"progress","scanned":3}"#],
    );
    let (state, effects) = update(state, Msg::Stopped);
    assert_eq!(effects, vec![Effect::CloseStream]);
    assert!(state.is_stopped());

    let (state, effects) = update(state, Msg::Stopped);
    assert!(effects.is_empty());
    let (state, effects) = feed(state, &[r#"{"type":"complete","scanned":3}"#]);
    assert!(effects.is_empty());
    assert_eq!(state.phase(), Phase::Scanning);
}
