use crate::{
    decode_event, is_heartbeat, Effect, ErrorOrigin, Msg, ProgressState, StreamEvent,
    NAVIGATION_DELAY,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// Once the state is closed (stopped, or in a terminal phase) every message is
/// ignored, so late transport callbacks cannot change what was rendered.
pub fn update(mut state: ProgressState, msg: Msg) -> (ProgressState, Vec<Effect>) {
    if state.is_closed() {
        return (state, Vec::new());
    }

    let effects = match msg {
        Msg::StreamOpened => {
            state.mark_opened();
            Vec::new()
        }
        Msg::Heartbeat => Vec::new(),
        Msg::Payload(raw) => {
            if is_heartbeat(&raw) {
                return (state, Vec::new());
            }
            match decode_event(&raw) {
                Ok(event) => apply_event(&mut state, event),
                Err(err) => {
                    state.fail(ErrorOrigin::Decoding, err.to_string());
                    vec![Effect::CloseStream]
                }
            }
        }
        Msg::TransportFailed(_reason) => {
            state.disconnect();
            vec![Effect::CloseStream]
        }
        Msg::Stopped => {
            state.stop();
            vec![Effect::CloseStream]
        }
    };

    (state, effects)
}

fn apply_event(state: &mut ProgressState, event: StreamEvent) -> Vec<Effect> {
    match event {
        StreamEvent::Progress { scanned } => {
            state.apply_scanned(scanned);
            Vec::new()
        }
        StreamEvent::MediaPhase { total_media } => {
            state.enter_media_phase(Some(total_media));
            Vec::new()
        }
        StreamEvent::MediaProgress {
            processed_count,
            total_media,
        } => {
            state.apply_media_processed(processed_count, total_media);
            Vec::new()
        }
        StreamEvent::Complete { scanned } => {
            state.complete(scanned);
            vec![
                Effect::CloseStream,
                Effect::ScheduleNavigation {
                    delay: NAVIGATION_DELAY,
                },
            ]
        }
        StreamEvent::Error { message } => {
            state.fail(ErrorOrigin::Server, message);
            vec![Effect::CloseStream]
        }
        StreamEvent::Unrecognized => Vec::new(),
    }
}
