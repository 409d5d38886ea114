use progress_logging::{progress_debug, progress_info, progress_trace, progress_warn};
use thiserror::Error;

use crate::{update, Effect, Msg, Phase, ProgressState, ProgressView, Role, UiBindings};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    #[error("status text binding is required")]
    MissingStatusBinding,
}

/// Synchronous driver: feeds messages through [`update`] and renders the
/// resulting view into the host's [`UiBindings`].
///
/// Effects are returned to the caller, which owns the transport and timers.
#[derive(Debug)]
pub struct Monitor {
    state: ProgressState,
    bindings: UiBindings,
}

impl Monitor {
    pub fn new(bindings: UiBindings) -> Result<Self, MonitorError> {
        if !bindings.is_bound(Role::StatusText) {
            return Err(MonitorError::MissingStatusBinding);
        }
        let unbound = bindings.unbound_roles();
        if !unbound.is_empty() {
            progress_warn!(
                "Progress monitor running with reduced output, unbound roles: {:?}",
                unbound
            );
        }

        let mut monitor = Self {
            state: ProgressState::new(),
            bindings,
        };
        monitor.render_if_dirty();
        Ok(monitor)
    }

    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        if self.state.is_closed() {
            progress_trace!("Ignoring {:?} on closed monitor", msg);
            return Vec::new();
        }

        if let Msg::TransportFailed(reason) = &msg {
            progress_warn!("Progress stream transport failure: {}", reason);
        }

        let before = self.state.phase();
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        let after = self.state.phase();
        if before != after {
            self.log_transition(before, after);
        }
        self.render_if_dirty();
        effects
    }

    /// Marks the monitor stopped. Safe to call any number of times.
    pub fn stop(&mut self) -> Vec<Effect> {
        if self.state.is_stopped() {
            return Vec::new();
        }
        let effects = self.dispatch(Msg::Stopped);
        if self.state.is_stopped() {
            progress_info!("Progress monitor stopped in phase {:?}", self.state.phase());
        }
        effects
    }

    /// Hands the results location to the navigate binding, if any.
    pub fn navigate(&self, location: &str) {
        if self.bindings.navigate(location) {
            progress_info!("Navigating to results at {}", location);
        } else {
            progress_debug!("No navigate binding; results available at {}", location);
        }
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn view(&self) -> ProgressView {
        self.state.view()
    }

    pub fn is_closed(&self) -> bool {
        self.state.is_closed()
    }

    fn render_if_dirty(&mut self) {
        if self.state.consume_dirty() {
            self.bindings.render(&self.state.view());
        }
    }

    fn log_transition(&self, before: Phase, after: Phase) {
        match after {
            Phase::Error => {
                let message = self
                    .state
                    .last_error()
                    .map(|report| report.message.as_str())
                    .unwrap_or_default();
                progress_warn!("Progress stream failed: {}", message);
            }
            Phase::Disconnected => {
                progress_info!("Progress stream disconnected during {:?}", before);
            }
            _ => progress_info!("Progress phase {:?} -> {:?}", before, after),
        }
    }
}
