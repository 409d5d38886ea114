//! Progress core: pure scan/download progress state machine and view-model helpers.
mod bindings;
mod effect;
mod event;
mod monitor;
mod msg;
mod state;
mod update;
mod view_model;

pub use bindings::{CountBinding, Role, TextBinding, UiBindings, VisibilityBinding};
pub use effect::{Effect, NAVIGATION_DELAY};
pub use event::{decode_event, is_heartbeat, DecodeError, StreamEvent};
pub use monitor::{Monitor, MonitorError};
pub use msg::Msg;
pub use state::{ErrorOrigin, ErrorReport, Panel, Phase, ProgressState};
pub use update::update;
pub use view_model::{status_text, ProgressView};
