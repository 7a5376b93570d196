//! Live reload: connection registry, change watcher, and the pipeline between them.

mod broadcaster;
mod registry;
mod watcher;
mod websocket;

pub(crate) use broadcaster::spawn_reload_pipeline;
pub(crate) use registry::{BroadcastOutcome, ConnectionId, ConnectionRegistry};
pub(crate) use watcher::{ChangeEvent, ChangeKind};
pub(crate) use websocket::{upgrade_request, ws_handler};
