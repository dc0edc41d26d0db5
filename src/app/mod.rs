//! Application-Layer: Controller, State, Events und Sitzungs-Synchronisation.

pub mod command_log;
pub mod controller;
pub mod event_bus;
pub mod events;
pub mod handlers;
mod intent_mapping;
pub mod marker_registry;
pub mod progress_tracker;
pub mod session_manager;
/// Application State
///
/// Dieses Modul verwaltet den Zustand der Anwendung (Sitzung, Cache, Marker, Katalog).
pub mod state;
pub mod visited_cache;

pub use command_log::{CommandLog, EventLog};
pub use controller::AppController;
pub use event_bus::{EventBus, EventSubscriber};
pub use events::{AppCommand, AppEvent, AppIntent, EventTopic, Notice, VisitedChange};
pub use marker_registry::{MarkerRegistry, MarkerView, PopupContent, RenderStats};
pub use progress_tracker::ProgressTracker;
pub use session_manager::{
    AuthTransitionError, IdentitySignal, SessionManager, SessionState, SessionTransition,
};
pub use state::AppState;
pub use visited_cache::{ReloadOutcome, ToggleOutcome, VisitedStateCache};
