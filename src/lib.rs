//! Visited Parks: Besucht-Status von Nationalparks synchronisieren.
//! Core-Funktionalität als Library exportiert für Tests und Wiederverwendung.

pub mod app;
pub mod core;
pub mod persistence;
pub mod shared;

pub use app::{AppCommand, AppController, AppEvent, AppIntent, AppState, EventTopic};
pub use core::{ParkCatalog, ParkCode, ParkRecord, ProgressSummary, Session, UserId};
pub use persistence::{
    JsonFileStore, LocalAdapter, MemoryDocumentStore, MemoryKeyValueStore, PersistenceAdapter,
    PersistenceError, RemoteAdapter,
};
pub use shared::{AppOptions, MarkerStyle};
