//! Application State — zentrale Datenhaltung einer laufenden Anwendung.
//!
//! Alle Teile laufen auf einem logischen Thread. Der Zustand wird per `&AppState`
//! geteilt, damit mehrere Toggles gleichzeitig ausstehen können; veränderliche
//! Teile liegen daher hinter `RefCell`.

use super::command_log::CommandLog;
use super::event_bus::EventBus;
use super::marker_registry::MarkerRegistry;
use super::progress_tracker::ProgressTracker;
use super::session_manager::{SessionManager, SessionState};
use super::visited_cache::VisitedStateCache;
use super::EventTopic;
use crate::core::{ParkCatalog, Session};
use crate::persistence::{
    DocumentStore, JournalStore, KeyValueStore, LocalAdapter, PersistenceAdapter, RemoteAdapter,
};
use crate::shared::AppOptions;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;
use std::sync::Arc;

/// Hauptzustand der Anwendung
pub struct AppState {
    /// Laufzeit-Optionen (Marker-Stile, Pfade, Gesamtzahl)
    pub options: AppOptions,
    bus: Rc<EventBus>,
    session: RefCell<SessionManager>,
    visited: VisitedStateCache,
    markers: Rc<RefCell<MarkerRegistry>>,
    progress: Rc<RefCell<ProgressTracker>>,
    catalog: RefCell<Arc<ParkCatalog>>,
    local_store: Rc<dyn KeyValueStore>,
    documents: Rc<dyn DocumentStore>,
    command_log: RefCell<CommandLog>,
}

impl AppState {
    /// Baut den Zustand auf: anonyme Sitzung mit lokalem Adapter, leerer Katalog.
    pub fn new(
        options: AppOptions,
        local_store: Rc<dyn KeyValueStore>,
        documents: Rc<dyn DocumentStore>,
    ) -> Self {
        let bus = Rc::new(EventBus::new());
        let markers = Rc::new(RefCell::new(MarkerRegistry::new(&options)));
        let progress = Rc::new(RefCell::new(ProgressTracker::new(options.total_parks)));
        bus.subscribe(
            &[
                EventTopic::VisitedChanged,
                EventTopic::SignedIn,
                EventTopic::SignedOut,
            ],
            markers.clone(),
        );
        bus.subscribe(&[EventTopic::VisitedChanged], progress.clone());

        let adapter: Rc<dyn PersistenceAdapter> = Rc::new(LocalAdapter::new(local_store.clone()));
        let visited = VisitedStateCache::new(bus.clone(), adapter);

        Self {
            options,
            bus,
            session: RefCell::new(SessionManager::new()),
            visited,
            markers,
            progress,
            catalog: RefCell::new(Arc::new(ParkCatalog::empty())),
            local_store,
            documents,
            command_log: RefCell::new(CommandLog::new()),
        }
    }

    /// Event-Bus der Anwendung.
    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Aktive Sitzung.
    pub fn session(&self) -> Session {
        self.session.borrow().session().clone()
    }

    /// Zustand des Sitzungs-Automaten.
    pub fn session_state(&self) -> SessionState {
        self.session.borrow().state().clone()
    }

    pub(crate) fn session_manager_mut(&self) -> RefMut<'_, SessionManager> {
        self.session.borrow_mut()
    }

    /// Besucht-Cache der aktiven Sitzung.
    pub fn visited(&self) -> &VisitedStateCache {
        &self.visited
    }

    /// Marker-Registry (read-only).
    pub fn markers(&self) -> Ref<'_, MarkerRegistry> {
        self.markers.borrow()
    }

    pub(crate) fn markers_mut(&self) -> RefMut<'_, MarkerRegistry> {
        self.markers.borrow_mut()
    }

    /// Fortschrittsanzeige.
    pub fn progress(&self) -> Ref<'_, ProgressTracker> {
        self.progress.borrow()
    }

    /// Aktueller Park-Katalog.
    pub fn catalog(&self) -> Arc<ParkCatalog> {
        self.catalog.borrow().clone()
    }

    pub(crate) fn replace_catalog(&self, catalog: Arc<ParkCatalog>) {
        *self.catalog.borrow_mut() = catalog;
    }

    /// Adapter passend zur aktuellen Sitzung.
    pub fn adapter_for_session(&self) -> Rc<dyn PersistenceAdapter> {
        match self.session() {
            Session::Anonymous => Rc::new(LocalAdapter::new(self.local_store.clone())),
            Session::SignedIn(user_id) => {
                Rc::new(RemoteAdapter::new(self.documents.clone(), user_id))
            }
        }
    }

    /// Journal der aktuellen Sitzung (nur angemeldet nutzbar).
    pub fn journal(&self) -> JournalStore {
        JournalStore::for_session(self.documents.clone(), &self.session())
    }

    /// Verlauf ausgeführter Commands.
    pub fn command_log(&self) -> Ref<'_, CommandLog> {
        self.command_log.borrow()
    }

    pub(crate) fn record_command(&self, command: &super::AppCommand) {
        self.command_log.borrow_mut().record(command.clone());
    }

    /// Setzt alle Singletons zurück (Test-Isolation). Subscriptions bleiben bestehen.
    pub fn reset(&self) {
        self.session.borrow_mut().reset();
        self.visited
            .reset(Rc::new(LocalAdapter::new(self.local_store.clone())));
        self.markers.borrow_mut().reset();
        self.progress.borrow_mut().reset();
        *self.catalog.borrow_mut() = Arc::new(ParkCatalog::empty());
        self.command_log.borrow_mut().clear();
        self.bus.clear_history();
    }
}
