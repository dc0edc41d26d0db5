use crate::core::{ParkCatalog, ParkCode};
use std::path::Path;
use std::sync::Arc;

/// App-Intents: Eingaben aus Karten-Widget, Identitäts-Provider und Host.
/// Intents enthalten keine Mutationslogik.
#[derive(Debug, Clone)]
pub enum AppIntent {
    /// Anwendung gestartet (erste Ladung des Besucht-Status)
    AppStarted,
    /// Park-Katalog vom Proxy erhalten
    CatalogLoaded { catalog: Arc<ParkCatalog> },
    /// Park-Daten nicht verfügbar
    CatalogUnavailable { message: String },
    /// Karte bereit: Marker sollen erstellt werden
    MapReady,
    /// Karte wird abgebaut
    MapTornDown,
    /// Anmelde-Popup wurde geöffnet
    SignInStarted,
    /// Identität gesetzt (Nutzer angemeldet)
    IdentitySet { user_id: String },
    /// Identität entfernt (Nutzer abgemeldet)
    IdentityCleared,
    /// Identitäts-Provider meldet einen Fehler statt set/clear
    IdentityError { message: String },
    /// Popup eines Markers wurde geöffnet
    MarkerPopupOpened { code: ParkCode },
    /// Popup wurde geschlossen
    MarkerPopupClosed,
    /// Checkbox "I've been here!" im Popup angeklickt
    MarkerCheckboxClicked { code: ParkCode },
    /// Besucht-Status direkt setzen (z.B. Listenansicht)
    SetVisitedRequested { code: ParkCode, visited: bool },
}

impl AppIntent {
    /// Liest den Park-Katalog aus einer JSON-Datei. Fehler werden nicht fatal,
    /// sondern als `CatalogUnavailable` weitergereicht.
    pub fn catalog_from_file(path: &Path) -> Self {
        match ParkCatalog::load_from_file(path) {
            Ok(catalog) => Self::CatalogLoaded {
                catalog: Arc::new(catalog),
            },
            Err(e) => Self::CatalogUnavailable {
                message: e.to_string(),
            },
        }
    }
}
