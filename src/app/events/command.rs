use crate::app::session_manager::IdentitySignal;
use crate::core::{ParkCatalog, ParkCode};
use std::sync::Arc;

/// Commands sind mutierende Schritte, die zentral ausgeführt werden.
#[derive(Debug, Clone)]
pub enum AppCommand {
    /// Identitäts-Signal auf den Sitzungs-Automaten anwenden
    ApplyIdentitySignal { signal: IdentitySignal },
    /// Besucht-Status vom aktiven Adapter neu laden
    ReloadVisited,
    /// Besucht-Status eines Parks optimistisch setzen und persistieren
    ToggleVisited { code: ParkCode, visited: bool },
    /// Park-Katalog übernehmen
    SetCatalog { catalog: Arc<ParkCatalog> },
    /// Fehlender Katalog: leer weiterarbeiten und warnen
    UseEmptyCatalog { message: String },
    /// Marker-Aufbau anfordern (verzögert bis zur ersten Ladung)
    RequestMarkerBuild,
    /// Marker abbauen
    TearDownMarkers,
    /// Popup eines Markers öffnen
    OpenMarkerPopup { code: ParkCode },
    /// Popup schließen
    CloseMarkerPopup,
    /// Klick-Handler am Popup-Inhalt registrieren (idempotent pro Park-Code)
    AttachToggleHandler { code: ParkCode },
}
