//! Handler für den Park-Katalog.

use crate::app::{AppEvent, AppState};
use crate::core::ParkCatalog;
use std::sync::Arc;

/// Übernimmt den Katalog in State und Marker-Registry.
pub fn set_catalog(state: &AppState, catalog: Arc<ParkCatalog>) {
    if catalog.is_empty() {
        state
            .bus()
            .publish(AppEvent::warning("Keine Park-Daten verfügbar"));
    }
    log::info!("Park-Katalog übernommen: {} Parks", catalog.len());
    state.replace_catalog(catalog.clone());
    state.markers_mut().set_catalog(catalog);
}

/// Park-Daten nicht verfügbar: mit leerem Katalog weiterarbeiten und warnen.
pub fn use_empty_catalog(state: &AppState, message: String) {
    log::warn!("Park-Daten nicht verfügbar: {}", message);
    state.bus().publish(AppEvent::warning(format!(
        "Park-Daten nicht verfügbar: {message}"
    )));
    let catalog = Arc::new(ParkCatalog::empty());
    state.replace_catalog(catalog.clone());
    state.markers_mut().set_catalog(catalog);
}
