//! Handler für Karten-Marker und Popups.

use crate::app::AppState;
use crate::core::ParkCode;

/// Fordert den Marker-Aufbau an (verzögert bis Katalog und erster Reload vorliegen).
pub fn request_build(state: &AppState) {
    state.markers_mut().request_build();
}

/// Baut alle Marker ab.
pub fn tear_down(state: &AppState) {
    state.markers_mut().tear_down();
}

/// Öffnet das Popup eines Markers.
pub fn open_popup(state: &AppState, code: &ParkCode) {
    if state.markers_mut().open_popup(code).is_none() {
        log::warn!("Popup für {} nicht verfügbar", code);
    }
}

/// Schließt das offene Popup.
pub fn close_popup(state: &AppState) {
    state.markers_mut().close_popup();
}

/// Registriert den Klick-Handler des Popups (höchstens einmal pro Park).
pub fn attach_toggle_handler(state: &AppState, code: &ParkCode) {
    state.markers_mut().attach_toggle_handler(code);
}
