//! Zentrale Konfiguration für Visited Parks.
//!
//! `AppOptions` enthält alle zur Laufzeit änderbaren Werte.
//! Die `const`-Werte bleiben als Fallback/Default erhalten.

use super::MarkerStyle;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Marker ──────────────────────────────────────────────────────────

/// Farbe besuchter Parks (RGBA: Blau).
pub const MARKER_COLOR_VISITED: [f32; 4] = [0.0, 0.0, 1.0, 1.0];
/// Farbe nicht besuchter Parks (RGBA: Grün).
pub const MARKER_COLOR_UNVISITED: [f32; 4] = [0.0, 0.5, 0.0, 1.0];
/// Marker-Durchmesser in Pixeln.
pub const MARKER_SIZE_PX: f32 = 10.0;
/// Vergrößerung des Markers mit geöffnetem Popup.
pub const MARKER_POPUP_SCALE: f32 = 1.5;

// ── Fortschritt ─────────────────────────────────────────────────────

/// Feste Gesamtzahl der Nationalparks dieses Deployments.
pub const TOTAL_PARKS: usize = 63;

// ── Laufzeit-Optionen (serialisierbar) ─────────────────────────────

/// Alle zur Laufzeit änderbaren Optionen.
/// Wird als `visited_parks.toml` neben der Binary gespeichert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppOptions {
    /// Vergrößerungsfaktor bei geöffnetem Popup
    #[serde(default = "default_popup_scale")]
    pub popup_scale: f32,
    /// Gesamtzahl für die Fortschrittsanzeige
    pub total_parks: usize,
    /// JSON-Datei mit den Park-Daten des Proxys
    pub catalog_path: PathBuf,
    /// Datei des lokalen Profilspeichers (anonyme Sitzung)
    pub local_store_path: PathBuf,
    // Tabellen zuletzt (TOML: Werte vor Tabellen)
    /// Stil besuchter Parks
    pub visited_marker: MarkerStyle,
    /// Stil nicht besuchter Parks
    pub unvisited_marker: MarkerStyle,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            popup_scale: MARKER_POPUP_SCALE,
            total_parks: TOTAL_PARKS,
            catalog_path: PathBuf::from("parks.json"),
            local_store_path: PathBuf::from("visited_parks_local.json"),
            visited_marker: MarkerStyle::Simple {
                color: MARKER_COLOR_VISITED,
                size: MARKER_SIZE_PX,
            },
            unvisited_marker: MarkerStyle::Simple {
                color: MARKER_COLOR_UNVISITED,
                size: MARKER_SIZE_PX,
            },
        }
    }
}

/// Serde-Default für `popup_scale` (Abwärtskompatibilität bestehender TOML-Dateien).
fn default_popup_scale() -> f32 {
    MARKER_POPUP_SCALE
}

impl AppOptions {
    /// Lädt Optionen aus einer TOML-Datei. Bei Fehler: Standardwerte.
    pub fn load_from_file(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(opts) => {
                    log::info!("Optionen geladen aus: {}", path.display());
                    opts
                }
                Err(e) => {
                    log::warn!("Optionen-Datei fehlerhaft, verwende Standardwerte: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Keine Optionen-Datei gefunden, verwende Standardwerte");
                Self::default()
            }
        }
    }

    /// Speichert Optionen als TOML-Datei.
    pub fn save_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        log::info!("Optionen gespeichert nach: {}", path.display());
        Ok(())
    }

    /// Ermittelt den Pfad zur Optionen-Datei neben der Binary.
    pub fn config_path() -> PathBuf {
        std::env::current_exe()
            .unwrap_or_else(|_| PathBuf::from("visited_parks"))
            .parent()
            .unwrap_or_else(|| std::path::Path::new("."))
            .join("visited_parks.toml")
    }

    /// Stil eines Markers je nach Besucht-Status.
    pub fn marker_style(&self, visited: bool) -> &MarkerStyle {
        if visited {
            &self.visited_marker
        } else {
            &self.unvisited_marker
        }
    }
}
