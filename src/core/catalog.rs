//! Read-only Park-Katalog und Parser für die Park-Daten des Proxy-Dienstes.
//!
//! Der Proxy liefert ein JSON-Array von Park-Objekten (oder, direkt von der
//! Upstream-API, ein Objekt `{ "data": [...] }`). Einzelne fehlerhafte Datensätze
//! werden übersprungen; nur ein komplett unlesbares Dokument ist ein Fehler.

use super::park::{GeoPoint, ParkCode, ParkImage, ParkRecord};
use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Fehler beim Laden des Park-Katalogs.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Datei/Quelle nicht lesbar
    #[error("Park-Daten nicht lesbar ({path}): {source}")]
    Io {
        /// Pfad der Quelle
        path: PathBuf,
        /// Ursprünglicher IO-Fehler
        #[source]
        source: std::io::Error,
    },
    /// Kein gültiges JSON
    #[error("Park-Daten sind kein gültiges JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// JSON gültig, aber weder Array noch `{ "data": [...] }`
    #[error("Unerwartetes Format der Park-Daten: {0}")]
    UnexpectedShape(&'static str),
}

/// Rohdatensatz wie vom Proxy geliefert (alle Felder optional, Validierung erfolgt danach).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParkRecord {
    park_code: Option<String>,
    full_name: Option<String>,
    lat_long: Option<String>,
    latitude: Option<String>,
    longitude: Option<String>,
    description: Option<String>,
    #[serde(default)]
    images: Vec<ParkImage>,
}

fn lat_long_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(r"^\s*lat:\s*([-+]?[0-9]*\.?[0-9]+)\s*,\s*long:\s*([-+]?[0-9]*\.?[0-9]+)\s*$")
                .map_err(|e| log::error!("latLong-Regex ungültig: {}", e))
                .ok()
        })
        .as_ref()
}

/// Parst einen `latLong`-String im Format `"lat:<float>, long:<float>"`.
pub fn parse_lat_long(value: &str) -> Option<GeoPoint> {
    let caps = lat_long_pattern()?.captures(value)?;
    let latitude = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let longitude = caps.get(2)?.as_str().parse::<f64>().ok()?;
    GeoPoint::new(latitude, longitude)
}

impl RawParkRecord {
    fn position(&self) -> Option<GeoPoint> {
        match self.lat_long.as_deref() {
            Some(lat_long) if !lat_long.trim().is_empty() => parse_lat_long(lat_long),
            // Ohne latLong: getrennte Felder der Upstream-API
            _ => {
                let latitude = self.latitude.as_deref()?.trim().parse::<f64>().ok()?;
                let longitude = self.longitude.as_deref()?.trim().parse::<f64>().ok()?;
                GeoPoint::new(latitude, longitude)
            }
        }
    }

    fn into_record(self) -> Result<ParkRecord, &'static str> {
        let position = self.position().ok_or("Koordinaten fehlen oder sind fehlerhaft")?;
        let park_code = self.park_code.and_then(ParkCode::new).ok_or("parkCode fehlt")?;
        Ok(ParkRecord {
            park_code,
            full_name: self.full_name.unwrap_or_default(),
            position,
            description: self.description.unwrap_or_default(),
            images: self.images,
        })
    }
}

/// Unveränderliche, geordnete Liste aller Park-Datensätze.
#[derive(Debug, Clone, Default)]
pub struct ParkCatalog {
    records: IndexMap<ParkCode, ParkRecord>,
}

impl ParkCatalog {
    /// Leerer Katalog (Fallback, wenn die Park-Daten nicht verfügbar sind).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Baut einen Katalog aus bereits validierten Datensätzen.
    /// Doppelte Park-Codes: der erste Datensatz gewinnt.
    pub fn from_records(records: impl IntoIterator<Item = ParkRecord>) -> Self {
        let mut map = IndexMap::new();
        for record in records {
            if map.contains_key(&record.park_code) {
                log::warn!("Doppelter Park-Code {} übersprungen", record.park_code);
                continue;
            }
            map.insert(record.park_code.clone(), record);
        }
        Self { records: map }
    }

    /// Parst die JSON-Antwort des Proxys.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let entries = match value {
            serde_json::Value::Array(entries) => entries,
            serde_json::Value::Object(mut envelope) => match envelope.remove("data") {
                Some(serde_json::Value::Array(entries)) => entries,
                _ => return Err(CatalogError::UnexpectedShape("Objekt ohne data-Array")),
            },
            _ => return Err(CatalogError::UnexpectedShape("weder Array noch Objekt")),
        };

        let total = entries.len();
        let mut records = Vec::with_capacity(total);
        for (index, entry) in entries.into_iter().enumerate() {
            let raw = match serde_json::from_value::<RawParkRecord>(entry) {
                Ok(raw) => raw,
                Err(e) => {
                    log::warn!("Park-Datensatz #{} unlesbar, übersprungen: {}", index, e);
                    continue;
                }
            };
            let code = raw.park_code.clone().unwrap_or_default();
            match raw.into_record() {
                Ok(record) => records.push(record),
                Err(reason) => {
                    log::warn!("Park-Datensatz #{} ({}) übersprungen: {}", index, code, reason)
                }
            }
        }

        let catalog = Self::from_records(records);
        log::info!("{} von {} Parks geladen", catalog.len(), total);
        Ok(catalog)
    }

    /// Lädt den Katalog aus einer JSON-Datei.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    /// Anzahl der Parks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Gibt `true` zurück, wenn keine Parks geladen sind.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sucht einen Park per Code.
    pub fn get(&self, code: &str) -> Option<&ParkRecord> {
        self.records.get(code)
    }

    /// Prüft, ob ein Park-Code im Katalog existiert.
    pub fn contains(&self, code: &str) -> bool {
        self.records.contains_key(code)
    }

    /// Iteriert in Katalog-Reihenfolge.
    pub fn iter(&self) -> impl Iterator<Item = &ParkRecord> {
        self.records.values()
    }

    /// Parks alphabetisch nach vollem Namen (Park-Auswahl im Journal).
    pub fn sorted_by_name(&self) -> Vec<&ParkRecord> {
        let mut parks: Vec<&ParkRecord> = self.records.values().collect();
        parks.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        parks
    }
}
