//! Park-Datensätze aus dem Park-Katalog.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Eindeutiger Park-Schlüssel (z.B. `"YELL"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParkCode(String);

impl ParkCode {
    /// Erstellt einen Park-Code. Gibt `None` bei leerem oder nur aus Whitespace bestehendem Code zurück.
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let code = code.into();
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.len() == code.len() {
            Some(Self(code))
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Liefert den Code als String-Slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParkCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ParkCode {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParkCode {
    /// Konvertierung für Literale in Tests und Aufrufern mit bekannten Codes.
    /// Leere Codes sind hier erlaubt; Eingaben von außen laufen über [`ParkCode::new`].
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

/// Geografische Position eines Parks (WGS84, Grad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Breitengrad
    pub latitude: f64,
    /// Längengrad
    pub longitude: f64,
}

impl GeoPoint {
    /// Erstellt eine Position, sofern beide Werte endlich und im gültigen Bereich sind.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }
}

/// Bild eines Parks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParkImage {
    /// Bild-URL
    pub url: String,
    /// Titel
    pub title: String,
    /// Alternativtext
    pub alt_text: String,
    /// Bildunterschrift
    pub caption: String,
    /// Urheber
    pub credit: String,
}

/// Unveränderlicher Datensatz eines Parks.
#[derive(Debug, Clone, PartialEq)]
pub struct ParkRecord {
    /// Eindeutiger Park-Code
    pub park_code: ParkCode,
    /// Voller Name (z.B. "Yellowstone National Park")
    pub full_name: String,
    /// Position auf der Karte
    pub position: GeoPoint,
    /// Beschreibungstext
    pub description: String,
    /// Bilder in Katalog-Reihenfolge
    pub images: Vec<ParkImage>,
}

impl ParkRecord {
    /// Breitengrad des Parks.
    pub fn latitude(&self) -> f64 {
        self.position.latitude
    }

    /// Längengrad des Parks.
    pub fn longitude(&self) -> f64 {
        self.position.longitude
    }

    /// Erstes Bild (Vorschaubild im Popup), falls vorhanden.
    pub fn preview_image(&self) -> Option<&ParkImage> {
        self.images.first()
    }
}
