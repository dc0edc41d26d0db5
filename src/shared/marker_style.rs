//! Darstellung eines Park-Markers als getaggte Variante.

use serde::{Deserialize, Serialize};

/// Visueller Stil eines Markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum MarkerStyle {
    /// Einfarbiger Kreis
    #[serde(rename = "simple-marker")]
    Simple {
        /// Füllfarbe (RGBA)
        color: [f32; 4],
        /// Durchmesser in Pixeln
        size: f32,
    },
    /// Bild-Symbol
    #[serde(rename = "picture-marker")]
    Picture {
        /// Bild-URL
        url: String,
        /// Breite in Pixeln
        width: f32,
        /// Höhe in Pixeln
        height: f32,
    },
}

impl MarkerStyle {
    /// Skaliert die Ausdehnung des Markers (Farbe/URL bleiben erhalten).
    pub fn scaled(&self, factor: f32) -> Self {
        match self {
            MarkerStyle::Simple { color, size } => MarkerStyle::Simple {
                color: *color,
                size: size * factor,
            },
            MarkerStyle::Picture { url, width, height } => MarkerStyle::Picture {
                url: url.clone(),
                width: width * factor,
                height: height * factor,
            },
        }
    }

    /// Breite und Höhe der Darstellung in Pixeln.
    pub fn extent(&self) -> [f32; 2] {
        match self {
            MarkerStyle::Simple { size, .. } => [*size, *size],
            MarkerStyle::Picture { width, height, .. } => [*width, *height],
        }
    }
}
