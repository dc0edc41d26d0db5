//! Journal-Einträge zu besuchten Parks (nur für angemeldete Nutzer).

use super::park::ParkCode;
use chrono::{DateTime, Local, Utc};

/// Trenner zwischen Titel und Text in der gespeicherten Beschreibung.
pub const DESCRIPTION_SEPARATOR: &str = "\n\n";

/// Ein gespeicherter Journal-Eintrag.
#[derive(Debug, Clone, PartialEq)]
pub struct JournalEntry {
    /// Dokument-ID
    pub id: String,
    /// Park des Eintrags
    pub park_code: ParkCode,
    /// Anzeigename des Parks zum Zeitpunkt des Schreibens
    pub park_name: String,
    /// Beschreibung im Format `Titel\n\nText`
    pub description: String,
    /// Erstellungszeitpunkt
    pub created_at: DateTime<Utc>,
}

/// Formatiertes Datum eines Eintrags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedEntryDate {
    /// z.B. "March 4, 2025"
    pub date: String,
    /// z.B. "02:30 PM"
    pub time: String,
}

impl JournalEntry {
    /// Baut die gespeicherte Beschreibung aus Titel und Text.
    pub fn compose_description(title: &str, text: &str) -> String {
        format!("{title}{DESCRIPTION_SEPARATOR}{text}")
    }

    /// Titel: erster Abschnitt der Beschreibung.
    pub fn title(&self) -> &str {
        self.description
            .split(DESCRIPTION_SEPARATOR)
            .next()
            .unwrap_or_default()
    }

    /// Text: alle weiteren Abschnitte; ohne Trenner der gesamte Inhalt.
    pub fn text(&self) -> &str {
        match self.description.split_once(DESCRIPTION_SEPARATOR) {
            Some((_, rest)) if !rest.is_empty() => rest,
            _ => self.title(),
        }
    }
}

/// Formatiert einen Zeitstempel in lokaler Zeit für die Eintragsliste.
pub fn format_entry_date(created_at: DateTime<Utc>) -> FormattedEntryDate {
    let local = created_at.with_timezone(&Local);
    FormattedEntryDate {
        date: local.format("%B %-d, %Y").to_string(),
        time: local.format("%I:%M %p").to_string(),
    }
}
