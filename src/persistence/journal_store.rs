//! Journal-Einträge unter `users/{uid}/journalEntries/{id}`.

use super::{DocumentPath, DocumentStore, TransportError};
use crate::core::{JournalEntry, ParkCode, Session, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Name der Journal-Sammlung unterhalb des Nutzer-Dokuments.
pub const JOURNAL_COLLECTION: &str = "journalEntries";

/// Fehler der Journal-Operationen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    /// Journal ist nur für angemeldete Nutzer verfügbar
    #[error("Bitte anmelden, um Journal-Einträge zu verwenden")]
    SignedOut,
    /// Eintrag unvollständig
    #[error("Journal-Eintrag ungültig: {0}")]
    InvalidEntry(&'static str),
    /// Übertragungsfehler
    #[error("Journal-Speicher fehlgeschlagen: {0}")]
    Transport(#[from] TransportError),
}

/// Gespeicherte Form eines Eintrags.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalDocument {
    park_code: String,
    park_name: String,
    description: String,
    created_at: DateTime<Utc>,
}

/// Journal des aktuell angemeldeten Nutzers.
pub struct JournalStore {
    store: Rc<dyn DocumentStore>,
    user_id: Option<UserId>,
}

impl JournalStore {
    /// Erstellt das Journal für die gegebene Sitzung (anonym = gesperrt).
    pub fn for_session(store: Rc<dyn DocumentStore>, session: &Session) -> Self {
        Self {
            store,
            user_id: session.user_id().cloned(),
        }
    }

    /// Gibt `true` zurück, wenn ein Nutzer angemeldet ist.
    pub fn is_available(&self) -> bool {
        self.user_id.is_some()
    }

    fn collection(&self) -> Result<DocumentPath, JournalError> {
        let user_id = self.user_id.as_ref().ok_or(JournalError::SignedOut)?;
        Ok(DocumentPath::new([
            "users",
            user_id.as_str(),
            JOURNAL_COLLECTION,
        ]))
    }

    /// Speichert einen neuen Eintrag und gibt ihn zurück.
    pub async fn save_entry(
        &self,
        park_code: &ParkCode,
        park_name: &str,
        title: &str,
        text: &str,
    ) -> Result<JournalEntry, JournalError> {
        let collection = self.collection()?;
        if title.trim().is_empty() {
            return Err(JournalError::InvalidEntry("Titel fehlt"));
        }

        let entry = JournalEntry {
            id: uuid::Uuid::new_v4().to_string(),
            park_code: park_code.clone(),
            park_name: park_name.to_string(),
            description: JournalEntry::compose_description(title, text),
            created_at: Utc::now(),
        };
        let document = JournalDocument {
            park_code: entry.park_code.to_string(),
            park_name: entry.park_name.clone(),
            description: entry.description.clone(),
            created_at: entry.created_at,
        };
        let body = serde_json::to_value(&document)
            .map_err(|_| JournalError::InvalidEntry("nicht serialisierbar"))?;

        self.store.set(&collection.child(entry.id.as_str()), body).await?;
        log::info!("Journal-Eintrag {} für {} gespeichert", entry.id, park_code);
        Ok(entry)
    }

    /// Alle Einträge, neueste zuerst. Unlesbare Dokumente werden übersprungen.
    pub async fn list_entries(&self) -> Result<Vec<JournalEntry>, JournalError> {
        let collection = self.collection()?;
        let documents = self.store.list(&collection).await?;

        let mut entries: Vec<JournalEntry> = documents
            .into_iter()
            .filter_map(|(id, body)| {
                let doc = match serde_json::from_value::<JournalDocument>(body) {
                    Ok(doc) => doc,
                    Err(e) => {
                        log::warn!("Journal-Eintrag {} unlesbar: {}", id, e);
                        return None;
                    }
                };
                Some(JournalEntry {
                    park_code: ParkCode::new(doc.park_code)?,
                    id,
                    park_name: doc.park_name,
                    description: doc.description,
                    created_at: doc.created_at,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Löscht einen Eintrag.
    pub async fn delete_entry(&self, id: &str) -> Result<(), JournalError> {
        let collection = self.collection()?;
        self.store.delete(&collection.child(id)).await?;
        log::info!("Journal-Eintrag {} gelöscht", id);
        Ok(())
    }
}
