//! Persistenz des Besucht-Status.
//!
//! `PersistenceAdapter` ist die austauschbare Fähigkeit hinter dem Besucht-Cache:
//! - [`LocalAdapter`]: lokaler Key/Value-Speicher (anonyme Sitzung)
//! - [`RemoteAdapter`]: Dokumentsammlung pro Nutzer (angemeldete Sitzung)
//!
//! Beide Varianten sind idempotent: `add` auf einen vorhandenen und `remove` auf
//! einen fehlenden Code sind erfolgreiche No-Ops.

pub mod document_store;
pub mod journal_store;
pub mod kv_store;
pub mod local;
pub mod remote;

use crate::core::ParkCode;
use async_trait::async_trait;
use std::collections::BTreeSet;

pub use document_store::{DocumentPath, DocumentStore, MemoryDocumentStore, TransportError};
pub use journal_store::{JournalError, JournalStore};
pub use kv_store::{JsonFileStore, KeyValueStore, MemoryKeyValueStore};
pub use local::LocalAdapter;
pub use remote::RemoteAdapter;

/// Menge besuchter Park-Codes.
pub type VisitedCodes = BTreeSet<ParkCode>;

/// Fehler beim Laden oder Schreiben des Besucht-Status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PersistenceError {
    /// Lokaler Speicher nicht les- oder schreibbar
    #[error("Lokaler Speicher fehlgeschlagen: {0}")]
    Storage(String),
    /// Lokaler Speicher voll
    #[error("Lokaler Speicher voll (Quota erschöpft)")]
    QuotaExceeded,
    /// Übertragungsfehler des Remote-Speichers
    #[error("Remote-Speicher fehlgeschlagen: {0}")]
    Transport(#[from] TransportError),
    /// Remote-Adapter ohne angemeldeten Nutzer
    #[error("Remote-Speicher benötigt eine angemeldete Nutzer-ID")]
    MissingUser,
    /// Gespeicherte Daten unlesbar
    #[error("Gespeicherte Daten unlesbar: {0}")]
    Corrupt(String),
}

/// Welche Speichervariante ein Adapter bedient (für Logs und Diagnose).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    /// Lokaler Key/Value-Speicher
    Local,
    /// Dokumentsammlung pro Nutzer
    Remote,
}

/// Lade-/Schreibvertrag für besuchte Park-Codes.
///
/// Alle Aufrufe laufen auf einem logischen Thread (kooperatives Scheduling),
/// daher `?Send`.
#[async_trait(?Send)]
pub trait PersistenceAdapter {
    /// Variante des Adapters.
    fn kind(&self) -> AdapterKind;

    /// Lädt alle besuchten Codes. "Noch keine Daten" ergibt eine leere Menge.
    async fn load(&self) -> Result<VisitedCodes, PersistenceError>;

    /// Markiert einen Code als besucht (idempotent).
    async fn add(&self, code: &ParkCode) -> Result<(), PersistenceError>;

    /// Entfernt die Besucht-Markierung (idempotent).
    async fn remove(&self, code: &ParkCode) -> Result<(), PersistenceError>;
}
