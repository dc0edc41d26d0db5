//! Dokument-Store-Grenze für nutzerbezogene Sammlungen.
//!
//! Pfade folgen dem Muster `users/{uid}/visitedParks/{parkCode}`. Die konkrete
//! Anbindung (Cloud-Dokumentdatenbank) ist eine externe Komponente; hier liegen
//! der Vertrag und ein In-Memory-Store für Entwicklung und Tests.

use async_trait::async_trait;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;

/// Übertragungsfehler des Dokument-Stores.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    /// Fehlermeldung der Gegenstelle
    pub message: String,
}

impl TransportError {
    /// Erstellt einen Übertragungsfehler.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Slash-getrennter Pfad auf eine Sammlung oder ein Dokument.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DocumentPath {
    segments: Vec<String>,
}

impl DocumentPath {
    /// Erstellt einen Pfad aus Segmenten.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Hängt ein Segment an (Sammlung → Dokument).
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Letztes Segment (Dokument-ID).
    pub fn id(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    fn is_direct_child_of(&self, collection: &DocumentPath) -> bool {
        self.segments.len() == collection.segments.len() + 1
            && self.segments.starts_with(&collection.segments)
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// Asynchroner Dokument-Store.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Listet alle Dokumente einer Sammlung als `(id, body)`.
    async fn list(&self, collection: &DocumentPath) -> Result<Vec<(String, Value)>, TransportError>;

    /// Legt ein Dokument an oder überschreibt es.
    async fn set(&self, document: &DocumentPath, body: Value) -> Result<(), TransportError>;

    /// Löscht ein Dokument; fehlende Dokumente sind kein Fehler.
    async fn delete(&self, document: &DocumentPath) -> Result<(), TransportError>;
}

/// In-Memory-Dokument-Store mit Fehlerinjektion per Pfad-Präfix.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RefCell<BTreeMap<DocumentPath, Value>>,
    fail_prefixes: RefCell<Vec<String>>,
}

impl MemoryDocumentStore {
    /// Erstellt einen leeren Store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lässt alle Operationen auf Pfaden mit diesem Präfix fehlschlagen.
    pub fn inject_failure(&self, prefix: impl Into<String>) {
        self.fail_prefixes.borrow_mut().push(prefix.into());
    }

    /// Entfernt alle injizierten Fehler.
    pub fn clear_failures(&self) {
        self.fail_prefixes.borrow_mut().clear();
    }

    /// Liest ein Dokument direkt (ohne Fehlerinjektion).
    pub fn document(&self, path: &DocumentPath) -> Option<Value> {
        self.documents.borrow().get(path).cloned()
    }

    /// Anzahl aller gespeicherten Dokumente.
    pub fn len(&self) -> usize {
        self.documents.borrow().len()
    }

    /// Gibt `true` zurück, wenn keine Dokumente gespeichert sind.
    pub fn is_empty(&self) -> bool {
        self.documents.borrow().is_empty()
    }

    fn check(&self, path: &DocumentPath) -> Result<(), TransportError> {
        let rendered = path.to_string();
        if self
            .fail_prefixes
            .borrow()
            .iter()
            .any(|prefix| rendered.starts_with(prefix.as_str()))
        {
            return Err(TransportError::new(format!("unavailable: {rendered}")));
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &DocumentPath) -> Result<Vec<(String, Value)>, TransportError> {
        self.check(collection)?;
        Ok(self
            .documents
            .borrow()
            .iter()
            .filter(|(path, _)| path.is_direct_child_of(collection))
            .filter_map(|(path, body)| Some((path.id()?.to_string(), body.clone())))
            .collect())
    }

    async fn set(&self, document: &DocumentPath, body: Value) -> Result<(), TransportError> {
        self.check(document)?;
        self.documents.borrow_mut().insert(document.clone(), body);
        Ok(())
    }

    async fn delete(&self, document: &DocumentPath) -> Result<(), TransportError> {
        self.check(document)?;
        self.documents.borrow_mut().remove(document);
        Ok(())
    }
}
