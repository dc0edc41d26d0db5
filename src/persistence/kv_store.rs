//! Lokaler Key/Value-Speicher (Gegenstück zum Browser-Profilspeicher).

use super::PersistenceError;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Synchroner String-Key/Value-Speicher eines Profils.
pub trait KeyValueStore {
    /// Liest einen Wert.
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    /// Schreibt einen Wert (überschreibt vorhandene).
    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
    /// Entfernt einen Wert; fehlende Keys sind kein Fehler.
    fn remove(&self, key: &str) -> Result<(), PersistenceError>;
    /// Alle Keys mit dem angegebenen Präfix, sortiert.
    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PersistenceError>;
}

fn used_bytes(entries: &BTreeMap<String, String>) -> usize {
    entries.iter().map(|(k, v)| k.len() + v.len()).sum()
}

/// Flüchtiger Speicher mit optionaler Quota (Bytes über Keys + Werte).
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryKeyValueStore {
    /// Erstellt einen leeren Speicher ohne Quota.
    pub fn new() -> Self {
        Self::default()
    }

    /// Erstellt einen leeren Speicher mit Quota.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Anzahl gespeicherter Keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Gibt `true` zurück, wenn nichts gespeichert ist.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.borrow_mut();
        if let Some(quota) = self.quota_bytes {
            let existing = entries.get(key).map_or(0, |v| key.len() + v.len());
            if used_bytes(&entries) - existing + key.len() + value.len() > quota {
                return Err(PersistenceError::QuotaExceeded);
            }
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PersistenceError> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Dauerhafter Speicher als JSON-Datei (ein Objekt `{ key: value }`).
///
/// Der Inhalt wird beim Öffnen vollständig gelesen und nach jeder Änderung
/// komplett über eine temporäre Datei zurückgeschrieben.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Öffnet (oder erstellt beim ersten Schreiben) die Speicherdatei.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)
                .map_err(|e| PersistenceError::Corrupt(format!("{}: {}", path.display(), e)))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Lokaler Speicher {} noch nicht vorhanden", path.display());
                BTreeMap::new()
            }
            Err(e) => {
                return Err(PersistenceError::Storage(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        };
        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    /// Pfad der Speicherdatei.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn storage_error(&self, e: impl std::fmt::Display) -> PersistenceError {
        PersistenceError::Storage(format!("{}: {}", self.path.display(), e))
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), PersistenceError> {
        let content = serde_json::to_string_pretty(entries).map_err(|e| self.storage_error(e))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.storage_error(e))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, content).map_err(|e| self.storage_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.storage_error(e))
    }

    /// Wendet eine Änderung an und schreibt sie zurück; bei Schreibfehler bleibt der Speicher unverändert.
    fn mutate(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), PersistenceError> {
        let mut next = self.entries.borrow().clone();
        apply(&mut next);
        self.flush(&next)?;
        *self.entries.borrow_mut() = next;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.entries.borrow().get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        if !self.entries.borrow().contains_key(key) {
            return Ok(());
        }
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, PersistenceError> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}
