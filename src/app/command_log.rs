//! Begrenzte Logs der ausgeführten Commands und veröffentlichten Events.

use super::{AppCommand, AppEvent};

/// Speichert Einträge in Reihenfolge, begrenzt auf `MAX_ENTRIES`.
#[derive(Debug)]
pub struct BoundedLog<T> {
    entries: Vec<T>,
}

/// Log aller ausgeführten Commands.
pub type CommandLog = BoundedLog<AppCommand>;

/// Log aller über den Event-Bus zugestellten Events.
pub type EventLog = BoundedLog<AppEvent>;

impl<T> BoundedLog<T> {
    const MAX_ENTRIES: usize = 1000;
}

impl<T> Default for BoundedLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BoundedLog<T> {
    /// Erstellt ein leeres Log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Fügt einen Eintrag hinzu.
    /// Begrenzt auf MAX_ENTRIES, ältere Einträge werden verworfen.
    pub fn record(&mut self, entry: T) {
        if self.entries.len() >= Self::MAX_ENTRIES {
            self.entries.drain(..Self::MAX_ENTRIES / 2);
        }
        self.entries.push(entry);
    }

    /// Gibt die Anzahl der Einträge zurück.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Gibt `true` zurück, wenn keine Einträge vorhanden sind.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Liefert eine read-only Sicht auf alle Einträge.
    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Verwirft alle Einträge.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
