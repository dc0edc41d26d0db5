//! Gemeinsame Test-Doubles und Aufbau-Helfer für die Integrationstests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::Notify;
use visited_parks::app::{AppEvent, Notice, VisitedChange};
use visited_parks::core::GeoPoint;
use visited_parks::persistence::{AdapterKind, TransportError, VisitedCodes};
use visited_parks::{
    AppOptions, AppState, MemoryDocumentStore, MemoryKeyValueStore, ParkCatalog, ParkCode,
    ParkRecord, PersistenceAdapter, PersistenceError,
};

/// Adapter mit steuerbarer Latenz (Notify-Gates) und Fehlerinjektion.
#[derive(Default)]
pub struct ScriptedAdapter {
    codes: RefCell<VisitedCodes>,
    load_gate: RefCell<Option<Rc<Notify>>>,
    write_gates: RefCell<VecDeque<Option<Rc<Notify>>>>,
    fail_writes: Cell<bool>,
    fail_load: Cell<bool>,
    writes: RefCell<Vec<(ParkCode, bool)>>,
    loads: Cell<usize>,
}

impl ScriptedAdapter {
    pub fn with_codes(codes: &[&str]) -> Rc<Self> {
        let adapter = Self::default();
        *adapter.codes.borrow_mut() = codes.iter().map(|c| ParkCode::from(*c)).collect();
        Rc::new(adapter)
    }

    /// Der nächste `load` wartet, bis das Gate geöffnet wird.
    pub fn gate_load(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        *self.load_gate.borrow_mut() = Some(gate.clone());
        gate
    }

    /// Der nächste noch nicht verplante Schreibzugriff wartet auf das Gate.
    pub fn gate_next_write(&self) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.write_gates.borrow_mut().push_back(Some(gate.clone()));
        gate
    }

    /// Der nächste noch nicht verplante Schreibzugriff läuft sofort durch.
    pub fn pass_next_write(&self) {
        self.write_gates.borrow_mut().push_back(None);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    pub fn fail_load(&self, fail: bool) {
        self.fail_load.set(fail);
    }

    pub fn stored(&self) -> VisitedCodes {
        self.codes.borrow().clone()
    }

    pub fn writes(&self) -> Vec<(ParkCode, bool)> {
        self.writes.borrow().clone()
    }

    pub fn load_count(&self) -> usize {
        self.loads.get()
    }

    async fn write(&self, code: &ParkCode, visited: bool) -> Result<(), PersistenceError> {
        let gate = self.write_gates.borrow_mut().pop_front().flatten();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        if self.fail_writes.get() {
            return Err(TransportError::new("permission denied").into());
        }
        let mut codes = self.codes.borrow_mut();
        if visited {
            codes.insert(code.clone());
        } else {
            codes.remove(code);
        }
        self.writes.borrow_mut().push((code.clone(), visited));
        Ok(())
    }
}

#[async_trait(?Send)]
impl PersistenceAdapter for ScriptedAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Remote
    }

    async fn load(&self) -> Result<VisitedCodes, PersistenceError> {
        let gate = self.load_gate.borrow_mut().take();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        self.loads.set(self.loads.get() + 1);
        if self.fail_load.get() {
            return Err(TransportError::new("unavailable").into());
        }
        Ok(self.codes.borrow().clone())
    }

    async fn add(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        self.write(code, true).await
    }

    async fn remove(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        self.write(code, false).await
    }
}

/// State mit In-Memory-Speichern; gibt die Speicher für Vorbelegung zurück.
pub fn memory_state() -> (AppState, Rc<MemoryKeyValueStore>, Rc<MemoryDocumentStore>) {
    let local = Rc::new(MemoryKeyValueStore::new());
    let documents = Rc::new(MemoryDocumentStore::new());
    let state = AppState::new(AppOptions::default(), local.clone(), documents.clone());
    (state, local, documents)
}

pub fn park(code: &str, name: &str) -> ParkRecord {
    ParkRecord {
        park_code: ParkCode::from(code),
        full_name: name.to_string(),
        position: GeoPoint::new(40.0, -110.0).expect("gültige Koordinaten"),
        description: format!("{name} National Park"),
        images: Vec::new(),
    }
}

pub fn small_catalog() -> Arc<ParkCatalog> {
    Arc::new(ParkCatalog::from_records([
        park("ARCH", "Arches"),
        park("YELL", "Yellowstone"),
        park("ZION", "Zion"),
    ]))
}

pub fn codes(codes: &[&str]) -> VisitedCodes {
    codes.iter().map(|c| ParkCode::from(*c)).collect()
}

/// Alle `Toggled`-Events eines Codes in Emissionsreihenfolge.
pub fn toggled_events(state: &AppState, code: &str) -> Vec<bool> {
    state
        .bus()
        .history()
        .entries()
        .iter()
        .filter_map(|event| match event {
            AppEvent::VisitedChanged(VisitedChange::Toggled {
                code: c, visited, ..
            }) if c.as_str() == code => Some(*visited),
            _ => None,
        })
        .collect()
}

/// Alle `Reloaded`-Mengen in Emissionsreihenfolge.
pub fn reloaded_sets(state: &AppState) -> Vec<VisitedCodes> {
    state
        .bus()
        .history()
        .entries()
        .iter()
        .filter_map(|event| match event {
            AppEvent::VisitedChanged(VisitedChange::Reloaded { visited }) => {
                Some(visited.as_ref().clone())
            }
            _ => None,
        })
        .collect()
}

pub fn toggle_failures(state: &AppState) -> usize {
    state
        .bus()
        .history()
        .entries()
        .iter()
        .filter(|event| matches!(event, AppEvent::Notice(Notice::ToggleFailed { .. })))
        .count()
}
