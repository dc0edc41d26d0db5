//! Besucht-Cache: einzige In-Memory-Quelle des Besucht-Status.
//!
//! Der Cache gehört exklusiv zur aktiven Sitzung und ist immer an genau einen
//! `PersistenceAdapter` gebunden. Mutationen laufen nur über `reload` und `toggle`.
//!
//! Reihenfolge-Regeln:
//! - `reload` ersetzt die Menge komplett (kein Merge) und ist serialisiert. Jeder
//!   Reload und jeder Adapter-Wechsel startet eine neue Generation; Reload-Ergebnisse
//!   älterer Generationen werden verworfen.
//! - `reload` lädt erst, wenn keine Toggle-Persistierung mehr läuft. Bestätigte
//!   Schreibvorgänge sind damit immer im geladenen Stand enthalten.
//! - `toggle` setzt den Wert sofort (optimistisch) und persistiert danach. Toggles
//!   desselben Codes laufen nacheinander in Auslösereihenfolge; ein noch wartender
//!   Toggle, der von einem späteren überholt wurde, schreibt nicht mehr (last write wins).
//!   Toggle-Ergebnisse gelten nur für den Adapter, mit dem sie gestartet wurden.

use super::{AppEvent, EventBus, Notice, VisitedChange};
use crate::core::ParkCode;
use crate::persistence::{AdapterKind, PersistenceAdapter, PersistenceError, VisitedCodes};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

/// Ergebnis eines Reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Menge ersetzt
    Applied {
        /// Anzahl geladener Codes
        count: usize,
    },
    /// Von einem neueren Reload/Sitzungswechsel überholt, Ergebnis verworfen
    Superseded,
}

/// Ergebnis eines Toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Vom Adapter bestätigt
    Applied,
    /// Von einem späteren Toggle desselben Codes überholt, nicht geschrieben
    Superseded,
    /// Sitzung hat inzwischen gewechselt, Ergebnis ignoriert
    Stale,
}

/// Serialisierung der Toggles eines Codes.
struct CodeLane {
    lock: Rc<Mutex<()>>,
    latest_seq: u64,
    in_flight: usize,
}

/// Single Source of Truth für besuchte Park-Codes.
pub struct VisitedStateCache {
    bus: Rc<EventBus>,
    adapter: RefCell<Rc<dyn PersistenceAdapter>>,
    visited: RefCell<VisitedCodes>,
    /// Zuletzt vom Adapter bestätigter Stand (Ziel eines Rollbacks)
    persisted: RefCell<VisitedCodes>,
    generation: Cell<u64>,
    /// Zählt Adapter-Wechsel; Toggle-Ergebnisse eines älteren Adapters sind veraltet
    adapter_epoch: Cell<u64>,
    loaded: Cell<bool>,
    reload_lock: Mutex<()>,
    lanes: RefCell<HashMap<ParkCode, CodeLane>>,
    lanes_drained: Notify,
    next_seq: Cell<u64>,
}

impl VisitedStateCache {
    /// Erstellt einen leeren, noch nicht geladenen Cache.
    pub fn new(bus: Rc<EventBus>, adapter: Rc<dyn PersistenceAdapter>) -> Self {
        Self {
            bus,
            adapter: RefCell::new(adapter),
            visited: RefCell::new(VisitedCodes::new()),
            persisted: RefCell::new(VisitedCodes::new()),
            generation: Cell::new(0),
            adapter_epoch: Cell::new(0),
            loaded: Cell::new(false),
            reload_lock: Mutex::new(()),
            lanes: RefCell::new(HashMap::new()),
            lanes_drained: Notify::new(),
            next_seq: Cell::new(0),
        }
    }

    fn bump_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    /// Wechselt den aktiven Adapter (nur bei Sitzungswechsel).
    /// Laufende Operationen des alten Adapters werden damit veraltet.
    pub fn switch_adapter(&self, adapter: Rc<dyn PersistenceAdapter>) {
        log::info!("Aktiver Persistenz-Adapter: {:?}", adapter.kind());
        *self.adapter.borrow_mut() = adapter;
        self.adapter_epoch.set(self.adapter_epoch.get() + 1);
        self.bump_generation();
    }

    /// Variante des aktiven Adapters.
    pub fn adapter_kind(&self) -> AdapterKind {
        self.adapter.borrow().kind()
    }

    /// Lädt die Menge vom aktiven Adapter und ersetzt den In-Memory-Stand vollständig.
    ///
    /// Vor dem Laden wird gewartet, bis alle laufenden Toggles abgeschlossen sind.
    /// Bei Ladefehler bleibt der bisherige Stand erhalten und es wird eine Warnung
    /// veröffentlicht. Der allererste Reload gilt auch bei Fehler als abgeschlossen,
    /// damit die Karte nicht dauerhaft blockiert.
    pub async fn reload(&self) -> Result<ReloadOutcome, PersistenceError> {
        let generation = self.bump_generation();
        let _guard = self.reload_lock.lock().await;
        if self.generation.get() != generation {
            log::debug!("Reload (Generation {}) überholt, übersprungen", generation);
            return Ok(ReloadOutcome::Superseded);
        }

        self.wait_for_toggles().await;
        if self.generation.get() != generation {
            log::debug!("Reload (Generation {}) überholt, übersprungen", generation);
            return Ok(ReloadOutcome::Superseded);
        }

        let adapter = self.adapter.borrow().clone();
        let result = adapter.load().await;

        if self.generation.get() != generation {
            log::debug!("Reload (Generation {}) überholt, Ergebnis verworfen", generation);
            return Ok(ReloadOutcome::Superseded);
        }

        match result {
            Ok(codes) => {
                let count = codes.len();
                *self.visited.borrow_mut() = codes.clone();
                *self.persisted.borrow_mut() = codes.clone();
                self.loaded.set(true);
                log::info!("{} besuchte Parks geladen ({:?})", count, adapter.kind());
                self.bus
                    .publish(AppEvent::VisitedChanged(VisitedChange::Reloaded {
                        visited: Arc::new(codes),
                    }));
                Ok(ReloadOutcome::Applied { count })
            }
            Err(e) => {
                log::warn!("Besucht-Status konnte nicht geladen werden: {}", e);
                self.bus.publish(AppEvent::warning(format!(
                    "Besuchte Parks konnten nicht geladen werden: {e}"
                )));
                if !self.loaded.replace(true) {
                    let current = self.visited.borrow().clone();
                    self.bus
                        .publish(AppEvent::VisitedChanged(VisitedChange::Reloaded {
                            visited: Arc::new(current),
                        }));
                }
                Err(e)
            }
        }
    }

    async fn wait_for_toggles(&self) {
        loop {
            let drained = self.lanes_drained.notified();
            let pending = self.pending_toggles();
            if pending == 0 {
                return;
            }
            log::debug!("Reload wartet auf {} laufende Toggles", pending);
            drained.await;
        }
    }

    /// Setzt den Besucht-Status eines Parks optimistisch und persistiert ihn.
    ///
    /// Schlägt das Schreiben fehl, wird auf den zuletzt bestätigten Stand
    /// zurückgerollt, ein korrigierendes `visited-changed` und ein
    /// `ToggleFailed`-Hinweis veröffentlicht.
    pub async fn toggle(
        &self,
        code: &ParkCode,
        visited: bool,
    ) -> Result<ToggleOutcome, PersistenceError> {
        // Laufender Reload zuerst: Toggles setzen auf dessen Stand auf
        drop(self.reload_lock.lock().await);

        let epoch = self.adapter_epoch.get();
        let adapter = self.adapter.borrow().clone();
        let seq = self.next_seq.get() + 1;
        self.next_seq.set(seq);
        let lock = self.enter_lane(code, seq);

        let visited_count = self.set_membership(code, visited);
        self.bus
            .publish(AppEvent::VisitedChanged(VisitedChange::Toggled {
                code: code.clone(),
                visited,
                visited_count,
            }));

        let result = {
            let _guard = lock.lock().await;
            self.persist(adapter.as_ref(), code, visited, seq, epoch)
                .await
        };
        self.leave_lane(code);
        result
    }

    async fn persist(
        &self,
        adapter: &dyn PersistenceAdapter,
        code: &ParkCode,
        visited: bool,
        seq: u64,
        epoch: u64,
    ) -> Result<ToggleOutcome, PersistenceError> {
        if self.adapter_epoch.get() != epoch {
            log::debug!("Toggle {} veraltet (Sitzungswechsel), nicht geschrieben", code);
            return Ok(ToggleOutcome::Stale);
        }
        if !self.is_latest(code, seq) {
            log::debug!("Toggle {} überholt, nicht geschrieben", code);
            return Ok(ToggleOutcome::Superseded);
        }

        let result = if visited {
            adapter.add(code).await
        } else {
            adapter.remove(code).await
        };

        if self.adapter_epoch.get() != epoch {
            log::debug!("Toggle {} abgeschlossen, Sitzung inzwischen gewechselt", code);
            return Ok(ToggleOutcome::Stale);
        }

        match result {
            Ok(()) => {
                let mut persisted = self.persisted.borrow_mut();
                if visited {
                    persisted.insert(code.clone());
                } else {
                    persisted.remove(code);
                }
                log::debug!("Park {} besucht={} gespeichert", code, visited);
                Ok(ToggleOutcome::Applied)
            }
            Err(e) if self.is_latest(code, seq) => {
                let confirmed = self.persisted.borrow().contains(code);
                let visited_count = self.set_membership(code, confirmed);
                log::warn!("Park {} konnte nicht gespeichert werden: {}", code, e);
                self.bus
                    .publish(AppEvent::VisitedChanged(VisitedChange::Toggled {
                        code: code.clone(),
                        visited: confirmed,
                        visited_count,
                    }));
                self.bus.publish(AppEvent::Notice(Notice::ToggleFailed {
                    code: code.clone(),
                    visited,
                    error: e.clone(),
                }));
                Err(e)
            }
            Err(e) => {
                // Ein späterer Toggle desselben Codes bestimmt den Endstand
                log::warn!("Park {} konnte nicht gespeichert werden (überholt): {}", code, e);
                Err(e)
            }
        }
    }

    fn enter_lane(&self, code: &ParkCode, seq: u64) -> Rc<Mutex<()>> {
        let mut lanes = self.lanes.borrow_mut();
        let lane = lanes.entry(code.clone()).or_insert_with(|| CodeLane {
            lock: Rc::new(Mutex::new(())),
            latest_seq: seq,
            in_flight: 0,
        });
        lane.latest_seq = seq;
        lane.in_flight += 1;
        lane.lock.clone()
    }

    fn leave_lane(&self, code: &ParkCode) {
        let mut lanes = self.lanes.borrow_mut();
        if let Some(lane) = lanes.get_mut(code) {
            lane.in_flight = lane.in_flight.saturating_sub(1);
            if lane.in_flight == 0 {
                lanes.remove(code);
            }
        }
        if lanes.is_empty() {
            self.lanes_drained.notify_waiters();
        }
    }

    fn is_latest(&self, code: &ParkCode, seq: u64) -> bool {
        self.lanes
            .borrow()
            .get(code)
            .is_some_and(|lane| lane.latest_seq == seq)
    }

    /// Setzt die Mitgliedschaft und gibt die neue Mengengröße zurück.
    fn set_membership(&self, code: &ParkCode, visited: bool) -> usize {
        let mut set = self.visited.borrow_mut();
        if visited {
            set.insert(code.clone());
        } else {
            set.remove(code);
        }
        set.len()
    }

    /// Prüft, ob ein Park als besucht markiert ist.
    pub fn contains(&self, code: &str) -> bool {
        self.visited.borrow().contains(code)
    }

    /// Anzahl besuchter Parks.
    pub fn size(&self) -> usize {
        self.visited.borrow().len()
    }

    /// Kopie der aktuellen Menge.
    pub fn snapshot(&self) -> VisitedCodes {
        self.visited.borrow().clone()
    }

    /// Gibt `true` zurück, sobald der erste Reload abgeschlossen ist.
    pub fn is_loaded(&self) -> bool {
        self.loaded.get()
    }

    /// Anzahl der Toggles, deren Persistierung noch läuft.
    pub fn pending_toggles(&self) -> usize {
        self.lanes.borrow().values().map(|lane| lane.in_flight).sum()
    }

    /// Leert den Cache und bindet ihn an einen neuen Adapter (Test-Isolation).
    pub fn reset(&self, adapter: Rc<dyn PersistenceAdapter>) {
        *self.adapter.borrow_mut() = adapter;
        self.visited.borrow_mut().clear();
        self.persisted.borrow_mut().clear();
        self.lanes.borrow_mut().clear();
        self.lanes_drained.notify_waiters();
        self.loaded.set(false);
        self.adapter_epoch.set(self.adapter_epoch.get() + 1);
        self.bump_generation();
    }
}
