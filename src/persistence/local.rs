//! Persistenz-Adapter für anonyme Sitzungen (lokaler Key/Value-Speicher).

use super::{AdapterKind, KeyValueStore, PersistenceAdapter, PersistenceError, VisitedCodes};
use crate::core::ParkCode;
use async_trait::async_trait;
use std::rc::Rc;

/// Key-Präfix der anonymen Sitzung. Ein Key pro besuchtem Park, Wert `"true"`.
pub const ANONYMOUS_VISITED_PREFIX: &str = "visited/anonymous/";

const VISITED_VALUE: &str = "true";

/// Besucht-Status im lokalen Profilspeicher.
#[derive(Clone)]
pub struct LocalAdapter {
    store: Rc<dyn KeyValueStore>,
}

impl LocalAdapter {
    /// Erstellt den Adapter über einem Profilspeicher.
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Session-bezogener Key eines Parks.
    pub fn key_for(code: &ParkCode) -> String {
        format!("{ANONYMOUS_VISITED_PREFIX}{code}")
    }
}

#[async_trait(?Send)]
impl PersistenceAdapter for LocalAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Local
    }

    async fn load(&self) -> Result<VisitedCodes, PersistenceError> {
        let keys = self.store.keys_with_prefix(ANONYMOUS_VISITED_PREFIX)?;
        Ok(keys
            .iter()
            .filter_map(|key| key.strip_prefix(ANONYMOUS_VISITED_PREFIX))
            .filter_map(ParkCode::new)
            .collect())
    }

    async fn add(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        self.store.set(&Self::key_for(code), VISITED_VALUE)
    }

    async fn remove(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        self.store.remove(&Self::key_for(code))
    }
}
