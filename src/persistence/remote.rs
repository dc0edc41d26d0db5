//! Persistenz-Adapter für angemeldete Sitzungen (Dokumentsammlung pro Nutzer).

use super::{
    AdapterKind, DocumentPath, DocumentStore, PersistenceAdapter, PersistenceError, VisitedCodes,
};
use crate::core::{ParkCode, UserId};
use async_trait::async_trait;
use serde_json::json;
use std::rc::Rc;

/// Name der Sammlung besuchter Parks unterhalb des Nutzer-Dokuments.
pub const VISITED_COLLECTION: &str = "visitedParks";

/// Besucht-Status unter `users/{uid}/visitedParks/{parkCode}`.
#[derive(Clone)]
pub struct RemoteAdapter {
    store: Rc<dyn DocumentStore>,
    user_id: UserId,
}

impl RemoteAdapter {
    /// Bindet den Adapter an einen angemeldeten Nutzer.
    pub fn new(store: Rc<dyn DocumentStore>, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    /// Bindet den Adapter an eine rohe Nutzer-ID; leere IDs sind ein Fehler.
    pub fn for_raw_user_id(
        store: Rc<dyn DocumentStore>,
        user_id: &str,
    ) -> Result<Self, PersistenceError> {
        let user_id = UserId::new(user_id).ok_or(PersistenceError::MissingUser)?;
        Ok(Self::new(store, user_id))
    }

    /// Nutzer, an den der Adapter gebunden ist.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Pfad der Sammlung besuchter Parks dieses Nutzers.
    pub fn collection(&self) -> DocumentPath {
        DocumentPath::new(["users", self.user_id.as_str(), VISITED_COLLECTION])
    }
}

#[async_trait(?Send)]
impl PersistenceAdapter for RemoteAdapter {
    fn kind(&self) -> AdapterKind {
        AdapterKind::Remote
    }

    async fn load(&self) -> Result<VisitedCodes, PersistenceError> {
        let documents = self.store.list(&self.collection()).await?;
        Ok(documents
            .into_iter()
            // Dokumente mit explizitem `visited: false` zählen nicht
            .filter(|(_, body)| body.get("visited").and_then(|v| v.as_bool()) != Some(false))
            .filter_map(|(id, _)| ParkCode::new(id))
            .collect())
    }

    async fn add(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        let body = json!({
            "visited": true,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        self.store
            .set(&self.collection().child(code.as_str()), body)
            .await?;
        Ok(())
    }

    async fn remove(&self, code: &ParkCode) -> Result<(), PersistenceError> {
        self.store
            .delete(&self.collection().child(code.as_str()))
            .await?;
        Ok(())
    }
}
