//! Sitzungs-Identität: anonym oder angemeldeter Nutzer.

use std::fmt;

/// Nicht-leere Nutzer-ID des Identitäts-Providers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Erstellt eine Nutzer-ID. Leere IDs sind ungültig.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        (!id.trim().is_empty()).then_some(Self(id))
    }

    /// Liefert die ID als String-Slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aktive Sitzung. Es ist immer genau eine Sitzung aktiv.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    /// Nicht angemeldet: Besucht-Status liegt im lokalen Speicher
    #[default]
    Anonymous,
    /// Angemeldet: Besucht-Status liegt in der Dokumentsammlung des Nutzers
    SignedIn(UserId),
}

impl Session {
    /// Nutzer-ID, falls angemeldet.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            Session::Anonymous => None,
            Session::SignedIn(user_id) => Some(user_id),
        }
    }

    /// Gibt `true` zurück, wenn ein Nutzer angemeldet ist.
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Session::SignedIn(_))
    }
}
