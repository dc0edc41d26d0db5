//! Sitzungs-Automat: `SignedOut` → (`SigningIn`) → `SignedIn(uid)` → `SignedOut`.
//!
//! Jede echte Identitätsänderung ergibt genau einen Übergang. Wiederholte
//! Provider-Meldungen für die bereits aktive Identität werden verworfen.

use crate::core::{Session, UserId};

/// Fehlermeldung des Identitäts-Providers anstelle von set/clear.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Anmeldung fehlgeschlagen: {message}")]
pub struct AuthTransitionError {
    /// Meldung des Providers
    pub message: String,
}

/// Signal des Identitäts-Providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySignal {
    /// Anmelde-Ablauf gestartet
    SignInStarted,
    /// Identität gesetzt
    Set(UserId),
    /// Identität entfernt
    Cleared,
    /// Provider-Fehler (wird wie `Cleared` behandelt)
    Failed(AuthTransitionError),
}

/// Zustand des Automaten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nicht angemeldet
    #[default]
    SignedOut,
    /// Anmeldung läuft (transient; die bisherige Sitzung bleibt aktiv)
    SigningIn,
    /// Angemeldet
    SignedIn(UserId),
}

/// Ergebnis eines Identitätswechsels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionTransition {
    /// Neue Identität aktiv
    SignedIn(UserId),
    /// Identität entfernt
    SignedOut,
}

/// Verfolgt die aktuelle Identität.
#[derive(Debug, Default)]
pub struct SessionManager {
    state: SessionState,
    session: Session,
    transitions: u64,
}

impl SessionManager {
    /// Startet abgemeldet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aktueller Automatenzustand.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Aktive Sitzung (ändert sich nur bei einem Übergang).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Anzahl bisheriger Übergänge.
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Wendet ein Provider-Signal an. `None`, wenn sich die Identität nicht ändert.
    pub fn apply(&mut self, signal: IdentitySignal) -> Option<SessionTransition> {
        match signal {
            IdentitySignal::SignInStarted => {
                if !self.session.is_signed_in() {
                    self.state = SessionState::SigningIn;
                }
                None
            }
            IdentitySignal::Set(user_id) => {
                self.state = SessionState::SignedIn(user_id.clone());
                if self.session.user_id() == Some(&user_id) {
                    log::debug!("Identität {} bereits aktiv, Signal verworfen", user_id);
                    return None;
                }
                self.session = Session::SignedIn(user_id.clone());
                self.transitions += 1;
                log::info!("Angemeldet als {}", user_id);
                Some(SessionTransition::SignedIn(user_id))
            }
            IdentitySignal::Failed(error) => {
                log::warn!("{}", error);
                self.apply(IdentitySignal::Cleared)
            }
            IdentitySignal::Cleared => {
                self.state = SessionState::SignedOut;
                if !self.session.is_signed_in() {
                    log::debug!("Bereits abgemeldet, Signal verworfen");
                    return None;
                }
                self.session = Session::Anonymous;
                self.transitions += 1;
                log::info!("Abgemeldet");
                Some(SessionTransition::SignedOut)
            }
        }
    }

    /// Zurück in den Startzustand (Test-Isolation).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
