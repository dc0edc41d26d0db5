use crate::core::{ParkCode, UserId};
use crate::persistence::{PersistenceError, VisitedCodes};
use std::sync::Arc;

/// Topics des Event-Bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    /// `signed-in`
    SignedIn,
    /// `signed-out`
    SignedOut,
    /// `visited-changed`
    VisitedChanged,
    /// Nutzer-sichtbare Warnungen und Fehler
    Notice,
}

/// Änderung am Besucht-Status.
#[derive(Debug, Clone, PartialEq)]
pub enum VisitedChange {
    /// Komplett ersetzt (Reload)
    Reloaded { visited: Arc<VisitedCodes> },
    /// Ein einzelner Park umgeschaltet
    Toggled {
        code: ParkCode,
        visited: bool,
        /// Größe der Besucht-Menge nach der Änderung
        visited_count: usize,
    },
}

/// Nutzer-sichtbare Meldung.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// Nicht-fataler Hinweis (Katalog/Reload fehlgeschlagen, Anmeldefehler)
    Warning { message: String },
    /// Umschalten fehlgeschlagen und zurückgerollt; erneut versuchbar
    ToggleFailed {
        code: ParkCode,
        visited: bool,
        error: PersistenceError,
    },
}

/// Über den Event-Bus verteilte Benachrichtigung.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// Nutzer angemeldet
    SignedIn { user_id: UserId },
    /// Nutzer abgemeldet
    SignedOut,
    /// Besucht-Status geändert
    VisitedChanged(VisitedChange),
    /// Warnung oder Fehler für den Nutzer
    Notice(Notice),
}

impl AppEvent {
    /// Topic, unter dem das Event zugestellt wird.
    pub fn topic(&self) -> EventTopic {
        match self {
            AppEvent::SignedIn { .. } => EventTopic::SignedIn,
            AppEvent::SignedOut => EventTopic::SignedOut,
            AppEvent::VisitedChanged(_) => EventTopic::VisitedChanged,
            AppEvent::Notice(_) => EventTopic::Notice,
        }
    }

    /// Kurzform für eine Warnung.
    pub fn warning(message: impl Into<String>) -> Self {
        AppEvent::Notice(Notice::Warning {
            message: message.into(),
        })
    }
}
