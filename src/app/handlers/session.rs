//! Handler für Identitätswechsel: Adapter tauschen, ankündigen, neu laden.

use crate::app::session_manager::{IdentitySignal, SessionTransition};
use crate::app::{AppEvent, AppState};

/// Wendet ein Provider-Signal an.
///
/// Nur ein echter Identitätswechsel tauscht den Adapter und löst einen
/// vollständigen Reload aus. Ein Ladefehler ist nicht fatal: der Cache hat
/// bereits eine Warnung veröffentlicht.
pub async fn apply_identity_signal(state: &AppState, signal: IdentitySignal) {
    let provider_error = match &signal {
        IdentitySignal::Failed(error) => Some(error.to_string()),
        _ => None,
    };

    let transition = state.session_manager_mut().apply(signal);
    if let Some(message) = provider_error {
        state.bus().publish(AppEvent::warning(message));
    }
    let Some(transition) = transition else {
        return;
    };

    state.visited().switch_adapter(state.adapter_for_session());
    match transition {
        SessionTransition::SignedIn(user_id) => {
            state.bus().publish(AppEvent::SignedIn { user_id })
        }
        SessionTransition::SignedOut => state.bus().publish(AppEvent::SignedOut),
    }

    if let Err(e) = state.visited().reload().await {
        log::warn!("Reload nach Sitzungswechsel fehlgeschlagen: {}", e);
    }
}
