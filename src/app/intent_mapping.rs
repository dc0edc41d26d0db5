//! Mapping von Eingabe-Intents auf mutierende App-Commands.

use super::session_manager::{AuthTransitionError, IdentitySignal};
use super::{AppCommand, AppIntent, AppState};
use crate::core::UserId;

/// Übersetzt einen `AppIntent` in eine Sequenz ausführbarer `AppCommand`s.
pub fn map_intent_to_commands(state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
    match intent {
        AppIntent::AppStarted => vec![AppCommand::ReloadVisited],
        AppIntent::CatalogLoaded { catalog } => vec![AppCommand::SetCatalog { catalog }],
        AppIntent::CatalogUnavailable { message } => {
            vec![AppCommand::UseEmptyCatalog { message }]
        }
        AppIntent::MapReady => vec![AppCommand::RequestMarkerBuild],
        AppIntent::MapTornDown => vec![AppCommand::TearDownMarkers],
        AppIntent::SignInStarted => vec![AppCommand::ApplyIdentitySignal {
            signal: IdentitySignal::SignInStarted,
        }],
        AppIntent::IdentitySet { user_id } => {
            let signal = match UserId::new(user_id) {
                Some(user_id) => IdentitySignal::Set(user_id),
                None => IdentitySignal::Failed(AuthTransitionError {
                    message: "Identitäts-Provider lieferte eine leere Nutzer-ID".to_string(),
                }),
            };
            vec![AppCommand::ApplyIdentitySignal { signal }]
        }
        AppIntent::IdentityCleared => vec![AppCommand::ApplyIdentitySignal {
            signal: IdentitySignal::Cleared,
        }],
        AppIntent::IdentityError { message } => vec![AppCommand::ApplyIdentitySignal {
            signal: IdentitySignal::Failed(AuthTransitionError { message }),
        }],
        AppIntent::MarkerPopupOpened { code } => vec![
            AppCommand::OpenMarkerPopup { code: code.clone() },
            AppCommand::AttachToggleHandler { code },
        ],
        AppIntent::MarkerPopupClosed => vec![AppCommand::CloseMarkerPopup],
        AppIntent::MarkerCheckboxClicked { code } => {
            // Ohne registrierten Handler löst ein Klick nichts aus
            match state.markers().click_target(&code) {
                Some(visited) => vec![AppCommand::ToggleVisited { code, visited }],
                None => {
                    log::debug!("Klick auf {} ohne Handler ignoriert", code);
                    Vec::new()
                }
            }
        }
        AppIntent::SetVisitedRequested { code, visited } => {
            vec![AppCommand::ToggleVisited { code, visited }]
        }
    }
}
