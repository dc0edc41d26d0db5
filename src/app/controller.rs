//! Application Controller für zentrale Event-Verarbeitung.

use super::{AppCommand, AppIntent, AppState};

/// Orchestriert Intents von Karte, Identitäts-Provider und Host auf den AppState.
#[derive(Default)]
pub struct AppController;

impl AppController {
    /// Erstellt einen neuen Controller.
    pub fn new() -> Self {
        Self
    }

    /// Verarbeitet einen Intent über Intent->Command Mapping.
    ///
    /// Nimmt `&self` und `&AppState`, damit mehrere Intents (z.B. schnelle Klicks)
    /// gleichzeitig ausstehen können.
    pub async fn handle_intent(&self, state: &AppState, intent: AppIntent) -> anyhow::Result<()> {
        let commands = self.map_intent_to_commands(state, intent);
        for command in commands {
            self.handle_command(state, command).await?;
        }

        Ok(())
    }

    fn map_intent_to_commands(&self, state: &AppState, intent: AppIntent) -> Vec<AppCommand> {
        super::intent_mapping::map_intent_to_commands(state, intent)
    }

    /// Führt mutierende Commands auf dem AppState aus.
    /// Dispatcht an Feature-Handler in `handlers/`.
    pub async fn handle_command(&self, state: &AppState, command: AppCommand) -> anyhow::Result<()> {
        state.record_command(&command);
        use super::handlers;

        match command {
            // === Sitzung ===
            AppCommand::ApplyIdentitySignal { signal } => {
                handlers::session::apply_identity_signal(state, signal).await
            }

            // === Besucht-Status ===
            AppCommand::ReloadVisited => handlers::visited::reload(state).await,
            AppCommand::ToggleVisited { code, visited } => {
                handlers::visited::toggle(state, code, visited).await?
            }

            // === Katalog ===
            AppCommand::SetCatalog { catalog } => handlers::catalog::set_catalog(state, catalog),
            AppCommand::UseEmptyCatalog { message } => {
                handlers::catalog::use_empty_catalog(state, message)
            }

            // === Marker ===
            AppCommand::RequestMarkerBuild => handlers::markers::request_build(state),
            AppCommand::TearDownMarkers => handlers::markers::tear_down(state),
            AppCommand::OpenMarkerPopup { code } => handlers::markers::open_popup(state, &code),
            AppCommand::CloseMarkerPopup => handlers::markers::close_popup(state),
            AppCommand::AttachToggleHandler { code } => {
                handlers::markers::attach_toggle_handler(state, &code)
            }
        }

        Ok(())
    }
}
