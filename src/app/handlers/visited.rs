//! Handler für den Besucht-Status.

use crate::app::visited_cache::{ReloadOutcome, ToggleOutcome};
use crate::app::AppState;
use crate::core::ParkCode;

/// Lädt den Besucht-Status vom aktiven Adapter neu (nicht fatal bei Fehler).
pub async fn reload(state: &AppState) {
    match state.visited().reload().await {
        Ok(ReloadOutcome::Applied { count }) => log::debug!("Reload: {} Parks", count),
        Ok(ReloadOutcome::Superseded) => log::debug!("Reload überholt"),
        Err(e) => log::warn!("Reload fehlgeschlagen: {}", e),
    }
}

/// Setzt den Besucht-Status eines Parks.
///
/// Ein Schreibfehler wird nach dem Rollback als Fehler zurückgegeben, damit der
/// Aufrufer erneut versuchen kann.
pub async fn toggle(state: &AppState, code: ParkCode, visited: bool) -> anyhow::Result<()> {
    match state.visited().toggle(&code, visited).await {
        Ok(ToggleOutcome::Applied) => Ok(()),
        Ok(outcome) => {
            log::debug!("Toggle {} → {}: {:?}", code, visited, outcome);
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context(format!(
            "Besucht-Status von {code} konnte nicht gespeichert werden"
        ))),
    }
}
