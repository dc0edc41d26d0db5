//! Fortschrittsanzeige, neu berechnet bei jedem `visited-changed`.

use super::event_bus::EventSubscriber;
use super::{AppEvent, VisitedChange};
use crate::core::ProgressSummary;

/// Hält nur den zuletzt dargestellten Fortschritt.
#[derive(Debug)]
pub struct ProgressTracker {
    total: usize,
    last: Option<ProgressSummary>,
}

impl ProgressTracker {
    /// Erstellt den Tracker mit fester Gesamtzahl.
    pub fn new(total: usize) -> Self {
        Self { total, last: None }
    }

    /// Zuletzt dargestellter Fortschritt (`None` vor dem ersten Reload).
    pub fn summary(&self) -> Option<ProgressSummary> {
        self.last
    }

    /// Prozent-Anzeige, z.B. `"24%"`.
    pub fn percentage_label(&self) -> String {
        let percent = self.last.map_or(0, |summary| summary.percentage());
        format!("{percent}%")
    }

    /// Zurück in den Startzustand (Test-Isolation).
    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl EventSubscriber for ProgressTracker {
    fn on_event(&mut self, event: &AppEvent) {
        let visited_count = match event {
            AppEvent::VisitedChanged(VisitedChange::Reloaded { visited }) => visited.len(),
            AppEvent::VisitedChanged(VisitedChange::Toggled { visited_count, .. }) => {
                *visited_count
            }
            _ => return,
        };
        let summary = ProgressSummary::new(visited_count, self.total);
        log::debug!("Fortschritt: {}", summary);
        self.last = Some(summary);
    }
}
