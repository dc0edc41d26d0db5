//! Fortschritts-Zusammenfassung: besuchte Parks im Verhältnis zur Gesamtzahl.

use std::fmt;

/// Abgeleiteter Fortschritt `(besucht, gesamt)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressSummary {
    /// Anzahl besuchter Parks
    pub visited_count: usize,
    /// Feste Gesamtzahl der Parks
    pub total_count: usize,
}

impl ProgressSummary {
    /// Erstellt eine Zusammenfassung.
    pub fn new(visited_count: usize, total_count: usize) -> Self {
        Self {
            visited_count,
            total_count,
        }
    }

    /// Gerundeter Prozentwert (0 bei Gesamtzahl 0).
    pub fn percentage(&self) -> u32 {
        if self.total_count == 0 {
            return 0;
        }
        (self.visited_count as f64 / self.total_count as f64 * 100.0).round() as u32
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} Parks besucht ({}%)",
            self.visited_count,
            self.total_count,
            self.percentage()
        )
    }
}
