//! Geteilte Typen für layer-übergreifende Verträge.
//!
//! Enthält Konfiguration und Marker-Darstellung, die zwischen `app` und dem
//! Host (Binary/Karten-Widget) geteilt werden.

mod marker_style;
pub mod options;

pub use marker_style::MarkerStyle;
pub use options::AppOptions;
pub use options::TOTAL_PARKS;
