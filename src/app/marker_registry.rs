//! Marker-Registry: ein `MarkerView` pro Park, abgeleitet aus Katalog + Besucht-Menge.
//!
//! Marker werden erst gebaut, wenn Katalog und erster Reload vorliegen. Ein
//! Bau-Auftrag vor dem ersten Reload wird vorgemerkt, nicht mit leerer Menge
//! gerendert. Nach einem Sitzungswechsel gilt dasselbe bis zum Reload der neuen
//! Sitzung.

use super::event_bus::EventSubscriber;
use super::{AppEvent, VisitedChange};
use crate::core::{GeoPoint, ParkCatalog, ParkCode, ParkImage};
use crate::persistence::VisitedCodes;
use crate::shared::{AppOptions, MarkerStyle};
use indexmap::IndexMap;
use std::sync::Arc;

/// Beschriftung der Checkbox im Popup.
pub const VISITED_CHECKBOX_LABEL: &str = "I've been here!";

/// Abgeleitete Darstellung eines Parks.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    /// Park-Code (stabiler Schlüssel)
    pub code: ParkCode,
    /// Anzeigename
    pub title: String,
    /// Kartenposition
    pub position: GeoPoint,
    /// Besucht-Status
    pub visited: bool,
    /// Aktueller Stil (ohne Popup-Vergrößerung)
    pub style: MarkerStyle,
    /// Klick-Handler am Popup-Inhalt registriert
    pub handler_attached: bool,
}

/// Inhalt eines geöffneten Popups.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupContent {
    /// Titel (voller Parkname)
    pub title: String,
    /// Beschreibung
    pub description: String,
    /// Vorschaubild
    pub image: Option<ParkImage>,
    /// Zustand der Besucht-Checkbox
    pub checked: bool,
    /// Beschriftung der Checkbox
    pub checkbox_label: &'static str,
}

/// Zähler für Render-Vorgänge (Diagnose und Tests).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Komplette Aufbauten
    pub builds: usize,
    /// Aktualisierungen aller Besucht-Flags nach einem Reload
    pub refreshes: usize,
    /// Einzelne Stilwechsel nach einem Toggle
    pub style_swaps: usize,
}

/// Ordnet Park-Codes ihrem dargestellten Zustand zu.
pub struct MarkerRegistry {
    visited_style: MarkerStyle,
    unvisited_style: MarkerStyle,
    popup_scale: f32,
    catalog: Option<Arc<ParkCatalog>>,
    build_requested: bool,
    built: bool,
    /// `None` bis zum ersten abgeschlossenen Reload der aktiven Sitzung
    known_visited: Option<VisitedCodes>,
    views: IndexMap<ParkCode, MarkerView>,
    popup: Option<ParkCode>,
    stats: RenderStats,
}

impl MarkerRegistry {
    /// Erstellt eine leere Registry mit den Marker-Stilen der Optionen.
    pub fn new(options: &AppOptions) -> Self {
        Self {
            visited_style: options.marker_style(true).clone(),
            unvisited_style: options.marker_style(false).clone(),
            popup_scale: options.popup_scale,
            catalog: None,
            build_requested: false,
            built: false,
            known_visited: None,
            views: IndexMap::new(),
            popup: None,
            stats: RenderStats::default(),
        }
    }

    fn style_for(&self, visited: bool) -> MarkerStyle {
        if visited {
            self.visited_style.clone()
        } else {
            self.unvisited_style.clone()
        }
    }

    /// Übernimmt den Park-Katalog. Bereits gebaute Marker werden neu aufgebaut.
    pub fn set_catalog(&mut self, catalog: Arc<ParkCatalog>) {
        self.catalog = Some(catalog);
        if self.built {
            self.built = false;
            self.views.clear();
        }
        self.try_build();
    }

    /// Fordert den Marker-Aufbau an; wird bis zum ersten Reload zurückgestellt.
    pub fn request_build(&mut self) {
        self.build_requested = true;
        self.try_build();
    }

    fn try_build(&mut self) {
        if !self.build_requested || self.built {
            return;
        }
        let (Some(catalog), Some(visited)) = (self.catalog.as_ref(), self.known_visited.as_ref())
        else {
            log::debug!("Marker-Aufbau zurückgestellt (Katalog oder Besucht-Status fehlt)");
            return;
        };

        let views: IndexMap<ParkCode, MarkerView> = catalog
            .iter()
            .map(|park| {
                let is_visited = visited.contains(&park.park_code);
                let view = MarkerView {
                    code: park.park_code.clone(),
                    title: park.full_name.clone(),
                    position: park.position,
                    visited: is_visited,
                    style: self.style_for(is_visited),
                    handler_attached: false,
                };
                (park.park_code.clone(), view)
            })
            .collect();

        self.views = views;
        self.built = true;
        self.stats.builds += 1;
        log::info!("{} Marker erstellt", self.views.len());
    }

    /// Gibt `true` zurück, wenn die Marker dargestellt werden.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Baut alle Marker ab (Karte wird entfernt).
    pub fn tear_down(&mut self) {
        self.views.clear();
        self.build_requested = false;
        self.built = false;
        self.popup = None;
        log::info!("Marker abgebaut");
    }

    fn refresh_all(&mut self, visited: &VisitedCodes) {
        let visited_style = self.visited_style.clone();
        let unvisited_style = self.unvisited_style.clone();
        for view in self.views.values_mut() {
            view.visited = visited.contains(&view.code);
            view.style = if view.visited {
                visited_style.clone()
            } else {
                unvisited_style.clone()
            };
        }
        self.stats.refreshes += 1;
    }

    fn swap_style(&mut self, code: &ParkCode, visited: bool) {
        let style = self.style_for(visited);
        let Some(view) = self.views.get_mut(code) else {
            return;
        };
        view.visited = visited;
        view.style = style;
        self.stats.style_swaps += 1;
    }

    /// Öffnet das Popup eines Markers.
    pub fn open_popup(&mut self, code: &ParkCode) -> Option<PopupContent> {
        let view = self.views.get(code)?;
        let park = self.catalog.as_ref()?.get(code.as_str())?;
        let content = PopupContent {
            title: park.full_name.clone(),
            description: park.description.clone(),
            image: park.preview_image().cloned(),
            checked: view.visited,
            checkbox_label: VISITED_CHECKBOX_LABEL,
        };
        self.popup = Some(code.clone());
        Some(content)
    }

    /// Schließt das offene Popup.
    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Registriert den Klick-Handler eines Markers höchstens einmal.
    /// Gibt `true` zurück, wenn der Handler neu registriert wurde.
    pub fn attach_toggle_handler(&mut self, code: &ParkCode) -> bool {
        match self.views.get_mut(code) {
            Some(view) if !view.handler_attached => {
                view.handler_attached = true;
                log::debug!("Klick-Handler für {} registriert", code);
                true
            }
            Some(_) => false,
            None => {
                log::warn!("Kein Marker für Park {}", code);
                false
            }
        }
    }

    /// Gewünschter Besucht-Status eines Klicks; `None` ohne registrierten Handler.
    pub fn click_target(&self, code: &ParkCode) -> Option<bool> {
        self.views
            .get(code)
            .filter(|view| view.handler_attached)
            .map(|view| !view.visited)
    }

    /// Marker eines Parks.
    pub fn view(&self, code: &str) -> Option<&MarkerView> {
        self.views.get(code)
    }

    /// Alle Marker in Katalog-Reihenfolge.
    pub fn views(&self) -> impl Iterator<Item = &MarkerView> {
        self.views.values()
    }

    /// Anzahl der Marker.
    pub fn len(&self) -> usize {
        self.views.len()
    }

    /// Gibt `true` zurück, wenn keine Marker existieren.
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Dargestellter Stil inklusive Popup-Vergrößerung.
    pub fn rendered_style(&self, code: &str) -> Option<MarkerStyle> {
        let view = self.views.get(code)?;
        if self.popup.as_ref().is_some_and(|open| open.as_str() == code) {
            Some(view.style.scaled(self.popup_scale))
        } else {
            Some(view.style.clone())
        }
    }

    /// Render-Zähler.
    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    /// Zurück in den Startzustand (Test-Isolation).
    pub fn reset(&mut self) {
        self.catalog = None;
        self.build_requested = false;
        self.built = false;
        self.known_visited = None;
        self.views.clear();
        self.popup = None;
        self.stats = RenderStats::default();
    }
}

impl EventSubscriber for MarkerRegistry {
    fn on_event(&mut self, event: &AppEvent) {
        let change = match event {
            AppEvent::VisitedChanged(change) => change,
            AppEvent::SignedIn { .. } | AppEvent::SignedOut => {
                // Besucht-Stand der alten Sitzung ist ungültig, Reload steht aus
                self.known_visited = None;
                log::debug!("Sitzungswechsel: Marker-Aufbau wartet auf Reload");
                return;
            }
            _ => return,
        };
        match change {
            VisitedChange::Reloaded { visited } => {
                self.known_visited = Some(visited.as_ref().clone());
                if self.is_built() {
                    self.refresh_all(visited);
                } else {
                    self.try_build();
                }
            }
            VisitedChange::Toggled { code, visited, .. } => {
                if let Some(known) = self.known_visited.as_mut() {
                    if *visited {
                        known.insert(code.clone());
                    } else {
                        known.remove(code);
                    }
                }
                self.swap_style(code, *visited);
            }
        }
    }
}
