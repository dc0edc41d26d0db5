//! Core-Domänentypen: Parks, Katalog, Sitzung, Fortschritt, Journal.

pub mod catalog;
pub mod journal;
pub mod park;
pub mod progress;
pub mod session;

pub use catalog::{parse_lat_long, CatalogError, ParkCatalog};
pub use journal::{format_entry_date, FormattedEntryDate, JournalEntry};
pub use park::{GeoPoint, ParkCode, ParkImage, ParkRecord};
pub use progress::ProgressSummary;
pub use session::{Session, UserId};
