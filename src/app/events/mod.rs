//! AppIntent-, AppCommand- und AppEvent-Enums für den Intent/Command/Event-Datenfluss.

mod command;
mod intent;
mod notification;

pub use command::AppCommand;
pub use intent::AppIntent;
pub use notification::{AppEvent, EventTopic, Notice, VisitedChange};
