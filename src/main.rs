//! Visited Parks.
//!
//! Headless-Host: lädt Park-Daten und Besucht-Status, führt die übergebenen
//! Aktionen aus und gibt Fortschritt und Marker aus.
//!
//! Aufruf: `visited-parks [login <uid> | logout | visit <code> | unvisit <code>]...`

use std::rc::Rc;
use visited_parks::{
    AppController, AppIntent, AppOptions, AppState, JsonFileStore, MemoryDocumentStore, ParkCode,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logger initialisieren
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Visited Parks v{} startet...", env!("CARGO_PKG_VERSION"));

    let actions = parse_actions(std::env::args().skip(1))?;

    // Optionen aus TOML laden (oder Standardwerte)
    let options = AppOptions::load_from_file(&AppOptions::config_path());
    let local_store = Rc::new(JsonFileStore::open(options.local_store_path.clone())?);
    // Ohne Remote-Backend: Dokumente nur für die Laufzeit des Prozesses
    let documents = Rc::new(MemoryDocumentStore::new());

    let catalog_intent = AppIntent::catalog_from_file(&options.catalog_path);

    let state = AppState::new(options, local_store, documents);
    let controller = AppController::new();

    controller.handle_intent(&state, catalog_intent).await?;
    controller.handle_intent(&state, AppIntent::MapReady).await?;
    controller.handle_intent(&state, AppIntent::AppStarted).await?;

    for action in actions {
        if let Err(e) = controller.handle_intent(&state, action).await {
            log::error!("{:#}", e);
        }
    }

    print_summary(&state);
    Ok(())
}

fn parse_actions(mut args: impl Iterator<Item = String>) -> anyhow::Result<Vec<AppIntent>> {
    let mut actions = Vec::new();
    while let Some(arg) = args.next() {
        let intent = match arg.as_str() {
            "login" => AppIntent::IdentitySet {
                user_id: next_value(&mut args, "login")?,
            },
            "logout" => AppIntent::IdentityCleared,
            "visit" | "unvisit" => {
                let raw = next_value(&mut args, &arg)?;
                let code = ParkCode::new(raw)
                    .ok_or_else(|| anyhow::anyhow!("Leerer Park-Code für '{arg}'"))?;
                AppIntent::SetVisitedRequested {
                    code,
                    visited: arg == "visit",
                }
            }
            other => anyhow::bail!("Unbekannte Aktion: {other}"),
        };
        actions.push(intent);
    }
    Ok(actions)
}

fn next_value(args: &mut impl Iterator<Item = String>, action: &str) -> anyhow::Result<String> {
    args.next()
        .ok_or_else(|| anyhow::anyhow!("Aktion '{action}' erwartet einen Wert"))
}

fn print_summary(state: &AppState) {
    match state.session().user_id() {
        Some(user_id) => println!("Angemeldet als {user_id}"),
        None => println!("Anonyme Sitzung"),
    }
    match state.progress().summary() {
        Some(summary) => println!("{summary}"),
        None => println!("Fortschritt unbekannt"),
    }
    for view in state.markers().views() {
        let mark = if view.visited { "x" } else { " " };
        println!("[{mark}] {:<6} {}", view.code.as_str(), view.title);
    }
}
