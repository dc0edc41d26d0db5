use crate::support::{
    codes, memory_state, reloaded_sets, toggle_failures, toggled_events, ScriptedAdapter,
};
use std::rc::Rc;
use visited_parks::app::{AppCommand, AppEvent, Notice};
use visited_parks::persistence::KeyValueStore;
use visited_parks::{AppController, AppIntent, AppState, ParkCode, PersistenceError};

fn set_visited(code: &str, visited: bool) -> AppIntent {
    AppIntent::SetVisitedRequested {
        code: ParkCode::from(code),
        visited,
    }
}

async fn scripted_state(initial: &[&str]) -> (AppState, Rc<ScriptedAdapter>) {
    let (state, _local, _documents) = memory_state();
    let adapter = ScriptedAdapter::with_codes(initial);
    state.visited().switch_adapter(adapter.clone());
    state.visited().reload().await.unwrap();
    (state, adapter)
}

#[tokio::test]
async fn test_round_trip_leaves_no_local_key() {
    let (state, local, _documents) = memory_state();
    let controller = AppController::new();
    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();

    controller
        .handle_intent(&state, set_visited("ACAD", true))
        .await
        .unwrap();
    assert_eq!(
        local.get("visited/anonymous/ACAD").unwrap().as_deref(),
        Some("true")
    );

    controller
        .handle_intent(&state, set_visited("ACAD", false))
        .await
        .unwrap();

    assert!(!state.visited().contains("ACAD"));
    assert_eq!(local.get("visited/anonymous/ACAD").unwrap(), None);
    assert!(local.is_empty());
}

#[tokio::test]
async fn test_repeated_add_is_idempotent() {
    let (state, local, _documents) = memory_state();
    let controller = AppController::new();
    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();

    for _ in 0..2 {
        controller
            .handle_intent(&state, set_visited("YELL", true))
            .await
            .unwrap();
    }

    assert_eq!(state.visited().size(), 1);
    assert_eq!(local.len(), 1);
    state.visited().reload().await.unwrap();
    assert_eq!(state.visited().snapshot(), codes(&["YELL"]));
}

#[tokio::test]
async fn test_reversed_latency_keeps_last_click() {
    let (state, adapter) = scripted_state(&[]).await;
    let controller = AppController::new();
    let slow = adapter.gate_next_write();
    adapter.pass_next_write();

    let (first, second, ()) = tokio::join!(
        controller.handle_intent(&state, set_visited("YELL", true)),
        controller.handle_intent(&state, set_visited("YELL", false)),
        async { slow.notify_one() },
    );

    assert!(first.is_ok());
    assert!(second.is_ok());
    assert!(!state.visited().contains("YELL"));
    assert!(!adapter.stored().contains("YELL"));
    assert_eq!(
        adapter.writes(),
        vec![
            (ParkCode::from("YELL"), true),
            (ParkCode::from("YELL"), false)
        ]
    );
    assert_eq!(toggled_events(&state, "YELL"), vec![true, false]);
    assert_eq!(state.visited().pending_toggles(), 0);
}

#[tokio::test]
async fn test_superseded_pending_toggle_is_not_written() {
    let (state, adapter) = scripted_state(&[]).await;
    let controller = AppController::new();
    let slow = adapter.gate_next_write();

    let (a, b, c, ()) = tokio::join!(
        controller.handle_intent(&state, set_visited("YELL", true)),
        controller.handle_intent(&state, set_visited("YELL", false)),
        controller.handle_intent(&state, set_visited("YELL", true)),
        async { slow.notify_one() },
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert!(state.visited().contains("YELL"));
    assert_eq!(
        adapter.writes(),
        vec![
            (ParkCode::from("YELL"), true),
            (ParkCode::from("YELL"), true)
        ]
    );
}

#[tokio::test]
async fn test_failed_write_rolls_back_with_single_corrective_event() {
    let (state, adapter) = scripted_state(&[]).await;
    let controller = AppController::new();
    adapter.fail_writes(true);

    let result = controller
        .handle_intent(&state, set_visited("ARCH", true))
        .await;

    let error = result.expect_err("Schreibfehler muss gemeldet werden");
    assert!(matches!(
        error.downcast_ref::<PersistenceError>(),
        Some(PersistenceError::Transport(_))
    ));
    assert!(!state.visited().contains("ARCH"));
    assert_eq!(toggled_events(&state, "ARCH"), vec![true, false]);
    assert_eq!(toggle_failures(&state), 1);
    assert!(state.bus().history().entries().iter().any(|event| matches!(
        event,
        AppEvent::Notice(Notice::ToggleFailed { code, visited: true, .. }) if code.as_str() == "ARCH"
    )));
}

#[tokio::test]
async fn test_failed_toggle_can_be_retried() {
    let (state, adapter) = scripted_state(&[]).await;
    let controller = AppController::new();
    adapter.fail_writes(true);
    let _ = controller
        .handle_intent(&state, set_visited("ARCH", true))
        .await;

    adapter.fail_writes(false);
    controller
        .handle_intent(&state, set_visited("ARCH", true))
        .await
        .unwrap();

    assert!(state.visited().contains("ARCH"));
    assert_eq!(adapter.stored(), codes(&["ARCH"]));
}

#[tokio::test]
async fn test_failed_removal_restores_visited_flag() {
    let (state, adapter) = scripted_state(&["ZION"]).await;
    let controller = AppController::new();
    adapter.fail_writes(true);

    let result = controller
        .handle_intent(&state, set_visited("ZION", false))
        .await;

    assert!(result.is_err());
    assert!(state.visited().contains("ZION"));
    assert_eq!(toggled_events(&state, "ZION"), vec![false, true]);
}

#[tokio::test]
async fn test_toggle_during_reload_applies_after_it() {
    let (state, _local, _documents) = memory_state();
    let adapter = ScriptedAdapter::with_codes(&["ZION"]);
    let gate = adapter.gate_load();
    state.visited().switch_adapter(adapter.clone());
    let controller = AppController::new();

    let (reload, toggle, ()) = tokio::join!(
        controller.handle_intent(&state, AppIntent::AppStarted),
        controller.handle_intent(&state, set_visited("YELL", true)),
        async { gate.notify_one() },
    );

    assert!(reload.is_ok() && toggle.is_ok());
    assert_eq!(state.visited().snapshot(), codes(&["YELL", "ZION"]));
    assert_eq!(reloaded_sets(&state), vec![codes(&["ZION"])]);
    assert_eq!(adapter.stored(), codes(&["YELL", "ZION"]));
}

#[tokio::test]
async fn test_reload_includes_toggle_acknowledged_while_it_waited() {
    let (state, adapter) = scripted_state(&[]).await;
    let controller = AppController::new();
    let slow = adapter.gate_next_write();

    let (toggle, reload, ()) = tokio::join!(
        controller.handle_intent(&state, set_visited("ARCH", true)),
        controller.handle_intent(&state, AppIntent::AppStarted),
        async { slow.notify_one() },
    );

    assert!(toggle.is_ok() && reload.is_ok());
    assert_eq!(adapter.stored(), codes(&["ARCH"]));
    assert!(state.visited().contains("ARCH"));
    assert_eq!(reloaded_sets(&state).last(), Some(&codes(&["ARCH"])));
    assert_eq!(
        state.progress().summary().map(|summary| summary.visited_count),
        Some(1)
    );
    assert_eq!(toggle_failures(&state), 0);
    assert_eq!(state.visited().pending_toggles(), 0);
}

#[tokio::test]
async fn test_toggle_commands_are_logged() {
    let (state, _adapter) = scripted_state(&[]).await;
    let controller = AppController::new();

    controller
        .handle_intent(&state, set_visited("YELL", true))
        .await
        .unwrap();

    let log = state.command_log();
    match log.entries().last() {
        Some(AppCommand::ToggleVisited { code, visited }) => {
            assert_eq!(code.as_str(), "YELL");
            assert!(*visited);
        }
        other => panic!("Unerwarteter letzter Command: {other:?}"),
    }
}
