use crate::support::{
    codes, memory_state, reloaded_sets, toggle_failures, toggled_events, ScriptedAdapter,
};
use visited_parks::app::{AppEvent, Notice, ReloadOutcome, SessionState, ToggleOutcome};
use visited_parks::persistence::AdapterKind;
use visited_parks::{
    AppController, AppIntent, ParkCode, PersistenceAdapter, RemoteAdapter, Session, UserId,
};

fn sign_in(user_id: &str) -> AppIntent {
    AppIntent::IdentitySet {
        user_id: user_id.to_string(),
    }
}

fn signed_in_events(state: &visited_parks::AppState) -> usize {
    state
        .bus()
        .history()
        .entries()
        .iter()
        .filter(|event| matches!(event, AppEvent::SignedIn { .. }))
        .count()
}

#[tokio::test]
async fn test_sign_in_replaces_anonymous_set_without_merge() {
    let (state, _local, documents) = memory_state();
    let controller = AppController::new();
    RemoteAdapter::new(documents.clone(), UserId::new("alice").unwrap())
        .add(&ParkCode::from("ZION"))
        .await
        .unwrap();

    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();
    controller
        .handle_intent(
            &state,
            AppIntent::SetVisitedRequested {
                code: ParkCode::from("YELL"),
                visited: true,
            },
        )
        .await
        .unwrap();
    assert!(state.visited().contains("YELL"));

    controller
        .handle_intent(&state, sign_in("alice"))
        .await
        .unwrap();

    assert_eq!(state.visited().snapshot(), codes(&["ZION"]));
    assert_eq!(state.visited().adapter_kind(), AdapterKind::Remote);
    assert_eq!(reloaded_sets(&state).last(), Some(&codes(&["ZION"])));
}

#[tokio::test]
async fn test_sign_out_restores_local_set() {
    let (state, _local, _documents) = memory_state();
    let controller = AppController::new();

    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();
    controller
        .handle_intent(
            &state,
            AppIntent::SetVisitedRequested {
                code: ParkCode::from("YELL"),
                visited: true,
            },
        )
        .await
        .unwrap();
    controller
        .handle_intent(&state, sign_in("alice"))
        .await
        .unwrap();
    assert_eq!(state.visited().size(), 0);

    controller
        .handle_intent(&state, AppIntent::IdentityCleared)
        .await
        .unwrap();

    assert_eq!(state.session(), Session::Anonymous);
    assert_eq!(state.visited().snapshot(), codes(&["YELL"]));
    assert!(state
        .bus()
        .history()
        .entries()
        .contains(&AppEvent::SignedOut));
}

#[tokio::test]
async fn test_repeated_identity_set_reloads_once() {
    let (state, _local, _documents) = memory_state();
    let controller = AppController::new();

    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();
    controller
        .handle_intent(&state, sign_in("alice"))
        .await
        .unwrap();
    controller
        .handle_intent(&state, sign_in("alice"))
        .await
        .unwrap();

    assert_eq!(signed_in_events(&state), 1);
    // AppStarted + ein Sitzungswechsel
    assert_eq!(reloaded_sets(&state).len(), 2);
}

#[tokio::test]
async fn test_provider_error_signs_out_and_warns() {
    let (state, _local, _documents) = memory_state();
    let controller = AppController::new();
    controller
        .handle_intent(&state, sign_in("alice"))
        .await
        .unwrap();

    controller
        .handle_intent(
            &state,
            AppIntent::IdentityError {
                message: "token expired".to_string(),
            },
        )
        .await
        .unwrap();

    assert_eq!(state.session(), Session::Anonymous);
    assert_eq!(state.visited().adapter_kind(), AdapterKind::Local);
    let history = state.bus().history();
    assert!(history.entries().contains(&AppEvent::SignedOut));
    assert!(history
        .entries()
        .iter()
        .any(|event| matches!(event, AppEvent::Notice(Notice::Warning { .. }))));
}

#[tokio::test]
async fn test_sign_in_started_keeps_current_set() {
    let (state, _local, _documents) = memory_state();
    let controller = AppController::new();
    controller
        .handle_intent(&state, AppIntent::AppStarted)
        .await
        .unwrap();

    controller
        .handle_intent(&state, AppIntent::SignInStarted)
        .await
        .unwrap();

    assert_eq!(state.session_state(), SessionState::SigningIn);
    assert_eq!(state.session(), Session::Anonymous);
    assert_eq!(reloaded_sets(&state).len(), 1);
}

#[tokio::test]
async fn test_superseded_reload_is_discarded() {
    let (state, _local, _documents) = memory_state();
    let first = ScriptedAdapter::with_codes(&["YELL"]);
    let second = ScriptedAdapter::with_codes(&["ZION"]);
    let gate = first.gate_load();
    state.visited().switch_adapter(first.clone());

    let (stale, fresh, ()) = tokio::join!(
        state.visited().reload(),
        async {
            state.visited().switch_adapter(second.clone());
            state.visited().reload().await
        },
        async { gate.notify_one() },
    );

    assert_eq!(stale, Ok(ReloadOutcome::Superseded));
    assert_eq!(fresh, Ok(ReloadOutcome::Applied { count: 1 }));
    assert_eq!(state.visited().snapshot(), codes(&["ZION"]));
    assert_eq!(reloaded_sets(&state), vec![codes(&["ZION"])]);
}

#[tokio::test]
async fn test_failed_first_reload_still_unblocks_and_warns() {
    let (state, _local, _documents) = memory_state();
    let adapter = ScriptedAdapter::with_codes(&["YELL"]);
    adapter.fail_load(true);
    state.visited().switch_adapter(adapter.clone());

    let result = state.visited().reload().await;

    assert!(result.is_err());
    assert!(state.visited().is_loaded());
    assert_eq!(state.visited().size(), 0);
    assert_eq!(reloaded_sets(&state), vec![codes(&[])]);
}

async fn anonymous_scripted_state() -> (
    visited_parks::AppState,
    std::rc::Rc<ScriptedAdapter>,
    std::rc::Rc<visited_parks::MemoryDocumentStore>,
) {
    let (state, _local, documents) = memory_state();
    let anonymous = ScriptedAdapter::with_codes(&[]);
    state.visited().switch_adapter(anonymous.clone());
    state.visited().reload().await.unwrap();
    RemoteAdapter::new(documents.clone(), UserId::new("alice").unwrap())
        .add(&ParkCode::from("ZION"))
        .await
        .unwrap();
    (state, anonymous, documents)
}

#[tokio::test]
async fn test_toggle_in_flight_across_sign_in_is_stale() {
    let (state, anonymous, documents) = anonymous_scripted_state().await;
    let controller = AppController::new();
    let slow = anonymous.gate_next_write();
    let yell = ParkCode::from("YELL");

    let (toggle, signed_in, ()) = tokio::join!(
        state.visited().toggle(&yell, true),
        controller.handle_intent(&state, sign_in("alice")),
        async { slow.notify_one() },
    );

    assert_eq!(toggle, Ok(ToggleOutcome::Stale));
    assert!(signed_in.is_ok());
    assert_eq!(anonymous.stored(), codes(&["YELL"]));
    let remote = RemoteAdapter::new(documents, UserId::new("alice").unwrap());
    assert_eq!(remote.load().await.unwrap(), codes(&["ZION"]));
    assert_eq!(state.visited().snapshot(), codes(&["ZION"]));
    assert_eq!(reloaded_sets(&state).last(), Some(&codes(&["ZION"])));
    assert_eq!(toggled_events(&state, "YELL"), vec![true]);
    assert_eq!(toggle_failures(&state), 0);
}

#[tokio::test]
async fn test_failed_write_after_sign_in_does_not_roll_back() {
    let (state, anonymous, _documents) = anonymous_scripted_state().await;
    let controller = AppController::new();
    anonymous.fail_writes(true);
    let slow = anonymous.gate_next_write();
    let yell = ParkCode::from("YELL");

    let (toggle, signed_in, ()) = tokio::join!(
        state.visited().toggle(&yell, true),
        controller.handle_intent(&state, sign_in("alice")),
        async { slow.notify_one() },
    );

    assert_eq!(toggle, Ok(ToggleOutcome::Stale));
    assert!(signed_in.is_ok());
    assert_eq!(state.visited().snapshot(), codes(&["ZION"]));
    assert_eq!(toggled_events(&state, "YELL"), vec![true]);
    assert_eq!(toggle_failures(&state), 0);
}
