use super::*;
use crate::state::test_helpers;
use serde_json::json;
use signals::{CallTarget, SignalPayload, encode_directive};
use tokio::time::{Duration, timeout};

async fn recv_event(rx: &mut mpsc::Receiver<ServerEvent>) -> ServerEvent {
    timeout(Duration::from_millis(500), rx.recv())
        .await
        .expect("event receive timed out")
        .expect("event channel closed unexpectedly")
}

#[tokio::test]
async fn register_directive_updates_registry_and_broadcasts() {
    let state = test_helpers::test_app_state();
    let conn = Uuid::new_v4();
    let mut rx = test_helpers::attach_client(&state, conn).await;

    let text = encode_directive(&ClientDirective::Register { display_name: "Alice".into() });
    dispatch_directive(&state, conn, &text).await;

    assert_eq!(state.registry.read().await.display_name(&conn), Some("Alice"));
    let ServerEvent::ActiveUsers(users) = recv_event(&mut rx).await else {
        panic!("expected activeUsers broadcast");
    };
    assert_eq!(users[0].display_name, "Alice");
}

#[tokio::test]
async fn call_user_directive_stamps_sender_connection() {
    let state = test_helpers::test_app_state();
    let caller = Uuid::new_v4();
    let callee = Uuid::new_v4();
    let _caller_rx = test_helpers::attach_client(&state, caller).await;
    let mut callee_rx = test_helpers::attach_client(&state, callee).await;
    state.registry.write().await.register("u2".into(), callee);

    // The payload lies about `from`; the dispatcher must overwrite it with
    // the sender's real connection id.
    let text = encode_directive(&ClientDirective::CallUser {
        to: CallTarget::User("u2".into()),
        from: Uuid::new_v4(),
        signal: SignalPayload::new(json!({"type": "offer"})),
    });
    dispatch_directive(&state, caller, &text).await;

    let ServerEvent::IncomingCall { from, .. } = recv_event(&mut callee_rx).await else {
        panic!("expected incomingCall");
    };
    assert_eq!(from, caller);
}

#[tokio::test]
async fn answer_and_end_call_directives_route() {
    let state = test_helpers::test_app_state();
    let caller = Uuid::new_v4();
    let callee = Uuid::new_v4();
    let mut caller_rx = test_helpers::attach_client(&state, caller).await;
    let _callee_rx = test_helpers::attach_client(&state, callee).await;

    let answer = encode_directive(&ClientDirective::AnswerCall {
        to: caller,
        signal: SignalPayload::new(json!({"type": "answer"})),
    });
    dispatch_directive(&state, callee, &answer).await;
    assert!(matches!(
        recv_event(&mut caller_rx).await,
        ServerEvent::CallAccepted { .. }
    ));

    let end = encode_directive(&ClientDirective::EndCall { to: CallTarget::Connection(caller) });
    dispatch_directive(&state, callee, &end).await;
    assert_eq!(recv_event(&mut caller_rx).await, ServerEvent::EndCall);
}

#[tokio::test]
async fn invalid_frames_are_dropped_without_side_effects() {
    let state = test_helpers::test_app_state();
    let conn = Uuid::new_v4();
    let mut rx = test_helpers::attach_client(&state, conn).await;

    dispatch_directive(&state, conn, "not json").await;
    dispatch_directive(&state, conn, r#"{"event":"teleport","data":{}}"#).await;

    assert!(rx.try_recv().is_err(), "expected no events");
    assert!(state.registry.read().await.online_users().is_empty());
}
