use super::*;
use uuid::Uuid;

#[test]
fn register_then_resolve() {
    let mut registry = PresenceRegistry::new();
    let conn = Uuid::new_v4();

    registry.register("u1".into(), conn);
    assert_eq!(registry.resolve("u1"), Some(conn));
    assert_eq!(registry.resolve("u2"), None);
}

#[test]
fn later_connect_wins_for_same_identity() {
    let mut registry = PresenceRegistry::new();
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    registry.register("u1".into(), first);
    registry.register("u1".into(), second);

    assert_eq!(registry.resolve("u1"), Some(second));
    assert_eq!(registry.online_users(), vec!["u1".to_string()]);
}

#[test]
fn online_set_tracks_register_unregister_sequences() {
    let mut registry = PresenceRegistry::new();
    let conn_a = Uuid::new_v4();
    let conn_b = Uuid::new_v4();
    let conn_c = Uuid::new_v4();

    registry.register("u1".into(), conn_a);
    registry.register("u2".into(), conn_b);
    registry.register("u3".into(), conn_c);
    assert_eq!(registry.online_users(), vec!["u1".to_string(), "u2".into(), "u3".into()]);

    registry.unregister(&conn_b);
    assert_eq!(registry.online_users(), vec!["u1".to_string(), "u3".into()]);

    registry.unregister(&conn_a);
    registry.unregister(&conn_c);
    assert!(registry.online_users().is_empty());
}

#[test]
fn unregister_removes_presence_and_call_registration() {
    let mut registry = PresenceRegistry::new();
    let conn = Uuid::new_v4();

    registry.register("u1".into(), conn);
    registry.register_for_calling(conn, "Alice".into());

    assert!(registry.unregister(&conn));
    assert_eq!(registry.resolve("u1"), None);
    assert_eq!(registry.display_name(&conn), None);
    assert!(registry.active_users().is_empty());

    // Already gone: nothing left to remove.
    assert!(!registry.unregister(&conn));
}

#[test]
fn call_reregistration_replaces_display_name() {
    let mut registry = PresenceRegistry::new();
    let conn = Uuid::new_v4();

    registry.register_for_calling(conn, "Alice".into());
    registry.register_for_calling(conn, "Alicia".into());

    assert_eq!(registry.display_name(&conn), Some("Alicia"));
    assert_eq!(registry.active_users().len(), 1);
}

#[test]
fn resolve_target_prefers_identity_then_falls_back_to_handle() {
    let mut registry = PresenceRegistry::new();
    let conn = Uuid::new_v4();
    registry.register("u1".into(), conn);

    // Known identity resolves through the presence map.
    assert_eq!(registry.resolve_target(&CallTarget::User("u1".into())), Some(conn));

    // Unknown identity that is UUID-shaped is accepted as a literal handle.
    let raw = Uuid::new_v4();
    assert_eq!(
        registry.resolve_target(&CallTarget::User(raw.to_string())),
        Some(raw)
    );

    // Unknown identity that is not a handle resolves to nothing.
    assert_eq!(registry.resolve_target(&CallTarget::User("nobody".into())), None);

    // Explicit connection targets bypass resolution.
    let direct = Uuid::new_v4();
    assert_eq!(registry.resolve_target(&CallTarget::Connection(direct)), Some(direct));
}

#[test]
fn snapshots_are_sorted() {
    let mut registry = PresenceRegistry::new();
    registry.register("zoe".into(), Uuid::new_v4());
    registry.register("amy".into(), Uuid::new_v4());
    registry.register("mia".into(), Uuid::new_v4());

    assert_eq!(
        registry.online_users(),
        vec!["amy".to_string(), "mia".into(), "zoe".into()]
    );

    registry.register_for_calling(Uuid::new_v4(), "Zoe".into());
    registry.register_for_calling(Uuid::new_v4(), "Amy".into());
    let active = registry.active_users();
    let names: Vec<&str> = active.iter().map(|u| u.display_name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort_unstable();
    assert_eq!(names, sorted);
}
