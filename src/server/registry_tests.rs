use super::*;
use crate::config::ServerConfig;

fn test_server() -> RelayServer {
    RelayServer::new(ServerConfig::default())
}

async fn register(server: &RelayServer) -> ConnectionId {
    let (sender, _receiver) = mpsc::channel(8);
    server.register(sender).await
}

#[tokio::test]
async fn register_assigns_unique_ids_and_no_room() {
    let server = test_server();
    let a = register(&server).await;
    let b = register(&server).await;

    assert_ne!(a, b);
    assert_eq!(server.room_of(&a).await, None);
    assert_eq!(server.connection_count().await, 2);
}

#[tokio::test]
async fn join_creates_room_lazily_and_sets_both_sides() {
    let server = test_server();
    let conn = register(&server).await;

    assert!(!server.room_exists("doc-1").await);
    server.join_room(&conn, "doc-1").await;

    assert_eq!(server.room_of(&conn).await.as_deref(), Some("doc-1"));
    assert_eq!(server.members_of("doc-1").await, vec![conn]);
}

#[tokio::test]
async fn joining_a_second_room_leaves_the_first() {
    let server = test_server();
    let conn = register(&server).await;

    server.join_room(&conn, "a").await;
    server.join_room(&conn, "b").await;

    assert_eq!(server.room_of(&conn).await.as_deref(), Some("b"));
    assert!(server.members_of("a").await.is_empty());
    // Room "a" lost its only member and must be gone entirely.
    assert!(!server.room_exists("a").await);
    assert_eq!(server.members_of("b").await, vec![conn]);
}

#[tokio::test]
async fn last_leave_removes_the_room_from_storage() {
    let server = test_server();
    let a = register(&server).await;
    let b = register(&server).await;
    server.join_room(&a, "shared").await;
    server.join_room(&b, "shared").await;

    server.leave_room(&a).await;
    assert!(server.room_exists("shared").await);
    assert_eq!(server.members_of("shared").await, vec![b]);

    server.leave_room(&b).await;
    assert!(server.members_of("shared").await.is_empty());
    assert!(!server.room_exists("shared").await);
    assert_eq!(server.room_count().await, 0);
}

#[tokio::test]
async fn leave_without_room_is_a_no_op() {
    let server = test_server();
    let conn = register(&server).await;

    server.leave_room(&conn).await;
    assert_eq!(server.room_of(&conn).await, None);
    assert_eq!(server.connection_count().await, 1);
}

#[tokio::test]
async fn unregister_clears_room_membership_first() {
    let server = test_server();
    let a = register(&server).await;
    let b = register(&server).await;
    server.join_room(&a, "shared").await;
    server.join_room(&b, "shared").await;

    server.unregister(&a).await;

    assert_eq!(server.connection_count().await, 1);
    assert_eq!(server.members_of("shared").await, vec![b]);

    server.unregister(&b).await;
    assert!(!server.room_exists("shared").await);
    assert_eq!(server.connection_count().await, 0);
}

#[tokio::test]
async fn members_of_unknown_room_is_empty() {
    let server = test_server();
    assert!(server.members_of("nowhere").await.is_empty());
}

#[tokio::test]
async fn join_for_unknown_connection_is_ignored() {
    let server = test_server();
    let ghost = uuid::Uuid::new_v4();

    server.join_room(&ghost, "doc-1").await;
    assert!(!server.room_exists("doc-1").await);
}
