use std::time::Duration;

use fileshare_bus::attach_socket;
use fileshare_shared::{Message, User};

async fn recv_soon(rx: &mut fileshare_bus::Inbound) -> Option<Message> {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .ok()
        .flatten()
}

#[tokio::test]
async fn socket_bus_relays_between_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fileshare-chat.sock");

    // First attach binds the hub, the next two join as clients.
    let (hub, mut hub_rx) = attach_socket(&path).await.unwrap();
    let (alice, mut alice_rx) = attach_socket(&path).await.unwrap();
    let (_bob, mut bob_rx) = attach_socket(&path).await.unwrap();

    // Client -> hub and client -> client delivery.
    let hello = Message::text(User::random(), "hi from alice");
    alice.publish(hello.clone()).await.unwrap();
    assert_eq!(recv_soon(&mut hub_rx).await, Some(hello.clone()));
    assert_eq!(recv_soon(&mut bob_rx).await, Some(hello));

    // Hub participates as a peer too.
    let reply = Message::text(User::random(), "hi from the hub");
    hub.publish(reply.clone()).await.unwrap();
    assert_eq!(recv_soon(&mut alice_rx).await, Some(reply.clone()));
    assert_eq!(recv_soon(&mut bob_rx).await, Some(reply));

    // Publishers never hear their own frames.
    let quiet = tokio::time::timeout(Duration::from_millis(100), alice_rx.recv()).await;
    assert!(quiet.is_err());
}

#[tokio::test]
async fn socket_bus_no_replay_for_late_joiners() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fileshare-chat.sock");

    let (hub, _hub_rx) = attach_socket(&path).await.unwrap();
    hub.publish(Message::text(User::random(), "before you arrived"))
        .await
        .unwrap();

    // A session attaching later starts from silence; there is no history
    // request in the protocol.
    let (_late, mut late_rx) = attach_socket(&path).await.unwrap();
    let quiet = tokio::time::timeout(Duration::from_millis(200), late_rx.recv()).await;
    assert!(quiet.is_err());
}

#[tokio::test]
async fn socket_bus_simultaneous_starts_share_one_hub() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fileshare-chat.sock");

    // Sessions racing to attach must converge on a single hub: the losers of
    // the bind race reconnect to the winner instead of unlinking its socket
    // and splitting the channel.
    let (a, b, c, d) = tokio::join!(
        attach_socket(&path),
        attach_socket(&path),
        attach_socket(&path),
        attach_socket(&path),
    );
    let (a, _a_rx) = a.unwrap();
    let (_b, mut b_rx) = b.unwrap();
    let (_c, mut c_rx) = c.unwrap();
    let (_d, mut d_rx) = d.unwrap();

    let msg = Message::text(User::random(), "everyone hears this");
    a.publish(msg.clone()).await.unwrap();
    for rx in [&mut b_rx, &mut c_rx, &mut d_rx] {
        assert_eq!(recv_soon(rx).await, Some(msg.clone()));
    }
}

#[tokio::test]
async fn socket_bus_survives_stale_socket_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fileshare-chat.sock");

    // Simulate a dead hub that left its socket file behind.
    std::fs::write(&path, b"").unwrap();

    let (hub, mut hub_rx) = attach_socket(&path).await.unwrap();
    let (client, _client_rx) = attach_socket(&path).await.unwrap();

    let msg = Message::text(User::random(), "fresh hub");
    client.publish(msg.clone()).await.unwrap();
    assert_eq!(recv_soon(&mut hub_rx).await, Some(msg));
    drop(hub);
}
