//! Cross-process broadcast backend over a Unix domain socket.
//!
//! Sessions in separate processes share one channel through a connect-or-bind
//! hub: the first session to attach binds the socket and relays every frame
//! it receives to all other connections, while also participating as a
//! virtual peer. Later sessions connect as plain clients. Frames are
//! line-delimited JSON [`Envelope`]s.
//!
//! The hub offers the same weak contract as the in-process backend: no
//! delivery guarantee, no replay for late joiners, per-connection order only.
//! If the hub process exits, the remaining sessions lose the channel.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::unix::OwnedWriteHalf;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::{BusHandle, Inbound};

/// Buffer sizes mirror the in-process backend.
const CHANNEL_CAPACITY: usize = 256;

/// Virtual peer id reserved for the hub's own session.
const LOCAL_PEER: u64 = 0;

type PeerMap = Arc<Mutex<HashMap<u64, mpsc::UnboundedSender<String>>>>;

/// Attach to the channel at `path`, becoming the hub if nobody is listening.
pub async fn attach(path: impl AsRef<Path>) -> anyhow::Result<(BusHandle, Inbound)> {
    let path = path.as_ref();

    match UnixStream::connect(path).await {
        Ok(stream) => {
            debug!(path = %path.display(), "Joined existing bus hub");
            Ok(attach_stream(stream))
        }
        Err(connect_err) => match bind_hub(path, connect_err.kind()).await {
            Ok(endpoint) => Ok(endpoint),
            // Lost the bind race against another starting session; it is the
            // hub now, so connect to it.
            Err(e) if e.kind() == io::ErrorKind::AddrInUse => {
                let stream = UnixStream::connect(path).await?;
                Ok(attach_stream(stream))
            }
            Err(e) => Err(e.into()),
        },
    }
}

/// Bind the socket and run the relay hub, returning the hub's own endpoint.
async fn bind_hub(path: &Path, connect_error: io::ErrorKind) -> io::Result<(BusHandle, Inbound)> {
    // A refused connect means the existing file is a stale socket left by a
    // dead hub. Any other failure (typically NotFound) may mean another
    // session is binding this very moment; unlinking the file then would
    // detach a live hub, so leave it and let bind surface AddrInUse.
    if connect_error == io::ErrorKind::ConnectionRefused && path.exists() {
        std::fs::remove_file(path)?;
    }
    let listener = UnixListener::bind(path)?;
    info!(path = %path.display(), "Bus hub listening");

    let peers: PeerMap = Arc::new(Mutex::new(HashMap::new()));
    let next_id = Arc::new(AtomicU64::new(LOCAL_PEER + 1));

    // Accept loop: one reader and one writer task per connection.
    {
        let peers = peers.clone();
        tokio::spawn(async move {
            loop {
                let (stream, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "Bus hub accept failed");
                        continue;
                    }
                };
                let id = next_id.fetch_add(1, Ordering::Relaxed);
                debug!(peer = id, "Bus peer connected");

                let (read_half, write_half) = stream.into_split();
                let (line_tx, line_rx) = mpsc::unbounded_channel();
                peers
                    .lock()
                    .expect("peer map poisoned")
                    .insert(id, line_tx);

                tokio::spawn(write_lines(write_half, line_rx));

                let peers = peers.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(read_half).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        relay(&peers, id, &line);
                    }
                    debug!(peer = id, "Bus peer disconnected");
                    peers.lock().expect("peer map poisoned").remove(&id);
                });
            }
        });
    }

    // The hub participates through a virtual peer entry.
    let origin = Uuid::new_v4();

    let (out_tx, mut out_rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
    {
        let peers = peers.clone();
        tokio::spawn(async move {
            while let Some(env) = out_rx.recv().await {
                match env.to_line() {
                    Ok(line) => relay(&peers, LOCAL_PEER, &line),
                    Err(e) => warn!(error = %e, "Failed to encode bus frame"),
                }
            }
        });
    }

    let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (line_tx, mut line_rx) = mpsc::unbounded_channel::<String>();
    peers
        .lock()
        .expect("peer map poisoned")
        .insert(LOCAL_PEER, line_tx);
    tokio::spawn(async move {
        while let Some(line) = line_rx.recv().await {
            if let Some(message) = decode_frame(&line, origin) {
                if in_tx.send(message).await.is_err() {
                    break;
                }
            }
        }
    });

    Ok((BusHandle::new(origin, out_tx), in_rx))
}

/// Attach as a client of an already-running hub.
fn attach_stream(stream: UnixStream) -> (BusHandle, Inbound) {
    let origin = Uuid::new_v4();
    let (read_half, write_half) = stream.into_split();

    let (out_tx, mut out_rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
    let (line_tx, line_rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(write_lines(write_half, line_rx));
    tokio::spawn(async move {
        while let Some(env) = out_rx.recv().await {
            match env.to_line() {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "Failed to encode bus frame"),
            }
        }
    });

    let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);
    tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if let Some(message) = decode_frame(&line, origin) {
                if in_tx.send(message).await.is_err() {
                    break;
                }
            }
        }
        debug!("Bus connection closed");
    });

    (BusHandle::new(origin, out_tx), in_rx)
}

/// Forward a frame from `from` to every other peer, pruning dead ones.
fn relay(peers: &PeerMap, from: u64, line: &str) {
    let mut peers = peers.lock().expect("peer map poisoned");
    peers.retain(|id, tx| {
        if *id == from {
            return true;
        }
        tx.send(line.to_string()).is_ok()
    });
}

/// Decode a frame, dropping malformed lines and our own frames.
fn decode_frame(line: &str, own_origin: Uuid) -> Option<fileshare_shared::Message> {
    match Envelope::from_line(line) {
        Ok(env) if env.origin == own_origin => None,
        Ok(env) => Some(env.message),
        Err(e) => {
            warn!(error = %e, "Dropping malformed bus frame");
            None
        }
    }
}

async fn write_lines(mut half: OwnedWriteHalf, mut rx: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if half.write_all(line.as_bytes()).await.is_err()
            || half.write_all(b"\n").await.is_err()
            || half.flush().await.is_err()
        {
            break;
        }
    }
}
