//! Local broadcast channel shared by all chat sessions on one machine.
//!
//! The adapter contract is deliberately weak, mirroring a browser
//! `BroadcastChannel`: publishing fans a message out to every *other*
//! endpoint attached to the same named channel, asynchronously, with no
//! delivery guarantee, no acknowledgment and no replay for late joiners.
//! Per-publisher order is preserved; nothing is promised across publishers.
//! Local echo is the session controller's job, not the bus's.
//!
//! Two backends share the same handle/receiver surface:
//! [`LocalBus`] keeps everything in-process (tests, embedders), while
//! [`socket::attach`] bridges sessions in separate processes over a Unix
//! domain socket with a connect-or-bind hub.

pub mod envelope;
pub mod local;
pub mod socket;

pub use envelope::Envelope;
pub use local::LocalBus;
pub use socket::attach as attach_socket;

use fileshare_shared::Message;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Publish half of an attached channel endpoint.
///
/// Dropping the handle (and the paired inbound receiver) releases the
/// subscription; for the socket backend it also closes the connection.
#[derive(Debug, Clone)]
pub struct BusHandle {
    origin: Uuid,
    tx: mpsc::Sender<Envelope>,
}

impl BusHandle {
    fn new(origin: Uuid, tx: mpsc::Sender<Envelope>) -> Self {
        Self { origin, tx }
    }

    /// Identity of this endpoint, used to suppress self-delivery.
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    /// Fan a message out to the other endpoints on the channel.
    ///
    /// Fire-and-forget: completion means the message was handed to the
    /// transport, not that anyone received it.
    pub async fn publish(&self, message: Message) -> anyhow::Result<()> {
        self.tx
            .send(Envelope {
                origin: self.origin,
                message,
            })
            .await
            .map_err(|_| anyhow::anyhow!("bus endpoint is closed"))
    }
}

/// Inbound half of an attached endpoint: messages published by peers.
pub type Inbound = mpsc::Receiver<Message>;
