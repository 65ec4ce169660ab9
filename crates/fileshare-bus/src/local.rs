//! In-process broadcast backend.
//!
//! A [`LocalBus`] is a registry of named channels built on
//! `tokio::sync::broadcast`. Every attached endpoint runs a small forwarding
//! task that drops its own frames and hands everything else to the session.
//! A slow endpoint that lags behind the channel capacity loses the missed
//! frames; the adapter contract makes no delivery guarantee.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::envelope::Envelope;
use crate::{BusHandle, Inbound};

/// Capacity of each named broadcast channel.
const CHANNEL_CAPACITY: usize = 256;

/// Registry of in-process broadcast channels, cloneable and shareable.
#[derive(Debug, Clone, Default)]
pub struct LocalBus {
    channels: Arc<Mutex<HashMap<String, broadcast::Sender<Envelope>>>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an endpoint to a named channel.
    ///
    /// Returns the publish handle and the inbound receiver. The endpoint
    /// never receives its own publishes.
    pub fn attach(&self, channel: &str) -> (BusHandle, Inbound) {
        let tx = {
            let mut channels = self.channels.lock().expect("bus registry poisoned");
            channels
                .entry(channel.to_string())
                .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
                .clone()
        };

        let origin = Uuid::new_v4();
        debug!(channel, %origin, "Attaching local bus endpoint");

        // Outbound: handle -> broadcast fan-out. A send with no listeners is
        // not an error; nobody else has the channel open yet.
        let (out_tx, mut out_rx) = mpsc::channel::<Envelope>(CHANNEL_CAPACITY);
        let fan_out = tx.clone();
        tokio::spawn(async move {
            while let Some(env) = out_rx.recv().await {
                let _ = fan_out.send(env);
            }
        });

        // Inbound: broadcast -> session, with self-delivery suppressed.
        let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let mut sub = tx.subscribe();
        tokio::spawn(async move {
            loop {
                match sub.recv().await {
                    Ok(env) => {
                        if env.origin == origin {
                            continue;
                        }
                        if in_tx.send(env.message).await.is_err() {
                            // Endpoint torn down; release the subscription.
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Bus endpoint lagged, messages dropped");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        (BusHandle::new(origin, out_tx), in_rx)
    }
}
