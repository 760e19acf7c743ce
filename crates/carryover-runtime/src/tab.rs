//! Per-tab listener.
//!
//! A listener owns the receiving end of a tab's message channel. It signals
//! readiness once it is registered, then answers each envelope in arrival
//! order, one response per envelope.

use std::sync::Arc;

use carryover_protocols::ActionResponse;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::router::ContentRouter;

/// Browser tab identifier.
pub type TabId = u64;

/// Pending messages per listener before senders wait.
const CHANNEL_CAPACITY: usize = 32;

/// A message and the channel its single response goes back on.
#[derive(Debug)]
pub struct Envelope {
    pub message: Value,
    pub reply: oneshot::Sender<ActionResponse>,
}

impl Envelope {
    pub fn new(message: Value) -> (Self, oneshot::Receiver<ActionResponse>) {
        let (reply, rx) = oneshot::channel();
        (Self { message, reply }, rx)
    }
}

/// A running listener.
#[derive(Debug)]
pub struct ListenerHandle {
    sender: mpsc::Sender<Envelope>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub fn sender(&self) -> mpsc::Sender<Envelope> {
        self.sender.clone()
    }

    pub fn is_alive(&self) -> bool {
        !self.sender.is_closed() && !self.task.is_finished()
    }

    /// Tear the listener down. In-flight requests observe a closed channel.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

/// Spawn the listener for `tab`. The returned receiver fires once the
/// listener is ready to accept messages.
pub fn spawn_listener(
    tab: TabId,
    router: Arc<ContentRouter>,
) -> (ListenerHandle, oneshot::Receiver<()>) {
    let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
    let (ready_tx, ready_rx) = oneshot::channel();
    let task = tokio::spawn(run_listener(tab, router, receiver, ready_tx));
    (ListenerHandle { sender, task }, ready_rx)
}

async fn run_listener(
    tab: TabId,
    router: Arc<ContentRouter>,
    mut receiver: mpsc::Receiver<Envelope>,
    ready: oneshot::Sender<()>,
) {
    info!(tab, "listener registered");
    let _ = ready.send(());

    while let Some(envelope) = receiver.recv().await {
        let response = router.handle_value(envelope.message).await;
        if envelope.reply.send(response).is_err() {
            debug!(tab, "caller stopped waiting for the response");
        }
    }

    debug!(tab, "listener stopped");
}
