//! Delivery of action requests to tabs.
//!
//! A tab starts without a listener. The first delivery finds no listener,
//! bootstraps one, waits for its ready signal (bounded by the settle delay)
//! and retries once. A listener that disappears before answering surfaces
//! as [`DispatchError::ChannelClosed`]; one that never answers as
//! [`DispatchError::Timeout`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use carryover_config::RouterConfig;
use carryover_protocols::{ActionRequest, ActionResponse};
use parking_lot::RwLock;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use crate::error::DispatchError;
use crate::router::ContentRouter;
use crate::tab::{spawn_listener, Envelope, ListenerHandle, TabId};

struct Tab {
    router: Arc<ContentRouter>,
    listener: Option<ListenerHandle>,
}

/// Routes messages to per-tab listeners.
pub struct Messenger {
    tabs: RwLock<HashMap<TabId, Tab>>,
    settle_delay: Duration,
    response_timeout: Duration,
}

impl Messenger {
    pub fn new(config: &RouterConfig) -> Self {
        Self {
            tabs: RwLock::new(HashMap::new()),
            settle_delay: config.settle_delay(),
            response_timeout: config.response_timeout(),
        }
    }

    /// Register a tab. Its listener is started on first delivery.
    pub fn open_tab(&self, tab: TabId, router: ContentRouter) {
        let previous = self.tabs.write().insert(
            tab,
            Tab {
                router: Arc::new(router),
                listener: None,
            },
        );
        if let Some(Tab {
            listener: Some(listener),
            ..
        }) = previous
        {
            listener.shutdown();
        }
        debug!(tab, "tab opened");
    }

    /// Drop the tab's listener, as a navigation does. The tab stays known
    /// and gets a fresh listener on the next delivery.
    pub fn unload(&self, tab: TabId) {
        let listener = self
            .tabs
            .write()
            .get_mut(&tab)
            .and_then(|t| t.listener.take());
        if let Some(listener) = listener {
            listener.shutdown();
            debug!(tab, "listener unloaded");
        }
    }

    /// Forget the tab entirely.
    pub fn close_tab(&self, tab: TabId) -> bool {
        match self.tabs.write().remove(&tab) {
            Some(entry) => {
                if let Some(listener) = entry.listener {
                    listener.shutdown();
                }
                true
            }
            None => false,
        }
    }

    pub fn has_listener(&self, tab: TabId) -> bool {
        self.tabs
            .read()
            .get(&tab)
            .and_then(|t| t.listener.as_ref())
            .is_some_and(ListenerHandle::is_alive)
    }

    /// Send a typed request.
    pub async fn request(
        &self,
        tab: TabId,
        request: &ActionRequest,
    ) -> Result<ActionResponse, DispatchError> {
        let message = serde_json::to_value(request)?;
        self.send_to_tab(tab, message).await
    }

    /// Send a raw message and wait for its single response.
    pub async fn send_to_tab(&self, tab: TabId, message: Value) -> Result<ActionResponse, DispatchError> {
        let (envelope, reply) = Envelope::new(message);

        let envelope = match self.deliver(tab, envelope).await {
            Ok(()) => return self.await_reply(tab, reply).await,
            Err((DispatchError::NoListener(_), envelope)) => envelope,
            Err((e, _)) => return Err(e),
        };

        debug!(tab, "no listener yet, bootstrapping");
        self.bootstrap(tab).await?;
        self.deliver(tab, envelope).await.map_err(|(e, _)| e)?;
        self.await_reply(tab, reply).await
    }

    /// Start the listener of `tab` unless one is alive, then wait for it to
    /// report ready.
    pub async fn bootstrap(&self, tab: TabId) -> Result<(), DispatchError> {
        let ready = {
            let mut tabs = self.tabs.write();
            let entry = tabs.get_mut(&tab).ok_or(DispatchError::UnknownTab(tab))?;
            if entry.listener.as_ref().is_some_and(ListenerHandle::is_alive) {
                return Ok(());
            }
            let (listener, ready) = spawn_listener(tab, entry.router.clone());
            entry.listener = Some(listener);
            ready
        };

        match tokio::time::timeout(self.settle_delay, ready).await {
            Ok(Ok(())) => {
                info!(tab, "listener ready");
                Ok(())
            }
            Ok(Err(_)) => {
                warn!(tab, "listener exited before it was ready");
                Err(DispatchError::NoListener(tab))
            }
            Err(_) => {
                warn!(tab, "listener not ready after {:?}", self.settle_delay);
                Err(DispatchError::NoListener(tab))
            }
        }
    }

    async fn deliver(&self, tab: TabId, envelope: Envelope) -> Result<(), (DispatchError, Envelope)> {
        let sender = {
            let tabs = self.tabs.read();
            let Some(entry) = tabs.get(&tab) else {
                return Err((DispatchError::UnknownTab(tab), envelope));
            };
            match &entry.listener {
                Some(listener) => listener.sender(),
                None => return Err((DispatchError::NoListener(tab), envelope)),
            }
        };

        sender
            .send(envelope)
            .await
            .map_err(|e| (DispatchError::NoListener(tab), e.0))
    }

    async fn await_reply(
        &self,
        tab: TabId,
        reply: oneshot::Receiver<ActionResponse>,
    ) -> Result<ActionResponse, DispatchError> {
        match tokio::time::timeout(self.response_timeout, reply).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) => Err(DispatchError::ChannelClosed(tab)),
            Err(_) => Err(DispatchError::Timeout {
                tab,
                timeout: self.response_timeout,
            }),
        }
    }
}

impl Drop for Messenger {
    fn drop(&mut self) {
        for (_, tab) in self.tabs.get_mut().drain() {
            if let Some(listener) = tab.listener {
                listener.shutdown();
            }
        }
    }
}

#[cfg(test)]
#[path = "messenger_tests.rs"]
mod messenger_tests;
