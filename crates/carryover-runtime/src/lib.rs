//! # Carryover Runtime
//!
//! Request handling for one browser tab and the messaging around it.
//!
//! - [`ContentRouter`] turns each [`ActionRequest`](carryover_protocols::ActionRequest)
//!   into exactly one response, awaiting every storage and network step first.
//! - [`Messenger`] delivers requests to per-tab listeners, bootstrapping a
//!   listener on demand and waiting for its ready signal.
//! - [`MemoryStore`] and [`FileStore`] implement the persisted key/value state.

pub mod error;
pub mod messenger;
pub mod router;
pub mod store;
pub mod tab;

pub use error::DispatchError;
pub use messenger::Messenger;
pub use router::{ContentRouter, SharedPage};
pub use store::{FileStore, MemoryStore};
pub use tab::{spawn_listener, Envelope, ListenerHandle, TabId};
