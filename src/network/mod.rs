//! Network layer: socket, outgoing queue, and session lifecycle.

pub mod client;
mod connection;
pub mod lifecycle;
mod outbox;
mod session;

pub use client::Client;
pub use connection::{Connection, ReadEvent};
pub use lifecycle::LoopExit;
pub use outbox::{OUTBOX_CAPACITY, Outbox};
pub use session::Session;
