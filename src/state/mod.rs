//! Per-connection and per-user state.

mod identity;
mod session;

pub use identity::Identity;
pub use session::SessionState;
