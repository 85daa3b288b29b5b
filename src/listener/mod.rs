//! Channel listening sessions and their registry.
//!
//! Each subscribed channel is served by one background task that forwards
//! matching messages to the shell's output line channel. The registry owns
//! the full lifecycle: starting a session, stopping one, and tearing all of
//! them down at exit.

mod registry;
mod session;

pub use registry::ListenerRegistry;
pub use session::Session;
