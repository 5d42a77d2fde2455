//! Server assembly.
//!
//! - **`pool`**: fixed-size pool of worker event loops with round-robin
//!   assignment
//! - **`listener`**: the listening socket, accept loop, and signal-driven
//!   shutdown

pub mod listener;
pub mod pool;

pub use listener::Server;
pub use pool::{LoopSelector, StopHandle, WorkerPool};
