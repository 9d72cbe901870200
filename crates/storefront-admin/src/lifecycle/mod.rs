//! # System Lifecycle
//!
//! [`AdminSystem`] wires the back office together: one HTTP client, one
//! session, one CRUD store task per resource. Stores take their remote API
//! in `run`, after construction, so every store is built the same way.
//!
//! ## Shutdown
//!
//! 1. Stop the [`SessionWatchdog`]
//! 2. Drop every store client, closing the store channels
//! 3. Each store sees `recv()` return `None` and exits
//! 4. Await the store tasks
//!
//! Hooks handed out by the factory methods hold the remote APIs, never a
//! store client, so they do not keep a store alive.

pub mod system;
pub mod watchdog;

pub use system::{AdminSystem, SystemError};
pub use watchdog::SessionWatchdog;
