//! Frameboard Client Library
//!
//! Talks to the Frameboard REST backend and keeps the session state
//! (projects, frames, open tabs) in sync with it. Store calls run on a
//! background worker thread; the UI stays event-driven and polls.

pub mod config;
pub mod session;
pub mod store;
pub mod worker;

pub use config::ClientConfig;
pub use session::{Notice, SessionError, Workspace};
pub use store::{FrameStore, HttpStore, MemoryStore, StoreError, StoreResult};
pub use worker::{StoreCommand, StoreEvent, StoreWorker};
