//! Shared test utilities for the settings-sync workspace.
//!
//! This crate provides in-memory stand-ins for the reconcilers'
//! collaborators. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`user_dir`]: [`TestUserDir`] builder for an editor user folder
//! - [`store`]: [`MemoryStore`], a document store that records calls
//! - [`fakes`]: recording extension host, counting transform, notifier

pub mod fakes;
pub mod store;
pub mod user_dir;

pub use fakes::{CountingTransform, RecordingHost, RecordingNotifier};
pub use store::MemoryStore;
pub use user_dir::TestUserDir;
