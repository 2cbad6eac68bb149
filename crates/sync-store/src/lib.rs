//! Remote document store for settings-sync
//!
//! The remote side is a key-value document keyed by id: it is read
//! wholesale, written wholesale, and created empty. [`DocumentStore`] is the
//! seam the reconcilers talk to; [`GistClient`] implements it over the
//! GitHub Gist REST API.

pub mod document;
pub mod error;
pub mod gist;
pub mod store;

pub use document::{RemoteDocument, RemoteFile};
pub use error::{Error, Result};
pub use gist::{GistClient, GistConfig};
pub use store::DocumentStore;
