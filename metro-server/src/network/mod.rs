//! Network data: the snapshot the graph is built from and the store that
//! owns line and station records.
//!
//! The store is the authority for create/update/delete of lines and
//! stations. Every mutation is followed by a full graph rebuild from
//! [`NetworkStore::snapshot`], driven by [`crate::metro::MetroService`].

mod error;
mod snapshot;
mod store;

pub use error::{SnapshotError, StoreError};
pub use snapshot::{LineSnapshot, NetworkSnapshot, SnapshotFile, SnapshotSource};
pub use store::{LineStation, NetworkStore};
