//! Filesystem primitives shared by the watcher and the query endpoints.

pub mod listing;
pub mod replicator;
pub mod tree;
